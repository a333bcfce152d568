/// This crate is a faculty profile recommender built on TF-IDF vectors and
/// cosine similarity.
pub mod config;
pub mod engine;
pub mod error;
pub mod source;
pub mod vectorizer;

/// Tokenizer and stopword set
/// `Tokenizer` lower-cases text, merges a fixed list of multi-word phrases
/// (`machine learning` -> `machine_learning`), strips everything outside
/// `[a-z_ ]`, and drops stopwords and tokens of two characters or fewer.
///
/// `StopWords` is loaded once at startup and shared through an `Arc`;
/// it is never mutated afterwards.
pub use vectorizer::analyzer::{StopWords, Tokenizer};

/// Token Frequency structure
/// Token counts of one document or query, the base data for TF.
pub use vectorizer::token::{compute_tf, TokenFrequency};

/// Corpus
/// Document count and per-term document frequency, the base data for IDF.
pub use vectorizer::corpus::Corpus;

/// TF IDF Calculation Engine Trait
/// `DefaultTFIDFEngine` weights terms with relative TF and smoothed IDF
/// `ln((N + 1) / (df + 1)) + 1`.
pub use vectorizer::tfidf::{compute_idf, compute_tfidf, DefaultTFIDFEngine, TFIDFEngine};

/// Sparse vectors
pub use vectorizer::{IdfTable, TermVector};

/// Index
/// `IndexBuilder` turns the full corpus into an immutable `Index` of
/// (TF-IDF vector, metadata) entries plus the IDF table.
/// `persist` writes it atomically, `load` reads it back.
///
/// # Serialization
/// CBOR, with a format version checked on load.
pub use vectorizer::index::{
    store::{load, persist},
    FacultyRecord, Index, IndexBuilder, IndexEntry, IndexHeader,
};

/// Query parser
/// Extracts an optional result count (`top 3 ...`, `5 best ...`,
/// `show me 7 ...`) from a free-text query.
pub use vectorizer::evaluate::query::{parse_query, ParsedQuery, DEFAULT_K, MAX_K, MIN_K};

/// Scoring
/// Cosine similarity ranking of every indexed profile against a query.
pub use vectorizer::evaluate::scoring::{
    cosine_similarity, rank, rank_with, HitEntry, Hits, ScoredProfile,
};

/// Query service
/// `Recommender` holds the live index snapshot and answers queries with
/// `Recommendation`s.
pub use engine::{Recommendation, Recommender};

pub use config::Settings;
pub use error::{BuildError, ConfigError, LoadError};
