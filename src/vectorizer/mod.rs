pub mod analyzer;
pub mod corpus;
pub mod evaluate;
pub mod index;
pub mod tfidf;
pub mod token;

use indexmap::IndexMap;

/// Sparse term -> weight vector.
/// Used for TF, TF-IDF and query vectors; insertion order is first
/// occurrence in the source token sequence.
pub type TermVector = IndexMap<String, f64>;

/// Corpus-wide term -> IDF weight table.
/// Terms absent from it weigh 0.
pub type IdfTable = IndexMap<String, f64>;
