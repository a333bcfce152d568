pub mod store;

use std::{marker::PhantomData, time::Instant};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

use crate::vectorizer::{
    analyzer::Tokenizer,
    corpus::Corpus,
    tfidf::{DefaultTFIDFEngine, TFIDFEngine},
    token::TokenFrequency,
    IdfTable, TermVector,
};

/// Version of the persisted artifact layout
pub const FORMAT_VERSION: u32 = 1;

/// Field repetition used when building a profile's text.
/// Name dominates, then research, specialization and publications, then bio.
pub const NAME_WEIGHT: usize = 4;
pub const RESEARCH_WEIGHT: usize = 3;
pub const SPECIALIZATION_WEIGHT: usize = 2;
pub const PUBLICATIONS_WEIGHT: usize = 2;
pub const BIO_WEIGHT: usize = 1;

/// One faculty profile as delivered by the ingestion side.
/// Missing or `null` fields are empty strings; numeric ids are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacultyRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub faculty_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mail: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phd_field: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub specialization: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bio: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub research: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub publications: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub profile_url: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub pub_links: Vec<String>,
}

impl FacultyRecord {
    /// Weighted concatenation of the searchable fields
    pub fn weighted_text(&self) -> String {
        [
            repeat_field(&self.name, NAME_WEIGHT),
            repeat_field(&self.research, RESEARCH_WEIGHT),
            repeat_field(&self.specialization, SPECIALIZATION_WEIGHT),
            repeat_field(&self.publications, PUBLICATIONS_WEIGHT),
            repeat_field(&self.bio, BIO_WEIGHT),
        ]
        .join(" ")
    }
}

// Copies are space separated on purpose. Plain concatenation would fuse the
// last word of one copy with the first word of the next ("ada lovelaceada").
fn repeat_field(field: &str, times: usize) -> String {
    vec![field; times].join(" ")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(v) => v.to_string(),
            Scalar::UInt(v) => v.to_string(),
            Scalar::Float(v) => v.to_string(),
            Scalar::Bool(v) => v.to_string(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_string)
        .unwrap_or_default())
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Option<Scalar>>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(Scalar::into_string)
        .collect())
}

/// A document's TF-IDF vector together with its metadata.
/// Keeping both in one record means they can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub vector: TermVector,
    pub metadata: FacultyRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHeader {
    pub format_version: u32,
    /// when the corpus was indexed
    pub built_at: DateTime<Utc>,
    pub documents: u64,
}

/// インデックス
/// Immutable snapshot produced by one full build: the ordered entries and
/// the IDF table they were weighted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub header: IndexHeader,
    pub entries: Vec<IndexEntry>,
    pub idf: IdfTable,
}

impl Index {
    /// An index over zero documents
    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), IdfTable::new())
    }

    pub fn from_parts(entries: Vec<IndexEntry>, idf: IdfTable) -> Self {
        Self {
            header: IndexHeader {
                format_version: FORMAT_VERSION,
                built_at: Utc::now(),
                documents: entries.len() as u64,
            },
            entries,
            idf,
        }
    }

    pub fn doc_num(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn vocab_size(&self) -> usize {
        self.idf.len()
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.header.built_at
    }
}

/// Builds an `Index` from the full corpus in one pass.
///
/// ```
/// use std::sync::Arc;
/// use faculty_recommender::{FacultyRecord, IndexBuilder, StopWords, Tokenizer};
///
/// let tokenizer = Tokenizer::new(Arc::new(StopWords::default()));
/// let builder: IndexBuilder = IndexBuilder::new(tokenizer);
/// let index = builder.build(vec![FacultyRecord {
///     name: "Ada".into(),
///     research: "machine learning".into(),
///     ..Default::default()
/// }]);
/// assert_eq!(index.doc_num(), 1);
/// assert!(index.idf.contains_key("machine_learning"));
/// ```
#[derive(Debug, Clone)]
pub struct IndexBuilder<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    tokenizer: Tokenizer,
    _marker: PhantomData<E>,
}

impl<E> IndexBuilder<E>
where
    E: TFIDFEngine,
{
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            _marker: PhantomData,
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn build(&self, records: Vec<FacultyRecord>) -> Index {
        let start = Instant::now();

        // tokenize every profile; order is preserved by collect
        let tokenizer = &self.tokenizer;
        let freqs: Vec<TokenFrequency> = records
            .par_iter()
            .map(|record| {
                let tokens = tokenizer.tokenize(&record.weighted_text());
                let mut freq = TokenFrequency::new();
                freq.add_tokens(&tokens);
                freq
            })
            .collect();

        let mut corpus = Corpus::new();
        for freq in &freqs {
            corpus.add_doc(freq);
        }
        // IDF once over the whole corpus
        let idf = E::idf_vec(&corpus);

        let entries: Vec<IndexEntry> = freqs
            .iter()
            .zip(records)
            .map(|(freq, metadata)| IndexEntry {
                vector: E::tfidf_vec(&E::tf_vec(freq), &idf),
                metadata,
            })
            .collect();

        let index = Index::from_parts(entries, idf);
        tracing::info!(
            documents = index.doc_num(),
            vocabulary = index.vocab_size(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "index built"
        );
        index
    }
}
