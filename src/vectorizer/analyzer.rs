use std::{collections::HashSet, fs, path::Path, sync::Arc};

use crate::error::{LoadError, LoadResult};

/// Multi-word phrases that survive tokenization as a single term.
/// Applied in this order after lower-casing.
pub const PHRASES: [&str; 5] = [
    "computer vision",
    "machine learning",
    "data science",
    "deep learning",
    "natural language processing",
];

/// Tokens of this length or shorter are dropped.
pub const MIN_TOKEN_LEN: usize = 3;

/// Stopword set
/// Loaded once at startup and shared read-only by every `Tokenizer`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Read a newline-delimited stopword list
    pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Stopwords {
            path: path.to_path_buf(),
            source,
        })?;
        let stopwords = Self::parse(&text);
        tracing::debug!(path = %path.display(), count = stopwords.len(), "loaded stopwords");
        Ok(stopwords)
    }

    /// One word per line, surrounding whitespace ignored
    pub fn parse(text: &str) -> Self {
        Self::from_words(text.lines())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Tokenizer
/// Turns raw profile or query text into the normalized term sequence
/// used on both sides of the index.
///
/// 1. lower-case
/// 2. merge known phrases (`machine learning` -> `machine_learning`)
/// 3. replace every character outside `[a-z_ ]` with a space
/// 4. split on whitespace
/// 5. drop stopwords and tokens of length <= 2
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: Arc<StopWords>,
}

impl Tokenizer {
    pub fn new(stopwords: Arc<StopWords>) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopWords {
        &self.stopwords
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let merged = merge_phrases(&text.to_lowercase());
        let cleaned: String = merged
            .chars()
            .map(|c| match c {
                'a'..='z' | '_' | ' ' => c,
                _ => ' ',
            })
            .collect();
        cleaned
            .split_whitespace()
            .filter(|tok| tok.len() >= MIN_TOKEN_LEN && !self.stopwords.contains(tok))
            .map(str::to_string)
            .collect()
    }
}

/// expects already lower-cased text
fn merge_phrases(text: &str) -> String {
    let mut text = text.to_string();
    for phrase in PHRASES {
        if text.contains(phrase) {
            text = text.replace(phrase, &phrase.replace(' ', "_"));
        }
    }
    text
}
