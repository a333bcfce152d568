use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::TokenFrequency;

/// keep document count and per-term document frequency
/// This is the only input of the IDF computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// number of documents added
    doc_num: u64,
    /// number of documents each term appears in
    term_counts: IndexMap<String, u64>,
}

impl Corpus {
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            term_counts: IndexMap::new(),
        }
    }

    /// Add one document's distinct terms.
    /// Callers must not repeat a term within one call.
    pub fn add_set<T>(&mut self, terms: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for term in terms {
            *self.term_counts.entry(term.as_ref().to_string()).or_insert(0) += 1;
        }
    }

    /// Add one document from its token frequency table
    pub fn add_doc(&mut self, freq: &TokenFrequency) {
        let terms: Vec<&str> = freq.token_set().collect();
        self.add_set(&terms);
    }

    /// Get the number of documents in the corpus
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the number of documents containing `term`
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// number of distinct terms
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// (term, document frequency) in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.term_counts.iter().map(|(t, c)| (t.as_str(), *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_documents_not_occurrences() {
        let mut corpus = Corpus::new();
        let mut a = TokenFrequency::new();
        a.add_tokens(&["robotics", "robotics", "vision"]);
        let mut b = TokenFrequency::new();
        b.add_tokens(&["robotics", "history"]);
        corpus.add_doc(&a);
        corpus.add_doc(&b);

        assert_eq!(corpus.get_doc_num(), 2);
        assert_eq!(corpus.get_term_count("robotics"), 2);
        assert_eq!(corpus.get_term_count("vision"), 1);
        assert_eq!(corpus.get_term_count("unknown"), 0);
        assert_eq!(corpus.vocab_size(), 3);
    }

    #[test]
    fn empty_document_still_counts() {
        let mut corpus = Corpus::new();
        corpus.add_doc(&TokenFrequency::new());
        assert_eq!(corpus.get_doc_num(), 1);
        assert_eq!(corpus.vocab_size(), 0);
    }
}
