use crate::vectorizer::{corpus::Corpus, token::TokenFrequency, IdfTable, TermVector};

/// TF-IDF calculation strategy.
/// `IndexBuilder` and the scorer are generic over it so that both sides
/// of a comparison are always weighted the same way.
pub trait TFIDFEngine {
    /// TFベクトルを生成する
    fn tf_vec(freq: &TokenFrequency) -> TermVector;
    /// IDFテーブルを生成する
    /// Must run once per corpus build, never per query.
    fn idf_vec(corpus: &Corpus) -> IdfTable;
    /// 要素ごとの積 tf * idf
    fn tfidf_vec(tf: &TermVector, idf: &IdfTable) -> TermVector;
}

/// デフォルトのTF-IDFエンジン
///
/// - tf = count / total
/// - idf = ln((N + 1) / (df + 1)) + 1
/// - tfidf = tf * idf, with unknown terms weighted 0
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    #[inline]
    pub fn idf_calc(doc_num: u64, doc_freq: u64) -> f64 {
        ((doc_num as f64 + 1.0) / (doc_freq as f64 + 1.0)).ln() + 1.0
    }
}

impl TFIDFEngine for DefaultTFIDFEngine {
    fn tf_vec(freq: &TokenFrequency) -> TermVector {
        freq.tf_vector()
    }

    fn idf_vec(corpus: &Corpus) -> IdfTable {
        let doc_num = corpus.get_doc_num();
        corpus
            .iter()
            .map(|(term, doc_freq)| (term.to_string(), Self::idf_calc(doc_num, doc_freq)))
            .collect()
    }

    fn tfidf_vec(tf: &TermVector, idf: &IdfTable) -> TermVector {
        tf.iter()
            .map(|(term, w)| (term.clone(), w * idf.get(term).copied().unwrap_or(0.0)))
            .collect()
    }
}

/// IDF over a set of per-document token sequences
pub fn compute_idf<T: AsRef<str>>(documents: &[Vec<T>]) -> IdfTable {
    let mut corpus = Corpus::new();
    for doc in documents {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(doc);
        corpus.add_doc(&freq);
    }
    DefaultTFIDFEngine::idf_vec(&corpus)
}

pub fn compute_tfidf(tf: &TermVector, idf: &IdfTable) -> TermVector {
    DefaultTFIDFEngine::tfidf_vec(tf, idf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::token::compute_tf;

    #[test]
    fn idf_formula() {
        let docs = vec![
            vec!["robotics", "vision"],
            vec!["robotics", "history"],
            vec!["robotics"],
        ];
        let idf = compute_idf(&docs);
        // present everywhere: ln(4/4) + 1
        assert!((idf["robotics"] - 1.0).abs() < 1e-12);
        assert!((idf["vision"] - ((4.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert_eq!(idf.len(), 3);
    }

    #[test]
    fn common_terms_weigh_less_than_rare_terms() {
        let docs = vec![vec!["common", "rare"], vec!["common"], vec!["common", "other"]];
        let idf = compute_idf(&docs);
        assert!(idf["common"] < idf["rare"]);
        let floor = (1.0f64 / 4.0).ln() + 1.0;
        assert!(idf.values().all(|&w| w > 0.0 && w >= floor));
    }

    #[test]
    fn repeated_tokens_count_once_per_document() {
        let docs = vec![vec!["vlsi", "vlsi", "vlsi"], vec!["fpga"]];
        let idf = compute_idf(&docs);
        assert!((idf["vlsi"] - idf["fpga"]).abs() < 1e-12);
    }

    #[test]
    fn empty_corpus_gives_empty_idf() {
        let docs: Vec<Vec<&str>> = Vec::new();
        assert!(compute_idf(&docs).is_empty());
    }

    #[test]
    fn unknown_terms_get_zero_weight() {
        let idf = compute_idf(&[vec!["robotics"]]);
        let tf = compute_tf(&["robotics", "quantum"]);
        let v = compute_tfidf(&tf, &idf);
        assert!((v["robotics"] - 0.5).abs() < 1e-12);
        assert_eq!(v["quantum"], 0.0);
    }
}
