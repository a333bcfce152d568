use std::fmt::Debug;

use rayon::prelude::*;

use crate::vectorizer::{
    analyzer::Tokenizer,
    evaluate::query::parse_query,
    index::{FacultyRecord, Index},
    tfidf::{DefaultTFIDFEngine, TFIDFEngine},
    token::TokenFrequency,
    TermVector,
};

/// decimal places of a presented score
pub const SCORE_DECIMALS: i32 = 4;

/// Cosine similarity
/// cosθ = A・B / (|A||B|)
///
/// The dot product runs over the terms both vectors share; each norm runs
/// over that vector's own terms. A zero-norm side scores exactly 0.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    // walk the shorter vector, probe the longer one
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    // fold from +0.0: an empty f64 sum is -0.0, which sorts below +0.0
    let dot = short
        .iter()
        .filter_map(|(term, w)| long.get(term).map(|v| w * v))
        .fold(0.0, |acc, x| acc + x);
    dot / (norm_a * norm_b)
}

#[inline]
fn norm(v: &TermVector) -> f64 {
    v.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// Round a score for presentation. Ranking never uses the rounded value.
#[inline]
pub fn round_score(score: f64) -> f64 {
    let scale = 10f64.powi(SCORE_DECIMALS);
    (score * scale).round() / scale
}

/// A vector that cannot take part in scoring
fn is_malformed(v: &TermVector) -> bool {
    v.values().any(|w| !w.is_finite() || *w < 0.0)
}

/// (index position, full precision score)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEntry {
    pub position: usize,
    pub score: f64,
}

/// Structure to store search results
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    pub fn new(list: Vec<HitEntry>) -> Self {
        Hits { list }
    }

    /// Sort results by descending score.
    /// Stable: equal scores keep index order.
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.retain(|h| !h.score.is_nan());
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    pub fn truncate(&mut self, k: usize) -> &mut Self {
        self.list.truncate(k);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    #{}: {:.6}", hit.position, hit.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// A ranked profile with its presented (rounded) score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProfile<'a> {
    pub metadata: &'a FacultyRecord,
    pub score: f64,
}

/// TF-IDF vector of a query against the index's IDF table
pub fn query_vector<E: TFIDFEngine>(index: &Index, tokens: &[String]) -> TermVector {
    let mut freq = TokenFrequency::new();
    freq.add_tokens(tokens);
    E::tfidf_vec(&E::tf_vec(&freq), &index.idf)
}

/// Score every document of `index` against `query`.
/// Malformed document vectors are skipped, never fatal.
pub fn score_all(index: &Index, query: &TermVector) -> Hits {
    let list = index
        .entries
        .par_iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            if is_malformed(&entry.vector) {
                tracing::warn!(
                    position,
                    faculty_id = %entry.metadata.faculty_id,
                    "skipping document with malformed vector"
                );
                return None;
            }
            Some(HitEntry {
                position,
                score: cosine_similarity(query, &entry.vector),
            })
        })
        .collect();
    Hits::new(list)
}

/// Answer a raw free-text query: parse the count directive, vectorize the
/// remaining text, rank every document and keep the top k.
///
/// For indexes built by `IndexBuilder<DefaultTFIDFEngine>`.
pub fn rank<'a>(index: &'a Index, tokenizer: &Tokenizer, raw_query: &str) -> Vec<ScoredProfile<'a>> {
    rank_with::<DefaultTFIDFEngine>(index, tokenizer, raw_query)
}

/// `rank` for an index built by `IndexBuilder<E>`; the query is weighted
/// with the same engine.
pub fn rank_with<'a, E: TFIDFEngine>(
    index: &'a Index,
    tokenizer: &Tokenizer,
    raw_query: &str,
) -> Vec<ScoredProfile<'a>> {
    let (text, k) = parse_query(raw_query).into_parts();
    let tokens = tokenizer.tokenize(&text);
    tracing::debug!(query = %text, k, tokens = ?tokens, "ranking");
    if tokens.is_empty() {
        return Vec::new();
    }

    let query = query_vector::<E>(index, &tokens);
    let mut hits = score_all(index, &query);
    hits.sort_by_score().truncate(k);
    hits.list
        .into_iter()
        .map(|hit| ScoredProfile {
            metadata: &index.entries[hit.position].metadata,
            score: round_score(hit.score),
        })
        .collect()
}
