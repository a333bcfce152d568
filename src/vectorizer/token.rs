use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::TermVector;

///  TokenFrequency 構造体
/// Occurrence counts of the tokens of one document (or one query).
/// Keeps first-occurrence order so every vector derived from it is
/// deterministic.
///
/// # Examples
/// ```
/// use faculty_recommender::TokenFrequency;
/// let mut freq = TokenFrequency::new();
/// freq.add_tokens(&["robotics", "vision", "robotics"]);
///
/// let tf = freq.tf_vector();
/// assert_eq!(tf["robotics"], 2.0 / 3.0);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

/// Tokenの追加
impl TokenFrequency {
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// tokenを追加する
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        let count = self.token_count.entry(token.to_string()).or_insert(0);
        *count += 1;
        self.total_token_count += 1;
        self
    }

    /// 複数のtokenを追加する
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }
}

/// 統計
impl TokenFrequency {
    /// occurrences of `token`, 0 if unseen
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// total number of tokens added
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// distinct tokens in first-occurrence order
    pub fn token_set(&self) -> impl Iterator<Item = &str> + '_ {
        self.token_count.keys().map(String::as_str)
    }

    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_token_count == 0
    }

    /// Relative frequency of every distinct token: count / total.
    /// An empty frequency table yields an empty vector.
    pub fn tf_vector(&self) -> TermVector {
        if self.total_token_count == 0 {
            return TermVector::new();
        }
        let total = self.total_token_count as f64;
        self.token_count
            .iter()
            .map(|(token, &count)| (token.clone(), count as f64 / total))
            .collect()
    }
}

/// TF of a token sequence
pub fn compute_tf<T: AsRef<str>>(tokens: &[T]) -> TermVector {
    let mut freq = TokenFrequency::new();
    freq.add_tokens(tokens);
    freq.tf_vector()
}
