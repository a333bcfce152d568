use std::sync::LazyLock;

use regex::Regex;

/// result count when the query does not ask for one
pub const DEFAULT_K: usize = 5;
pub const MIN_K: usize = 1;
pub const MAX_K: usize = 20;

/// Count directives, tried in order; the first one that matches wins.
/// 1. `top 3`, `best 3`, `first 3`
/// 2. `3 best`, `3 top`, `3 first`, `3 faculty`, `3 faculties`, `3 professor(s)`
/// 3. `show 3`, `show me 3`, `give 3`, `give me 3`
static COUNT_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"(?i)\b(?:top|best|first)\s+([0-9]+)\b",
        r"(?i)\b([0-9]+)\s+(?:best|top|first|faculty|faculties|professors?)\b",
        r"(?i)\b(?:show|give)\s+(?:me\s+)?([0-9]+)\b",
    ]
    .map(|p| Regex::new(p).expect("count pattern is valid"))
});

/// A free-text query split into the text to search for and the number of
/// results to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// query text with the count directive removed
    pub text: String,
    /// result count, always within `MIN_K..=MAX_K`
    pub k: usize,
}

impl ParsedQuery {
    pub fn into_parts(self) -> (String, usize) {
        (self.text, self.k)
    }
}

/// Parse an optional result count out of `query`.
///
/// Every occurrence of the winning directive is removed, whitespace is
/// collapsed, and the count is clamped into `[MIN_K, MAX_K]`.
///
/// ```
/// use faculty_recommender::parse_query;
/// let q = parse_query("top 3 machine learning");
/// assert_eq!(q.into_parts(), ("machine learning".to_string(), 3));
/// ```
pub fn parse_query(query: &str) -> ParsedQuery {
    for pattern in COUNT_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(query) {
            // overflowing digit runs are "a lot" and clamp to MAX_K
            let requested = caps[1].parse::<u64>().unwrap_or(u64::MAX);
            let stripped = pattern.replace_all(query, "");
            return ParsedQuery {
                text: collapse_whitespace(&stripped),
                k: clamp_k(requested),
            };
        }
    }
    ParsedQuery {
        text: collapse_whitespace(query),
        k: DEFAULT_K,
    }
}

#[inline]
fn clamp_k(requested: u64) -> usize {
    requested.clamp(MIN_K as u64, MAX_K as u64) as usize
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
