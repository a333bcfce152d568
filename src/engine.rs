use std::{
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use serde::Serialize;

use crate::{
    config::Settings,
    error::LoadResult,
    vectorizer::{
        analyzer::{StopWords, Tokenizer},
        evaluate::scoring::{rank, ScoredProfile},
        index::{store, FacultyRecord, Index},
    },
};

/// One ranked faculty profile as handed to an HTTP or CLI front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub faculty_id: String,
    pub name: String,
    pub specialization: String,
    pub research: String,
    pub mail: String,
    pub publications: String,
    pub pub_links: Vec<String>,
    pub profile_url: String,
    /// cosine similarity rounded to 4 decimals
    pub score: f64,
}

impl Recommendation {
    fn from_scored(scored: ScoredProfile<'_>, profile_base_url: &str) -> Self {
        let record = scored.metadata;
        Self {
            faculty_id: record.faculty_id.clone(),
            name: record.name.clone(),
            specialization: record.specialization.clone(),
            research: record.research.clone(),
            mail: record.mail.clone(),
            publications: record.publications.clone(),
            pub_links: record.pub_links.clone(),
            profile_url: profile_url(record, profile_base_url),
            score: scored.score,
        }
    }
}

/// The record's own profile URL, or one derived from the name
pub fn profile_url(record: &FacultyRecord, base_url: &str) -> String {
    if !record.profile_url.trim().is_empty() {
        return record.profile_url.clone();
    }
    let slug = record.name.trim().to_lowercase().replace(' ', "-").replace('.', "");
    tracing::debug!(name = %record.name, %slug, "profile url missing, using name slug");
    format!("{}/{}", base_url.trim_end_matches('/'), slug)
}

/// Query side of the recommender.
///
/// Holds the live index as an `Arc` snapshot. Each query runs against the
/// snapshot current when it started; `replace` and `reload` swap in a new
/// one without touching the old.
#[derive(Debug)]
pub struct Recommender {
    tokenizer: Tokenizer,
    index: RwLock<Arc<Index>>,
    profile_base_url: String,
}

impl Recommender {
    pub fn new(tokenizer: Tokenizer, index: Index, profile_base_url: impl Into<String>) -> Self {
        Self {
            tokenizer,
            index: RwLock::new(Arc::new(index)),
            profile_base_url: profile_base_url.into(),
        }
    }

    /// Load stopwords and the persisted index named by `settings`.
    /// Fails instead of serving an empty index.
    pub fn open(settings: &Settings) -> LoadResult<Self> {
        let stopwords = StopWords::load(&settings.stopwords_path)?;
        let index = store::load(&settings.index_path)?;
        Ok(Self::new(
            Tokenizer::new(Arc::new(stopwords)),
            index,
            settings.profile_base_url.clone(),
        ))
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// current index snapshot
    pub fn snapshot(&self) -> Arc<Index> {
        // the guarded value is a plain Arc, a poisoned lock still holds a valid one
        let guard = self.index.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a freshly built index
    pub fn replace(&self, index: Index) {
        let next = Arc::new(index);
        let mut guard = self.index.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }

    /// Load `path` and swap it in. On failure the current index stays live.
    pub fn reload<P: AsRef<Path>>(&self, path: P) -> LoadResult<()> {
        let index = store::load(path)?;
        self.replace(index);
        Ok(())
    }

    pub fn recommend(&self, raw_query: &str) -> Vec<Recommendation> {
        let index = self.snapshot();
        rank(&index, &self.tokenizer, raw_query)
            .into_iter()
            .map(|scored| Recommendation::from_scored(scored, &self.profile_base_url))
            .collect()
    }
}
