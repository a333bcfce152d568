//! Corpus readers for the ingestion side.
//!
//! Both accept either a bare JSON array of records or `{"results": [...]}`.

use std::{fs, path::Path, time::Duration};

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::{
    error::{BuildError, BuildResult},
    vectorizer::index::FacultyRecord,
};

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusPayload {
    Bare(Vec<FacultyRecord>),
    Wrapped { results: Vec<FacultyRecord> },
}

impl CorpusPayload {
    fn into_records(self) -> Vec<FacultyRecord> {
        match self {
            CorpusPayload::Bare(records) => records,
            CorpusPayload::Wrapped { results } => results,
        }
    }
}

pub fn parse_json(text: &str) -> BuildResult<Vec<FacultyRecord>> {
    let payload: CorpusPayload = serde_json::from_str(text)?;
    Ok(payload.into_records())
}

pub fn read_json_file<P: AsRef<Path>>(path: P) -> BuildResult<Vec<FacultyRecord>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| BuildError::CorpusRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_json(&text)?;
    tracing::info!(path = %path.display(), records = records.len(), "corpus read");
    Ok(records)
}

/// GET `url` and decode the records. Non-2xx responses are errors.
pub fn fetch(url: &str, timeout: Duration) -> BuildResult<Vec<FacultyRecord>> {
    tracing::info!(%url, "fetching corpus");
    let client = Client::builder().timeout(timeout).build()?;
    let body = client.get(url).send()?.error_for_status()?.text()?;
    let records = parse_json(&body)?;
    tracing::info!(%url, records = records.len(), "corpus fetched");
    Ok(records)
}
