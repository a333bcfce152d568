use std::path::PathBuf;

use thiserror::Error;

/// Failures of the offline index build.
/// None of them leave a partially written artifact behind.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read corpus {path}: {source}")]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode corpus records: {0}")]
    CorpusDecode(#[from] serde_json::Error),

    #[error("failed to fetch corpus: {0}")]
    CorpusFetch(#[from] reqwest::Error),

    #[error("failed to encode index: {0}")]
    Encode(#[from] serde_cbor::Error),

    #[error("failed to write index {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while bringing an index (or its stopword list) into memory.
/// The query side refuses to serve until one of these is resolved.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("index not found at {path}")]
    Missing { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("index {path} is truncated or corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_cbor::Error,
    },

    #[error("index format version {found} is not supported (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },

    #[error("failed to read stopword list {path}: {source}")]
    Stopwords {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::Missing { path }
        } else {
            LoadError::Io { path, source }
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(#[source] Box<figment::Error>);

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError(Box::new(e))
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
pub type LoadResult<T> = std::result::Result<T, LoadError>;
