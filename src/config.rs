//! Layered settings.
//!
//! Built-in defaults, then `faculty-recommender.toml` (optional), then
//! `FACULTY_*` environment variables.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "faculty-recommender.toml";
pub const ENV_PREFIX: &str = "FACULTY_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// persisted index artifact
    pub index_path: PathBuf,
    /// newline-delimited stopword list
    pub stopwords_path: PathBuf,
    /// ingestion endpoint serving the faculty records
    pub corpus_url: String,
    /// base of generated profile links
    pub profile_base_url: String,
    pub http_timeout_secs: u64,
    /// fallback filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from("index/vectors.cbor"),
            stopwords_path: PathBuf::from("data/stopwords.txt"),
            corpus_url: "http://localhost:8000/faculty".to_string(),
            profile_base_url: "https://www.daiict.ac.in/faculty".to_string(),
            http_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// defaults + optional TOML file + environment
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let file = config_file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }

    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(config_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_sources() {
        let figment = Figment::from(Serialized::defaults(Settings::default()));
        assert_eq!(Settings::from_figment(&figment).unwrap(), Settings::default());
    }

    #[test]
    fn toml_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string(
            r#"
            index_path = "/srv/recommender/vectors.cbor"
            http_timeout_secs = 5
            "#,
        ));
        let settings = Settings::from_figment(&figment).unwrap();
        assert_eq!(settings.index_path, PathBuf::from("/srv/recommender/vectors.cbor"));
        assert_eq!(settings.http_timeout_secs, 5);
        assert_eq!(settings.stopwords_path, Settings::default().stopwords_path);
    }

    #[test]
    fn rejects_mistyped_values() {
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::string(r#"http_timeout_secs = "soon""#));
        assert!(Settings::from_figment(&figment).is_err());
    }
}
