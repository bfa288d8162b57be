//! Configuration for the faculty scout
//!
//! Everything the components need is passed in explicitly through
//! [`ScoutConfig`]; there is no module-level default state.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScoutError};
use crate::openalex::{OpenAlexClient, OPENALEX_API_URL};
use crate::semantic_scholar::{SemanticScholarClient, SEMANTIC_SCHOLAR_API_URL};
use crate::store::KeywordRecordStore;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Directory of the local faculty index
    pub index_path: PathBuf,
    /// OpenAlex base URL
    pub openalex_base_url: String,
    /// Contact email for the OpenAlex polite pool
    pub contact_email: Option<String>,
    /// Semantic Scholar Graph API base URL
    pub semantic_scholar_base_url: String,
    /// Optional Semantic Scholar API key (higher rate limits)
    pub semantic_scholar_api_key: Option<String>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from("./data/faculty_index"),
            openalex_base_url: OPENALEX_API_URL.to_string(),
            contact_email: None,
            semantic_scholar_base_url: SEMANTIC_SCHOLAR_API_URL.to_string(),
            semantic_scholar_api_key: None,
        }
    }
}

impl ScoutConfig {
    /// Load configuration from environment variables
    ///
    /// Expected variables (all optional):
    /// - SCOUT_INDEX_PATH: Directory of the faculty index
    /// - SCOUT_CONTACT_EMAIL: Contact email for the OpenAlex polite pool
    /// - OPENALEX_BASE_URL: OpenAlex endpoint
    /// - SEMANTIC_SCHOLAR_BASE_URL: Semantic Scholar endpoint
    /// - SEMANTIC_SCHOLAR_API_KEY: Semantic Scholar API key
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply any set environment variables on top of this configuration
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var("SCOUT_INDEX_PATH") {
            self.index_path = PathBuf::from(path);
        }
        if let Ok(email) = std::env::var("SCOUT_CONTACT_EMAIL") {
            self.contact_email = Some(email);
        }
        if let Ok(url) = std::env::var("OPENALEX_BASE_URL") {
            self.openalex_base_url = url;
        }
        if let Ok(url) = std::env::var("SEMANTIC_SCHOLAR_BASE_URL") {
            self.semantic_scholar_base_url = url;
        }
        if let Ok(key) = std::env::var("SEMANTIC_SCHOLAR_API_KEY") {
            self.semantic_scholar_api_key = Some(key);
        }
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScoutError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string; missing keys take their defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ScoutError::Config(format!("Failed to parse TOML configuration: {}", e)))
    }

    pub fn with_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = path.into();
        self
    }

    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = Some(email.into());
        self
    }

    /// Open (or create) the record store at the configured path
    pub fn open_store(&self) -> Result<KeywordRecordStore> {
        KeywordRecordStore::open(&self.index_path)
    }

    pub fn openalex_client(&self) -> Result<OpenAlexClient> {
        OpenAlexClient::with_base_url(&self.openalex_base_url, self.contact_email.as_deref())
    }

    pub fn semantic_scholar_client(&self) -> Result<SemanticScholarClient> {
        SemanticScholarClient::with_base_url(
            &self.semantic_scholar_base_url,
            self.semantic_scholar_api_key.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openalex::DEFAULT_USER_AGENT;

    #[test]
    fn test_default_config() {
        let config = ScoutConfig::default();
        assert_eq!(config.openalex_base_url, "https://api.openalex.org");
        assert!(config.contact_email.is_none());
        assert!(config.semantic_scholar_api_key.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ScoutConfig::from_str(
            r#"
            index_path = "/tmp/faculty"
            contact_email = "me@example.edu"
            "#,
        )
        .unwrap();
        assert_eq!(config.index_path, PathBuf::from("/tmp/faculty"));
        assert_eq!(config.contact_email.as_deref(), Some("me@example.edu"));
        assert_eq!(config.semantic_scholar_base_url, SEMANTIC_SCHOLAR_API_URL);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = ScoutConfig::from_str("index_path = [").unwrap_err();
        assert!(matches!(err, ScoutError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ScoutConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ScoutError::Config(_)));
    }

    #[test]
    fn test_clients_follow_config() {
        let config = ScoutConfig::default();
        let client = config.openalex_client().unwrap();
        assert_eq!(client.user_agent(), DEFAULT_USER_AGENT);

        let polite = config.with_contact_email("me@example.edu").openalex_client().unwrap();
        assert!(polite.user_agent().contains("mailto:me@example.edu"));
    }

    #[test]
    fn test_open_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("index");
        let config = ScoutConfig::default().with_index_path(&path);
        config.open_store().unwrap();
        assert!(path.exists());
    }
}
