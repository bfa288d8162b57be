//! Semantic Scholar client - recent papers for an author

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScoutError};

/// Semantic Scholar Graph API endpoint
pub const SEMANTIC_SCHOLAR_API_URL: &str = "https://api.semanticscholar.org/graph/v1";

/// Papers requested per author
pub const PAPERS_PER_AUTHOR: usize = 50;

const PAPER_FIELDS: &str = "title,abstract,year,citationCount,url,isOpenAccess";

/// A paper as returned by the papers-by-author endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPaper {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub citation_count: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub is_open_access: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct PapersResponse {
    #[serde(default)]
    data: Option<Vec<RawPaper>>,
}

/// Source of an author's recent papers
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn author_papers(&self, author_id: &str, limit: usize) -> Result<Vec<RawPaper>>;
}

/// HTTP client for the Semantic Scholar Graph API
#[derive(Debug, Clone)]
pub struct SemanticScholarClient {
    http: reqwest::Client,
    base_url: String,
}

impl SemanticScholarClient {
    /// Create a client; the public API works without a key but is rate-limited
    pub fn new(api_key: Option<&str>) -> Result<Self> {
        Self::with_base_url(SEMANTIC_SCHOLAR_API_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|e| ScoutError::Config(format!("Invalid Semantic Scholar API key: {}", e)))?;
            headers.insert("x-api-key", value);
        }

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PaperSource for SemanticScholarClient {
    async fn author_papers(&self, author_id: &str, limit: usize) -> Result<Vec<RawPaper>> {
        let url = format!("{}/author/{}/papers", self.base_url, author_id);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[("fields", PAPER_FIELDS.to_string()), ("limit", limit.to_string())])
            .send()
            .await?
            .error_for_status()?;

        let body: PapersResponse = response.json().await?;
        Ok(body.data.unwrap_or_default())
    }
}
