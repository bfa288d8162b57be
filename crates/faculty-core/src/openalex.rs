//! OpenAlex client - institution search, works search and author hydration
//!
//! The discovery pipeline talks to OpenAlex through the [`ScholarlyIndex`]
//! trait; [`OpenAlexClient`] is the HTTP implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// OpenAlex API endpoint
pub const OPENALEX_API_URL: &str = "https://api.openalex.org";

/// Caller identifier sent when no contact email is configured
pub const DEFAULT_USER_AGENT: &str = concat!("faculty-scout/", env!("CARGO_PKG_VERSION"));

/// Only works published after this year are considered
pub const PUBLICATION_YEAR_CUTOFF: i32 = 2021;

/// Works fetched per search (one page)
pub const WORKS_PER_PAGE: usize = 50;

/// Maximum number of ids in one pipe-delimited author filter
pub const AUTHOR_BATCH_SIZE: usize = 50;

const AUTHOR_SELECT: &str = "id,display_name,summary_stats,topics,last_known_institutions";

/// User-Agent for OpenAlex requests.
///
/// With a contact email the caller lands in the polite pool.
pub fn user_agent(contact_email: Option<&str>) -> String {
    match contact_email.map(str::trim).filter(|email| !email.is_empty()) {
        Some(email) => format!("{} (mailto:{})", DEFAULT_USER_AGENT, email),
        None => DEFAULT_USER_AGENT.to_string(),
    }
}

/// Paged list envelope used by every OpenAlex list endpoint
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// A candidate institution from the institution search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    pub id: String,
    pub display_name: String,
}

/// A work with its authorship-to-institution links
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Work {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authorships: Option<Vec<Authorship>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Authorship {
    #[serde(default)]
    pub author: Option<EntityRef>,
    #[serde(default)]
    pub institutions: Option<Vec<EntityRef>>,
}

/// A reference to another OpenAlex entity (author or institution)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(default)]
    pub id: Option<String>,
}

impl Authorship {
    /// Whether this authorship is affiliated with the given institution
    pub fn is_affiliated_with(&self, institution_id: &str) -> bool {
        self.institutions
            .iter()
            .flatten()
            .any(|inst| inst.id.as_deref() == Some(institution_id))
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().and_then(|a| a.id.as_deref())
    }
}

/// Hydrated author metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub summary_stats: Option<SummaryStats>,
    #[serde(default)]
    pub topics: Option<Vec<Topic>>,
    #[serde(default)]
    pub last_known_institutions: Option<Vec<EntityRef>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub h_index: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub field: Option<TopicField>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicField {
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Author {
    pub fn topics(&self) -> &[Topic] {
        self.topics.as_deref().unwrap_or(&[])
    }

    pub fn h_index(&self) -> u32 {
        self.summary_stats
            .as_ref()
            .and_then(|s| s.h_index)
            .unwrap_or(0)
    }

    pub fn last_known_institution_ids(&self) -> impl Iterator<Item = &str> {
        self.last_known_institutions
            .iter()
            .flatten()
            .filter_map(|inst| inst.id.as_deref())
    }
}

impl Topic {
    pub fn field_name(&self) -> Option<&str> {
        self.field.as_ref().and_then(|f| f.display_name.as_deref())
    }
}

/// Remote scholarly index consumed by the discovery pipeline
#[async_trait]
pub trait ScholarlyIndex: Send + Sync {
    /// Ranked institutions matching a free-text name
    async fn search_institutions(&self, name: &str) -> Result<Vec<Institution>>;

    /// Recent works at `institution_id` whose title or abstract matches `keyword`
    async fn search_works(&self, institution_id: &str, keyword: &str) -> Result<Vec<Work>>;

    /// Hydrate up to [`AUTHOR_BATCH_SIZE`] authors by id
    async fn lookup_authors(&self, author_ids: &[String]) -> Result<Vec<Author>>;
}

/// HTTP client for the OpenAlex API
#[derive(Debug, Clone)]
pub struct OpenAlexClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl OpenAlexClient {
    /// Create a client against the public API
    pub fn new(contact_email: Option<&str>) -> Result<Self> {
        Self::with_base_url(OPENALEX_API_URL, contact_email)
    }

    /// Create a client against a custom base URL (mirrors, tests)
    pub fn with_base_url(base_url: &str, contact_email: Option<&str>) -> Result<Self> {
        let user_agent = user_agent(contact_email);
        let http = reqwest::Client::builder()
            .user_agent(user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent,
        })
    }

    /// The User-Agent sent with every request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, params);

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        let body: ListResponse<T> = response.json().await?;
        Ok(body.results)
    }
}

/// Build the works filter expression.
///
/// Commas separate filters in OpenAlex, so they are stripped from the keyword.
pub fn works_filter(institution_id: &str, keyword: &str) -> String {
    format!(
        "institutions.id:{},title_and_abstract.search:{},publication_year:>{}",
        institution_id,
        keyword.replace(',', " ").trim(),
        PUBLICATION_YEAR_CUTOFF
    )
}

/// Build the pipe-delimited author id filter
pub fn authors_filter(author_ids: &[String]) -> String {
    format!("id:{}", author_ids.join("|"))
}

#[async_trait]
impl ScholarlyIndex for OpenAlexClient {
    async fn search_institutions(&self, name: &str) -> Result<Vec<Institution>> {
        self.list("institutions", &[("search", name.to_string())])
            .await
    }

    async fn search_works(&self, institution_id: &str, keyword: &str) -> Result<Vec<Work>> {
        self.list(
            "works",
            &[
                ("filter", works_filter(institution_id, keyword)),
                ("per_page", WORKS_PER_PAGE.to_string()),
            ],
        )
        .await
    }

    async fn lookup_authors(&self, author_ids: &[String]) -> Result<Vec<Author>> {
        if author_ids.is_empty() {
            return Ok(vec![]);
        }

        self.list(
            "authors",
            &[
                ("filter", authors_filter(author_ids)),
                ("select", AUTHOR_SELECT.to_string()),
                ("per_page", AUTHOR_BATCH_SIZE.to_string()),
            ],
        )
        .await
    }
}
