//! Faculty Core - Faculty discovery, local keyword cache and paper ranking
//!
//! This crate provides:
//! - Faculty, student profile and paper score types
//! - A keyword-searchable record store (Tantivy)
//! - OpenAlex and Semantic Scholar API clients behind traits
//! - The faculty discovery pipeline (institution -> works -> authors -> field lock)
//! - The paper relevance ranker
//! - Configuration management

pub mod config;
pub mod discovery;
pub mod error;
pub mod openalex;
pub mod ranker;
pub mod record;
pub mod semantic_scholar;
pub mod store;
pub mod verifier;

// Re-export commonly used types
pub use config::ScoutConfig;
pub use discovery::{FacultyDiscovery, DEFAULT_LIMIT};
pub use error::{Result, ScoutError};
pub use openalex::{OpenAlexClient, ScholarlyIndex};
pub use ranker::{score_papers, PaperRanker, RankingOutcome, RankingReport};
pub use record::{FacultyRecord, PaperScore, StudentProfile};
pub use semantic_scholar::{PaperSource, SemanticScholarClient};
pub use store::{KeywordRecordStore, RecordStore};
pub use verifier::{AuthorCheck, CompositeVerifier};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
