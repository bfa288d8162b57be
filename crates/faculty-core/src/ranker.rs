//! Paper relevance ranking against a student profile
//!
//! Scoring is plain keyword overlap plus a capped citation bonus:
//!
//! ```text
//! text  = lower((title + " ") * 2 + abstract)      // title weighs double
//! score = |{k in keywords : k substring of text}| + min(citations / 100, 2.0)
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::record::{PaperScore, StudentProfile};
use crate::semantic_scholar::{PaperSource, RawPaper, PAPERS_PER_AUTHOR};

/// Papers published before this year are ignored
pub const MIN_YEAR: i32 = 2018;

/// Upper bound of the citation bonus
pub const MAX_CITATION_BONUS: f64 = 2.0;

/// Characters of abstract kept in the snippet
pub const SNIPPET_CHARS: usize = 200;

/// Message of the error payload; covers API failures and empty results alike
pub const NO_PAPERS_MESSAGE: &str = "No papers found or API error.";

/// Default professor name when the caller does not supply one
pub const UNKNOWN_PROFESSOR: &str = "Unknown";

/// Ranked papers plus the context they were ranked in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingReport {
    pub professor_name: String,
    pub analysis_timestamp: String,
    pub student_profile_used: StudentProfile,
    pub recommended_papers: Vec<PaperScore>,
}

impl RankingReport {
    /// Keep only the `n` best papers
    pub fn top(mut self, n: usize) -> Self {
        self.recommended_papers.truncate(n);
        self
    }
}

/// Result of a ranking call: a report, or an error payload for the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RankingOutcome {
    Report(RankingReport),
    Failure { error: String },
}

impl RankingOutcome {
    fn no_papers() -> Self {
        RankingOutcome::Failure {
            error: NO_PAPERS_MESSAGE.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RankingOutcome::Failure { .. })
    }

    pub fn report(&self) -> Option<&RankingReport> {
        match self {
            RankingOutcome::Report(report) => Some(report),
            RankingOutcome::Failure { .. } => None,
        }
    }

    /// Keep only the `n` best papers of a report; failures pass through
    pub fn top(self, n: usize) -> Self {
        match self {
            RankingOutcome::Report(report) => RankingOutcome::Report(report.top(n)),
            failure => failure,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn snippet(text: &str) -> String {
    let mut snippet: String = text.chars().take(SNIPPET_CHARS).collect();
    snippet.push_str("...");
    snippet
}

fn citation_bonus(citations: Option<u64>) -> f64 {
    (citations.unwrap_or(0) as f64 / 100.0).min(MAX_CITATION_BONUS)
}

fn score_paper(paper: &RawPaper, keywords: &[String]) -> Option<PaperScore> {
    let abstract_text = paper.abstract_text.as_deref().filter(|a| !a.is_empty())?;
    let year = paper.year.filter(|year| *year >= MIN_YEAR)?;
    let title = paper.title.as_deref().unwrap_or_default();

    let text = format!("{title} {title} {abstract_text}").to_lowercase();

    let matched_keywords: Vec<String> = keywords
        .iter()
        .filter(|keyword| text.contains(keyword.as_str()))
        .cloned()
        .collect();

    let score = round2(matched_keywords.len() as f64 + citation_bonus(paper.citation_count));
    if score <= 0.0 {
        return None;
    }

    Some(PaperScore {
        title: title.to_string(),
        year,
        url: paper.url.clone(),
        relevance_score: score,
        matched_keywords,
        abstract_snippet: snippet(abstract_text),
    })
}

/// Filter, score and sort papers for a profile, best first.
///
/// Papers without an abstract, without a year or older than [`MIN_YEAR`] are
/// skipped, as are papers whose final score is not positive. Ties keep input order.
pub fn score_papers(papers: &[RawPaper], profile: &StudentProfile) -> Vec<PaperScore> {
    let keywords = profile.keywords();

    let mut ranked: Vec<PaperScore> = papers
        .iter()
        .filter_map(|paper| score_paper(paper, &keywords))
        .collect();

    ranked.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    ranked
}

/// Ranks an author's recent papers for a student
pub struct PaperRanker<P> {
    source: P,
}

impl<P: PaperSource> PaperRanker<P> {
    pub fn new(source: P) -> Self {
        Self { source }
    }

    /// Fetch, filter and score an author's papers.
    ///
    /// Never fails: transport errors and empty results both come back as
    /// [`RankingOutcome::Failure`] with [`NO_PAPERS_MESSAGE`].
    pub async fn rank_papers_for_author(
        &self,
        author_id: &str,
        professor_name: Option<&str>,
        profile: &StudentProfile,
    ) -> RankingOutcome {
        info!("Analysis started for author {}", author_id);

        let papers = match self.source.author_papers(author_id, PAPERS_PER_AUTHOR).await {
            Ok(papers) => papers,
            Err(err) => {
                error!("Error fetching papers for {}: {}", author_id, err);
                return RankingOutcome::no_papers();
            }
        };

        let recommended_papers = score_papers(&papers, profile);
        if recommended_papers.is_empty() {
            info!("No qualifying papers among {} fetched for {}", papers.len(), author_id);
            return RankingOutcome::no_papers();
        }

        RankingOutcome::Report(RankingReport {
            professor_name: professor_name.unwrap_or(UNKNOWN_PROFESSOR).to_string(),
            analysis_timestamp: Utc::now().to_rfc3339(),
            student_profile_used: profile.clone(),
            recommended_papers,
        })
    }
}
