//! Paper ranking against a scripted Semantic Scholar

use async_trait::async_trait;
use faculty_core::ranker::NO_PAPERS_MESSAGE;
use faculty_core::semantic_scholar::RawPaper;
use faculty_core::{PaperRanker, PaperSource, RankingOutcome, ScoutError, StudentProfile};
use pretty_assertions::assert_eq;
use serde_json::json;

enum FakeSource {
    Papers(Vec<RawPaper>),
    Unreachable,
}

#[async_trait]
impl PaperSource for FakeSource {
    async fn author_papers(&self, author_id: &str, limit: usize) -> faculty_core::Result<Vec<RawPaper>> {
        assert_eq!(author_id, "12345");
        assert_eq!(limit, 50);
        match self {
            FakeSource::Papers(papers) => Ok(papers.clone()),
            FakeSource::Unreachable => Err(ScoutError::Transport("API Error".to_string())),
        }
    }
}

fn paper(title: &str, abstract_text: Option<&str>, year: i32, citations: u64, url: &str) -> RawPaper {
    RawPaper {
        title: Some(title.to_string()),
        abstract_text: abstract_text.map(str::to_string),
        year: Some(year),
        citation_count: Some(citations),
        url: Some(url.to_string()),
        is_open_access: Some(false),
    }
}

fn mock_papers() -> Vec<RawPaper> {
    vec![
        paper(
            "Deep Learning with Transformers",
            Some("A study on NLP using Python and Transformers."),
            2023,
            50,
            "http://paper1.com",
        ),
        paper(
            "Old History of AI",
            Some("Deep Learning concepts from the past."),
            2010,
            100,
            "http://paper2.com",
        ),
        paper(
            "Irrelevant Biology Study",
            Some("Cells and mitochondria analysis."),
            2022,
            5,
            "http://paper3.com",
        ),
    ]
}

fn profile() -> StudentProfile {
    StudentProfile::new(
        vec!["Python".to_string(), "Transformers".to_string()],
        vec!["Deep Learning".to_string(), "NLP".to_string()],
    )
}

#[tokio::test]
async fn test_run_success() {
    let ranker = PaperRanker::new(FakeSource::Papers(mock_papers()));

    let outcome = ranker
        .rank_papers_for_author("12345", Some("Dr. Test"), &profile())
        .await
        .top(3);

    let report = outcome.report().expect("Expected a report");
    assert_eq!(report.professor_name, "Dr. Test");
    assert_eq!(report.student_profile_used, profile());
    assert_eq!(report.recommended_papers.len(), 2);
    assert_eq!(report.recommended_papers[0].title, "Deep Learning with Transformers");
    assert_eq!(report.recommended_papers[0].url.as_deref(), Some("http://paper1.com"));
    assert!(chrono::DateTime::parse_from_rfc3339(&report.analysis_timestamp).is_ok());
}

#[tokio::test]
async fn test_report_serializes_with_expected_keys() {
    let ranker = PaperRanker::new(FakeSource::Papers(mock_papers()));

    let outcome = ranker.rank_papers_for_author("12345", None, &profile()).await;
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(value["professor_name"], json!("Unknown"));
    assert_eq!(value["student_profile_used"]["skills"], json!(["Python", "Transformers"]));
    assert_eq!(value["recommended_papers"][0]["relevance_score"], json!(4.5));
    assert_eq!(
        value["recommended_papers"][0]["abstract_snippet"],
        json!("A study on NLP using Python and Transformers....")
    );
}

#[tokio::test]
async fn test_run_api_failure() {
    let ranker = PaperRanker::new(FakeSource::Unreachable);

    let outcome = ranker.rank_papers_for_author("12345", Some("Dr. Test"), &profile()).await;

    assert!(outcome.is_failure());
    assert_eq!(serde_json::to_value(&outcome).unwrap(), json!({"error": "No papers found or API error."}));
}

#[tokio::test]
async fn test_author_without_papers_is_error() {
    let ranker = PaperRanker::new(FakeSource::Papers(vec![]));

    let outcome = ranker.rank_papers_for_author("12345", None, &profile()).await;

    assert_eq!(
        outcome,
        RankingOutcome::Failure {
            error: NO_PAPERS_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn test_no_qualifying_papers_is_error() {
    let papers = vec![
        paper("Ancient", Some("Python."), 2001, 500, "http://old.example"),
        paper("Ghost Paper", None, 2023, 500, "http://ghost.example"),
    ];
    let ranker = PaperRanker::new(FakeSource::Papers(papers));

    let outcome = ranker.rank_papers_for_author("12345", None, &profile()).await;

    assert!(outcome.is_failure());
}
