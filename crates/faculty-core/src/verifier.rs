use crate::openalex::Author;

/// Field every verified author must work in
pub const REQUIRED_FIELD: &str = "Computer Science";

/// How many of an author's leading topics are inspected for the field lock
pub const FIELD_LOCK_TOPICS: usize = 3;

/// A single acceptance rule applied to a hydrated author
pub trait AuthorCheck: Send + Sync {
    /// Whether the author passes this check
    fn check(&self, author: &Author) -> bool;

    /// Get the name of this check
    fn name(&self) -> &str;
}

/// The author's last known institutions include the resolved institution
pub struct AffiliationCheck {
    institution_id: String,
}

impl AffiliationCheck {
    pub fn new(institution_id: &str) -> Self {
        Self {
            institution_id: institution_id.to_string(),
        }
    }
}

impl AuthorCheck for AffiliationCheck {
    fn check(&self, author: &Author) -> bool {
        author
            .last_known_institution_ids()
            .any(|id| id == self.institution_id)
    }

    fn name(&self) -> &str {
        "affiliation"
    }
}

/// One of the author's first topics belongs to a required field
pub struct FieldLockCheck {
    field: String,
    top_n: usize,
}

impl FieldLockCheck {
    pub fn new(field: &str, top_n: usize) -> Self {
        Self {
            field: field.to_string(),
            top_n,
        }
    }
}

impl Default for FieldLockCheck {
    fn default() -> Self {
        Self::new(REQUIRED_FIELD, FIELD_LOCK_TOPICS)
    }
}

impl AuthorCheck for FieldLockCheck {
    fn check(&self, author: &Author) -> bool {
        author
            .topics()
            .iter()
            .take(self.top_n)
            .any(|topic| topic.field_name() == Some(self.field.as_str()))
    }

    fn name(&self) -> &str {
        "field-lock"
    }
}

/// A composite verifier that runs multiple checks
#[derive(Default)]
pub struct CompositeVerifier {
    checks: Vec<Box<dyn AuthorCheck>>,
}

impl CompositeVerifier {
    /// Create a new composite verifier
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// The standard faculty checks: affiliation plus the Computer Science field lock
    pub fn for_institution(institution_id: &str) -> Self {
        Self::new()
            .add_check(Box::new(AffiliationCheck::new(institution_id)))
            .add_check(Box::new(FieldLockCheck::default()))
    }

    /// Add a check to the composite
    pub fn add_check(mut self, check: Box<dyn AuthorCheck>) -> Self {
        self.checks.push(check);
        self
    }

    /// Name of the first check the author fails, or `None` if all pass
    pub fn first_failure(&self, author: &Author) -> Option<&str> {
        self.checks
            .iter()
            .find(|check| !check.check(author))
            .map(|check| check.name())
    }

    pub fn verify(&self, author: &Author) -> bool {
        self.first_failure(author).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openalex::{EntityRef, Topic, TopicField};

    const SCHOOL: &str = "https://openalex.org/I1";

    fn topic(field: &str) -> Topic {
        Topic {
            display_name: Some(format!("{} topic", field)),
            field: Some(TopicField {
                display_name: Some(field.to_string()),
            }),
        }
    }

    fn author(institutions: &[&str], fields: &[&str]) -> Author {
        Author {
            id: "https://openalex.org/A1".to_string(),
            display_name: Some("Dr. Test".to_string()),
            summary_stats: None,
            topics: Some(fields.iter().map(|f| topic(f)).collect()),
            last_known_institutions: Some(
                institutions
                    .iter()
                    .map(|id| EntityRef {
                        id: Some(id.to_string()),
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_accepts_cs_author_at_school() {
        let verifier = CompositeVerifier::for_institution(SCHOOL);
        assert!(verifier.verify(&author(&[SCHOOL], &["Computer Science"])));
    }

    #[test]
    fn test_rejects_author_elsewhere() {
        let verifier = CompositeVerifier::for_institution(SCHOOL);
        let moved = author(&["https://openalex.org/I2"], &["Computer Science"]);
        assert_eq!(verifier.first_failure(&moved), Some("affiliation"));
    }

    #[test]
    fn test_rejects_non_cs_author() {
        let verifier = CompositeVerifier::for_institution(SCHOOL);
        let chemist = author(&[SCHOOL], &["Chemistry"]);
        assert_eq!(verifier.first_failure(&chemist), Some("field-lock"));
    }

    #[test]
    fn test_field_lock_only_inspects_first_three_topics() {
        let verifier = CompositeVerifier::for_institution(SCHOOL);
        let third = author(&[SCHOOL], &["Chemistry", "Physics", "Computer Science"]);
        let fourth = author(
            &[SCHOOL],
            &["Chemistry", "Physics", "Medicine", "Computer Science"],
        );
        assert!(verifier.verify(&third));
        assert!(!verifier.verify(&fourth));
    }

    #[test]
    fn test_missing_topics_and_institutions_fail() {
        let verifier = CompositeVerifier::for_institution(SCHOOL);
        let bare = Author {
            id: "https://openalex.org/A9".to_string(),
            ..Default::default()
        };
        assert!(!verifier.verify(&bare));
    }

    #[test]
    fn test_empty_composite_accepts_everything() {
        let verifier = CompositeVerifier::new();
        assert!(verifier.verify(&Author::default()));
    }
}
