use serde::{Deserialize, Serialize};
use std::fmt;

/// A verified faculty member, keyed by their external (OpenAlex) id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyRecord {
    pub name: String,
    pub id: String,
    pub h_index: u32,
    pub specialty: String,
    pub top_paper: String,
    pub last_known_institution: String,
}

impl fmt::Display for FacultyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | h-index: {} | Focus: {}",
            self.name, self.h_index, self.specialty
        )
    }
}

/// What a student knows and wants to work on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl StudentProfile {
    pub fn new(skills: Vec<String>, interests: Vec<String>) -> Self {
        Self { skills, interests }
    }

    /// Lower-cased keyword set: interests first, then skills.
    ///
    /// Blank entries are skipped and duplicates collapse (first occurrence wins),
    /// so the order of matched keywords is deterministic.
    pub fn keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        for raw in self.interests.iter().chain(self.skills.iter()) {
            let keyword = raw.trim().to_lowercase();
            if keyword.is_empty() || keywords.contains(&keyword) {
                continue;
            }
            keywords.push(keyword);
        }
        keywords
    }
}

/// A paper scored against a student profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperScore {
    pub title: String,
    pub year: i32,
    pub url: Option<String>,
    pub relevance_score: f64,
    pub matched_keywords: Vec<String>,
    pub abstract_snippet: String,
}
