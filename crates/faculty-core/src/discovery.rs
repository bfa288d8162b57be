//! Faculty discovery pipeline
//!
//! Cache first, then OpenAlex in three stages:
//!
//! ```text
//! store.search(skill) --hit at school--> sort by h-index --> top `limit`
//!        |
//!       miss
//!        v
//! institutions --> works (affiliated authorships) --> authors (batches of 50)
//!        --> affiliation + Computer Science field lock --> save all --> top `limit`
//! ```

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::Result;
use crate::openalex::{Author, Institution, ScholarlyIndex, Work, AUTHOR_BATCH_SIZE};
use crate::record::FacultyRecord;
use crate::store::RecordStore;
use crate::verifier::CompositeVerifier;

/// Default number of experts returned
pub const DEFAULT_LIMIT: usize = 10;

/// Specialty recorded for authors without any topics
pub const DEFAULT_SPECIALTY: &str = "AI";

/// Candidate authors in first-encounter order, each with one representative title
#[derive(Debug, Default)]
pub struct CandidateAuthors {
    order: Vec<String>,
    titles: HashMap<String, String>,
}

impl CandidateAuthors {
    /// Collect authors affiliated with `institution_id` from the given works.
    ///
    /// The first title seen for an author is kept; later works do not overwrite it.
    pub fn from_works(works: &[Work], institution_id: &str) -> Self {
        let mut candidates = Self::default();
        for work in works {
            let title = work.title.clone().unwrap_or_default();
            for authorship in work.authorships.iter().flatten() {
                if !authorship.is_affiliated_with(institution_id) {
                    continue;
                }
                if let Some(author_id) = authorship.author_id() {
                    candidates.insert(author_id, &title);
                }
            }
        }
        candidates
    }

    fn insert(&mut self, author_id: &str, title: &str) {
        if self.titles.contains_key(author_id) {
            return;
        }
        self.order.push(author_id.to_string());
        self.titles.insert(author_id.to_string(), title.to_string());
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn title_for(&self, author_id: &str) -> Option<&str> {
        self.titles.get(author_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Stable sort by descending h-index; ties keep encounter order
pub fn sort_by_h_index(records: &mut [FacultyRecord]) {
    records.sort_by(|a, b| b.h_index.cmp(&a.h_index));
}

/// Finds verified faculty for a school and skill
pub struct FacultyDiscovery<S, A> {
    store: S,
    api: A,
}

impl<S: RecordStore, A: ScholarlyIndex> FacultyDiscovery<S, A> {
    pub fn new(store: S, api: A) -> Self {
        Self { store, api }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Experts in `skill_keyword` at `school_name`, highest h-index first.
    ///
    /// Returns at most `limit` records. The full verified list is written back
    /// to the store on a cache miss.
    pub async fn discover(
        &self,
        school_name: &str,
        skill_keyword: &str,
        limit: usize,
    ) -> Result<Vec<FacultyRecord>> {
        if let Some(mut cached) = self.cached_experts(school_name, skill_keyword)? {
            info!("Found {} experts in local cache", cached.len());
            sort_by_h_index(&mut cached);
            cached.truncate(limit);
            return Ok(cached);
        }

        info!("Cache miss. Fetching {} experts from OpenAlex...", skill_keyword);

        let institutions = self.api.search_institutions(school_name).await?;
        let Some(institution) = institutions.into_iter().next() else {
            info!("No institution found for '{}'", school_name);
            return Ok(vec![]);
        };
        debug!("Resolved '{}' to {} ({})", school_name, institution.display_name, institution.id);

        let works = self.api.search_works(&institution.id, skill_keyword).await?;
        let candidates = CandidateAuthors::from_works(&works, &institution.id);
        debug!("{} works yielded {} candidate authors", works.len(), candidates.len());

        let authors = self.hydrate(candidates.ids()).await?;
        let mut verified = verify_authors(&authors, &candidates, &institution);
        sort_by_h_index(&mut verified);

        self.store.save(&verified)?;
        info!("Verified {} experts at {}", verified.len(), institution.display_name);

        verified.truncate(limit);
        Ok(verified)
    }

    fn cached_experts(
        &self,
        school_name: &str,
        skill_keyword: &str,
    ) -> Result<Option<Vec<FacultyRecord>>> {
        let school = school_name.to_lowercase();
        let matches: Vec<FacultyRecord> = self
            .store
            .search(skill_keyword)?
            .into_iter()
            .filter(|record| record.last_known_institution.to_lowercase().contains(&school))
            .collect();

        Ok((!matches.is_empty()).then_some(matches))
    }

    /// Fetch authors batch by batch, merging into one list
    async fn hydrate(&self, author_ids: &[String]) -> Result<Vec<Author>> {
        let mut authors = Vec::with_capacity(author_ids.len());
        for batch in author_ids.chunks(AUTHOR_BATCH_SIZE) {
            authors.extend(self.api.lookup_authors(batch).await?);
        }
        Ok(authors)
    }
}

/// Keep authors passing every check and turn them into records
pub fn verify_authors(
    authors: &[Author],
    candidates: &CandidateAuthors,
    institution: &Institution,
) -> Vec<FacultyRecord> {
    let verifier = CompositeVerifier::for_institution(&institution.id);

    authors
        .iter()
        .filter_map(|author| {
            let Some(top_paper) = candidates.title_for(&author.id) else {
                debug!("Dropping {}: not a candidate", author.id);
                return None;
            };
            if let Some(failed) = verifier.first_failure(author) {
                debug!("Dropping {}: failed {} check", author.id, failed);
                return None;
            }

            let specialty = author
                .topics()
                .first()
                .and_then(|topic| topic.display_name.clone())
                .unwrap_or_else(|| DEFAULT_SPECIALTY.to_string());

            Some(FacultyRecord {
                name: author.display_name.clone().unwrap_or_default(),
                id: author.id.clone(),
                h_index: author.h_index(),
                specialty,
                top_paper: top_paper.to_string(),
                last_known_institution: institution.display_name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openalex::{Authorship, EntityRef};

    const SCHOOL: &str = "https://openalex.org/I1";

    fn entity(id: &str) -> EntityRef {
        EntityRef {
            id: Some(id.to_string()),
        }
    }

    fn work(title: &str, authors: &[(&str, &str)]) -> Work {
        Work {
            title: Some(title.to_string()),
            authorships: Some(
                authors
                    .iter()
                    .map(|(author, inst)| Authorship {
                        author: Some(entity(author)),
                        institutions: Some(vec![entity(inst)]),
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_first_seen_title_wins() {
        let works = vec![
            work("First", &[("A1", SCHOOL)]),
            work("Second", &[("A1", SCHOOL), ("A2", SCHOOL)]),
        ];
        let candidates = CandidateAuthors::from_works(&works, SCHOOL);

        assert_eq!(candidates.ids(), &["A1".to_string(), "A2".to_string()]);
        assert_eq!(candidates.title_for("A1"), Some("First"));
        assert_eq!(candidates.title_for("A2"), Some("Second"));
    }

    #[test]
    fn test_unaffiliated_authorships_are_skipped() {
        let works = vec![work("Joint", &[("A1", SCHOOL), ("A2", "https://openalex.org/I9")])];
        let candidates = CandidateAuthors::from_works(&works, SCHOOL);
        assert_eq!(candidates.ids(), &["A1".to_string()]);
    }

    #[test]
    fn test_authorship_without_author_id_is_skipped() {
        let works = vec![Work {
            title: Some("Anonymous".to_string()),
            authorships: Some(vec![Authorship {
                author: None,
                institutions: Some(vec![entity(SCHOOL)]),
            }]),
        }];
        assert!(CandidateAuthors::from_works(&works, SCHOOL).is_empty());
    }

    #[test]
    fn test_sort_is_stable_descending() {
        let make = |id: &str, h: u32| FacultyRecord {
            name: id.to_string(),
            id: id.to_string(),
            h_index: h,
            specialty: String::new(),
            top_paper: String::new(),
            last_known_institution: String::new(),
        };
        let mut records = vec![make("a", 5), make("b", 9), make("c", 5), make("d", 9)];
        sort_by_h_index(&mut records);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }
}
