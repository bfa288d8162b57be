//! Record store - Persistence and keyword retrieval of faculty records
//!
//! The discovery pipeline only sees the [`RecordStore`] capability, so the
//! indexed-text backend can be swapped without touching pipeline logic.

pub mod keyword;

pub use keyword::KeywordRecordStore;

use crate::error::Result;
use crate::record::FacultyRecord;

/// Capability interface for a keyword-searchable faculty cache
pub trait RecordStore: Send + Sync {
    /// Upsert every record by id.
    ///
    /// When this returns `Ok`, all records of the batch are durable and
    /// visible to [`RecordStore::search`].
    fn save(&self, records: &[FacultyRecord]) -> Result<()>;

    /// All records whose indexed text (name, specialty, top paper) matches `keyword`.
    ///
    /// No ordering is guaranteed. An empty or unmatched keyword yields an empty list.
    fn search(&self, keyword: &str) -> Result<Vec<FacultyRecord>>;
}

impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    fn save(&self, records: &[FacultyRecord]) -> Result<()> {
        (**self).save(records)
    }

    fn search(&self, keyword: &str) -> Result<Vec<FacultyRecord>> {
        (**self).search(keyword)
    }
}
