use std::path::Path;
use std::sync::Mutex;

use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::QueryParser;
use tantivy::schema::*;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, info};

use super::RecordStore;
use crate::error::{Result, ScoutError};
use crate::record::FacultyRecord;

const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Faculty record store backed by a Tantivy index
///
/// Each record is a single Tantivy document, so the primary data and the
/// keyword index can never drift apart: both are written by the same commit.
///
/// # Schema
///
/// - `id`: external identifier, the upsert key (STRING | STORED)
/// - `name`, `specialty`, `top_paper`: full-text searchable (TEXT)
/// - `record`: the complete record as JSON (STORED)
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use faculty_core::store::{KeywordRecordStore, RecordStore};
///
/// # fn main() -> faculty_core::Result<()> {
/// let store = KeywordRecordStore::open(Path::new("./data/faculty_index"))?;
/// for record in store.search("robotics")? {
///     println!("{}", record);
/// }
/// # Ok(())
/// # }
/// ```
pub struct KeywordRecordStore {
    index: Index,
    reader: IndexReader,
    fields: RecordFields,
    write_lock: Mutex<()>,
}

#[derive(Debug, Clone, Copy)]
struct RecordFields {
    id: Field,
    name: Field,
    specialty: Field,
    top_paper: Field,
    record: Field,
}

fn build_schema() -> (Schema, RecordFields) {
    let mut schema_builder = Schema::builder();

    let fields = RecordFields {
        id: schema_builder.add_text_field("id", STRING | STORED),
        name: schema_builder.add_text_field("name", TEXT),
        specialty: schema_builder.add_text_field("specialty", TEXT),
        top_paper: schema_builder.add_text_field("top_paper", TEXT),
        record: schema_builder.add_text_field("record", STORED),
    };

    (schema_builder.build(), fields)
}

impl KeywordRecordStore {
    /// Open the store at `index_path`, creating the directory and index if absent.
    ///
    /// Safe to call any number of times on the same path, including while
    /// another handle to the same index is alive.
    pub fn open(index_path: &Path) -> Result<Self> {
        let (schema, fields) = build_schema();

        std::fs::create_dir_all(index_path)?;
        let directory = MmapDirectory::open(index_path)
            .map_err(|e| ScoutError::Store(format!("{}: {}", index_path.display(), e)))?;
        let index = Index::open_or_create(directory, schema)?;

        info!("Opened faculty index at {}", index_path.display());
        Self::from_index(index, fields)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let (schema, fields) = build_schema();
        Self::from_index(Index::create_in_ram(schema), fields)
    }

    fn from_index(index: Index, fields: RecordFields) -> Result<Self> {
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            index,
            reader,
            fields,
            write_lock: Mutex::new(()),
        })
    }

    /// Number of records currently visible to searches
    pub fn count(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    fn to_document(&self, record: &FacultyRecord) -> Result<TantivyDocument> {
        let mut doc = TantivyDocument::new();
        doc.add_text(self.fields.id, &record.id);
        doc.add_text(self.fields.name, &record.name);
        doc.add_text(self.fields.specialty, &record.specialty);
        doc.add_text(self.fields.top_paper, &record.top_paper);
        doc.add_text(self.fields.record, serde_json::to_string(record)?);
        Ok(doc)
    }

    fn stage(&self, writer: &mut IndexWriter, records: &[FacultyRecord]) -> Result<()> {
        for record in records {
            writer.delete_term(Term::from_field_text(self.fields.id, &record.id));
            writer.add_document(self.to_document(record)?)?;
        }
        writer.commit()?;
        Ok(())
    }
}

impl RecordStore for KeywordRecordStore {
    fn save(&self, records: &[FacultyRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ScoutError::Store("writer lock poisoned".to_string()))?;

        let mut writer: IndexWriter = self.index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;
        if let Err(err) = self.stage(&mut writer, records) {
            writer.rollback()?;
            return Err(err);
        }

        self.reader.reload()?;
        info!("Saved {} faculty records", records.len());
        Ok(())
    }

    fn search(&self, keyword: &str) -> Result<Vec<FacultyRecord>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(vec![]);
        }

        let searcher = self.reader.searcher();
        let num_docs = searcher.num_docs() as usize;
        if num_docs == 0 {
            return Ok(vec![]);
        }

        let mut query_parser = QueryParser::for_index(
            &self.index,
            vec![self.fields.name, self.fields.specialty, self.fields.top_paper],
        );
        // Every term of a multi-word keyword must match, like an FTS MATCH.
        query_parser.set_conjunction_by_default();

        let (query, parse_errors) = query_parser.parse_query_lenient(keyword);
        if !parse_errors.is_empty() {
            debug!("Lenient parse of '{}' dropped {} clause(s)", keyword, parse_errors.len());
        }

        let top_docs = searcher.search(&query, &TopDocs::with_limit(num_docs))?;

        top_docs
            .into_iter()
            .map(|(_score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address)?;
                let json = doc
                    .get_first(self.fields.record)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| ScoutError::Store("document without stored record".to_string()))?;
                Ok(serde_json::from_str(json)?)
            })
            .collect()
    }
}
