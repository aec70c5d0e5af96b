//! # handle
//!
//! why: let callers hold on to a record without paying for its content until asked
//! relations: handed out by LogStore::list and LogStore::get, reads through a RecordSource
//! what: RecordSource trait, LogHandle (lazy, memoized, single-flight)

use std::fmt;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use errlog_core::{LogRecord, RecordId};
use parking_lot::Mutex;

use crate::error::Result;

/// Read access to persisted records
///
/// Implemented by each store so handles can load content on demand.
pub trait RecordSource: Send + Sync {
    /// Load and decode one record
    fn read_record(&self, id: RecordId) -> Result<LogRecord>;
}

/// Lazy view of one persisted record
///
/// Nothing is read until `detail` or `abstract_info` is called. The first
/// successful read is cached for the handle's lifetime; concurrent first
/// calls wait on one another so the source is read once.
pub struct LogHandle {
    id: RecordId,
    source: Arc<dyn RecordSource>,
    record: OnceLock<LogRecord>,
    loading: Mutex<()>,
}

impl LogHandle {
    pub fn new(id: RecordId, source: Arc<dyn RecordSource>) -> Self {
        Self {
            id,
            source,
            record: OnceLock::new(),
            loading: Mutex::new(()),
        }
    }

    pub fn record_id(&self) -> RecordId {
        self.id
    }

    /// Full trace text of the record
    pub fn detail(&self) -> Result<&str> {
        Ok(&self.load()?.detail)
    }

    /// The failing error's own message, as written at persist time
    pub fn abstract_info(&self) -> Result<&str> {
        Ok(&self.load()?.abstract_info)
    }

    /// When the record was written, parsed from its id alone
    pub fn create_time(&self) -> Result<DateTime<Utc>> {
        Ok(self.id.create_time()?)
    }

    /// Whether content has already been read
    pub fn is_loaded(&self) -> bool {
        self.record.get().is_some()
    }

    fn load(&self) -> Result<&LogRecord> {
        if let Some(record) = self.record.get() {
            return Ok(record);
        }

        let _guard = self.loading.lock();
        // another caller may have finished while we waited
        if let Some(record) = self.record.get() {
            return Ok(record);
        }
        let record = self.source.read_record(self.id)?;
        Ok(self.record.get_or_init(|| record))
    }
}

impl fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogHandle")
            .field("id", &self.id)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
