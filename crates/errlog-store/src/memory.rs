//! # memory
//!
//! why: a LogStore with no filesystem, for tests and short-lived embedding
//! relations: same contract as file.rs, shares record_for and parse_requested_id
//! what: InMemoryLogStore

use std::collections::BTreeMap;
use std::sync::Arc;

use errlog_core::{Clock, ErrorSummary, LogRecord, RecordId, SystemClock};
use parking_lot::RwLock;

use crate::error::{Result, StoreError};
use crate::handle::{LogHandle, RecordSource};
use crate::{parse_requested_id, record_for, LogStore};

#[derive(Default)]
struct RecordMap {
    records: RwLock<BTreeMap<RecordId, LogRecord>>,
}

impl RecordSource for RecordMap {
    fn read_record(&self, id: RecordId) -> Result<LogRecord> {
        self.records
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }
}

/// in-memory log store for testing
///
/// stores all records in memory, nothing survives the process
pub struct InMemoryLogStore {
    records: Arc<RecordMap>,
    clock: Arc<dyn Clock>,
}

impl InMemoryLogStore {
    /// create a new in-memory store keyed by wall-clock time
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Arc::default(),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.records.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handle(&self, id: RecordId) -> LogHandle {
        LogHandle::new(id, self.records.clone())
    }
}

impl Default for InMemoryLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStore for InMemoryLogStore {
    fn persist(&self, summary: ErrorSummary) -> Result<ErrorSummary> {
        let record = record_for(&summary)?;
        let id = RecordId::from_time(self.clock.now());
        self.records.records.write().insert(id, record);
        Ok(summary.with_record_id(id))
    }

    fn list(&self) -> Result<Vec<LogHandle>> {
        let ids: Vec<RecordId> = self.records.records.read().keys().rev().copied().collect();
        Ok(ids.into_iter().map(|id| self.handle(id)).collect())
    }

    fn get(&self, id: &str) -> Result<LogHandle> {
        let id = parse_requested_id(id)?;
        Ok(self.handle(id))
    }
}
