//! # file
//!
//! why: persist error records as one small json file each, named by record id
//! relations: implements LogStore and, through RecordDir, the RecordSource behind its handles
//! what: FileLogStore

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use errlog_core::{Clock, ErrorSummary, LogRecord, RecordId, SystemClock};
use tempfile::NamedTempFile;
use tracing::{debug, info, trace, warn};

use crate::error::{Result, StoreError};
use crate::handle::{LogHandle, RecordSource};
use crate::{codec, parse_requested_id, record_for, LogStore, StoreConfig};

/// Directory of record files, shared between a store and its handles
struct RecordDir {
    dir: PathBuf,
}

impl RecordDir {
    fn path_of(&self, id: RecordId) -> PathBuf {
        self.dir.join(id.to_string())
    }
}

impl RecordSource for RecordDir {
    fn read_record(&self, id: RecordId) -> Result<LogRecord> {
        let path = self.path_of(id);
        let bytes = fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound { id },
            _ => StoreError::Io { path, source },
        })?;
        debug!(record_id = %id, len = bytes.len(), "read error record");
        codec::decode(id, &bytes)
    }
}

/// File-based log store
///
/// stores each record as `<dir>/<record id>`:
/// - content: json object with `abstract` and `detail`
/// - the directory is created on first persist, not on construction
pub struct FileLogStore {
    records: Arc<RecordDir>,
    clock: Arc<dyn Clock>,
}

impl FileLogStore {
    /// Store rooted at `dir`, keyed by wall-clock time
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    pub fn with_clock(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Arc::new(RecordDir { dir: dir.into() }),
            clock,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.error_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.records.dir
    }

    fn handle(&self, id: RecordId) -> LogHandle {
        LogHandle::new(id, self.records.clone())
    }

    // atomic write: temp file in the same directory, fsync, then rename
    fn write_atomic(&self, id: RecordId, bytes: &[u8]) -> Result<()> {
        let dir = &self.records.dir;
        // succeeds when another writer created it first
        fs::create_dir_all(dir).map_err(|source| StoreError::Persistence {
            path: dir.clone(),
            source,
        })?;

        let target = self.records.path_of(id);
        if target.exists() {
            warn!(record_id = %id, "error record id collision, overwriting earlier record");
        }

        let persistence = |source: io::Error| StoreError::Persistence {
            path: target.clone(),
            source,
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(persistence)?;
        temp.write_all(bytes).map_err(persistence)?;
        temp.as_file().sync_all().map_err(persistence)?;
        temp.persist(&target).map_err(|e| persistence(e.error))?;
        Ok(())
    }
}

impl LogStore for FileLogStore {
    fn persist(&self, summary: ErrorSummary) -> Result<ErrorSummary> {
        let record = record_for(&summary)?;
        let id = RecordId::from_time(self.clock.now());

        let bytes = codec::encode(&record).map_err(|e| StoreError::Persistence {
            path: self.records.path_of(id),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        self.write_atomic(id, &bytes)?;

        info!(record_id = %id, summary = summary.message(), "persisted error record");
        Ok(summary.with_record_id(id))
    }

    fn list(&self) -> Result<Vec<LogHandle>> {
        let dir = &self.records.dir;
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "error log directory does not exist yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: dir.clone(),
                    source,
                })
            }
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }

            let name = entry.file_name();
            let Some(name) = name.to_str().filter(|n| RecordId::matches_pattern(n)) else {
                trace!(entry = ?name, "skipping non-record entry");
                continue;
            };
            match name.parse::<RecordId>() {
                Ok(id) => ids.push(id),
                Err(e) => trace!(entry = name, error = %e, "skipping non-record entry"),
            }
        }

        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids.dedup();
        debug!(count = ids.len(), "listed error records");
        Ok(ids.into_iter().map(|id| self.handle(id)).collect())
    }

    fn get(&self, id: &str) -> Result<LogHandle> {
        let id = parse_requested_id(id)?;
        Ok(self.handle(id))
    }
}
