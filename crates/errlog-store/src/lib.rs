//! # errlog-store
//!
//! why: keep a durable, browsable record of every error that reached a user
//! relations: persists errlog-core summaries; read back through lazy LogHandles
//! what: LogStore trait, FileLogStore implementation, InMemoryLogStore for testing

pub mod codec;
pub mod config;
pub mod error;
pub mod file;
pub mod handle;
pub mod memory;

use errlog_core::{resolve, ErrorSummary, LogRecord, RecordId, RecordIdError};

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use file::FileLogStore;
pub use handle::{LogHandle, RecordSource};
pub use memory::InMemoryLogStore;

/// A place error records are written to and read back from
///
/// Both implementations key records by the time they were persisted, so
/// listing order is newest first.
pub trait LogStore {
    /// Write the summary's underlying error as a new record and return the
    /// summary with its record id set
    fn persist(&self, summary: ErrorSummary) -> Result<ErrorSummary>;

    /// Ids of all records, newest first, as handles that have not read anything
    fn list(&self) -> Result<Vec<LogHandle>>;

    /// Handle for the record with the given id; existence is checked on first read
    fn get(&self, id: &str) -> Result<LogHandle>;

    /// Resolve `error` and persist the result in one step
    fn capture(&self, error: anyhow::Error) -> Result<ErrorSummary> {
        self.persist(resolve(error))
    }
}

/// Build the record body for a summary about to be persisted
pub(crate) fn record_for(summary: &ErrorSummary) -> Result<LogRecord> {
    let cause = summary
        .cause()
        .ok_or_else(|| StoreError::InvariantViolation {
            reason: "exception can not be null: summary has no underlying error to log".into(),
        })?;
    Ok(LogRecord::new(cause.message(), cause.render_trace()))
}

/// Validate an id handed in from outside, e.g. a user-supplied correlation code
pub(crate) fn parse_requested_id(id: &str) -> Result<RecordId> {
    id.parse().map_err(|err: RecordIdError| StoreError::InvalidArgument {
        reason: err.to_string(),
    })
}
