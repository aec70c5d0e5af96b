//! # summary
//!
//! why: carry a resolved error from the point of failure to whoever shows it
//! relations: produced by resolver.rs, given a RecordId by errlog-store on persist
//! what: ErrorSummary and its JSON form for presentation

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::{FaultRef, RecordId, RecordIdError};

/// Short-lived description of one failure
///
/// The message never changes after construction. The record id is only
/// present once a log store has written the backing record.
#[derive(Debug, Clone)]
pub struct ErrorSummary {
    message: String,
    cause: Option<FaultRef>,
    record_id: Option<RecordId>,
    abstract_info: Option<String>,
}

impl ErrorSummary {
    pub fn new(message: impl Into<String>, cause: Option<FaultRef>) -> Self {
        Self {
            message: message.into(),
            cause,
            record_id: None,
            abstract_info: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&FaultRef> {
        self.cause.as_ref()
    }

    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    /// Decimal form of the record id, which is also the record's file name
    pub fn log_file_name(&self) -> Option<String> {
        self.record_id.map(|id| id.to_string())
    }

    pub fn abstract_info(&self) -> Option<&str> {
        self.abstract_info.as_deref()
    }

    /// Only changes this in-memory value; a persisted record keeps the
    /// abstract it was written with.
    pub fn set_abstract_info(&mut self, abstract_info: impl Into<String>) {
        self.abstract_info = Some(abstract_info.into());
    }

    /// When the backing record was written
    ///
    /// `None` before persisting; `Some(Err(..))` when the id does not parse
    /// back into a timestamp.
    pub fn create_time(&self) -> Option<Result<DateTime<Utc>, RecordIdError>> {
        self.record_id.map(RecordId::create_time)
    }

    /// Mark the summary as persisted under `id`
    ///
    /// Called by log stores once the record is on disk.
    pub fn with_record_id(mut self, id: RecordId) -> Self {
        self.record_id = Some(id);
        self
    }
}

// the cause is never serialized; the id goes out as a string because
// 17 digits do not survive a round trip through a javascript number
impl Serialize for ErrorSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ErrorSummary", 4)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("recordId", &self.log_file_name())?;
        state.serialize_field("abstractInfo", &self.abstract_info)?;
        state.serialize_field(
            "createTime",
            &self
                .create_time()
                .and_then(Result::ok)
                .map(|t| t.timestamp_millis()),
        )?;
        state.end()
    }
}
