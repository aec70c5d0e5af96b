//! # codec
//!
//! why: one place that knows the on-disk encoding of a record
//! relations: used by file.rs on write and by handle sources on read
//! what: encode/decode LogRecord as json

use errlog_core::{LogRecord, RecordId};

use crate::error::{Result, StoreError};

pub fn encode(record: &LogRecord) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(record)
}

pub fn decode(id: RecordId, bytes: &[u8]) -> Result<LogRecord> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::CorruptRecord { id, source })
}
