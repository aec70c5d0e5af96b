//! # error
//!
//! why: give every store failure a distinct, typed kind the caller can match on
//! relations: returned by file.rs, memory.rs and handle.rs
//! what: StoreError

use std::io;
use std::path::PathBuf;

use errlog_core::{RecordId, RecordIdError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A summary without an underlying error was handed to persist
    #[error("invariant violated: {reason}")]
    InvariantViolation { reason: String },

    /// Creating the log directory or writing a record failed
    #[error("failed to persist {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no error record with id {id}")]
    NotFound { id: RecordId },

    #[error("error record {id} can not be decoded: {source}")]
    CorruptRecord {
        id: RecordId,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    MalformedId(#[from] RecordIdError),

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Any other read failure (permissions, unreadable directory, ...)
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_record() {
        let err = StoreError::NotFound {
            id: RecordId::new(20241005194007042),
        };
        assert_eq!(err.to_string(), "no error record with id 20241005194007042");

        let err = StoreError::InvalidArgument {
            reason: "record id can not be empty".into(),
        };
        assert_eq!(err.to_string(), "invalid argument: record id can not be empty");
    }

    #[test]
    fn malformed_id_is_transparent() {
        let err: StoreError = RecordIdError::Malformed { id: "42".into() }.into();
        assert_eq!(
            err.to_string(),
            "record id 42 does not match timestamp pattern yyyyMMddHHmmssSSS"
        );
    }
}
