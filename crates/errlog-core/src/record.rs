//! # record
//!
//! why: define what a persisted error record is and how it is keyed
//! relations: built by errlog-store on persist, decoded by its lazy handles
//! what: LogRecord, RecordId (fixed-width millisecond timestamp), RecordIdError

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timestamp layout of a record id, one character per digit
pub const TIMESTAMP_PATTERN: &str = "yyyyMMddHHmmssSSS";

/// Number of decimal digits in a well-formed record id
pub const RECORD_ID_WIDTH: usize = TIMESTAMP_PATTERN.len();

/// The body of one persisted error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// The failing error's own message
    #[serde(rename = "abstract")]
    pub abstract_info: String,
    /// Full trace text, usually multi-line
    pub detail: String,
}

impl LogRecord {
    pub fn new(abstract_info: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            abstract_info: abstract_info.into(),
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordIdError {
    #[error("record id can not be empty")]
    Empty,
    #[error("record id {id:?} is not a decimal number")]
    NotNumeric { id: String },
    #[error("record id {id} does not match timestamp pattern {pattern}", pattern = TIMESTAMP_PATTERN)]
    Malformed { id: String },
}

/// Primary key of a record: the UTC creation time rendered as
/// `yyyyMMddHHmmssSSS` and read back as a number
///
/// Numeric order equals chronological order, and the decimal form is the
/// record's file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Key for a record created at `time`
    ///
    /// Years outside 0..=9999 are clamped; ids for years before 1000 come
    /// out shorter than the fixed width and will not be listed.
    pub fn from_time(time: DateTime<Utc>) -> Self {
        let year = time.year().clamp(0, 9999) as u64;
        // leap seconds report 1000+ millis
        let millis = time.timestamp_subsec_millis().min(999) as u64;

        let raw = year * 10_000_000_000_000
            + time.month() as u64 * 100_000_000_000
            + time.day() as u64 * 1_000_000_000
            + time.hour() as u64 * 10_000_000
            + time.minute() as u64 * 100_000
            + time.second() as u64 * 1_000
            + millis;
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Parse the id back into the time it encodes
    pub fn create_time(self) -> Result<DateTime<Utc>, RecordIdError> {
        let text = self.0.to_string();
        let malformed = || RecordIdError::Malformed { id: text.clone() };
        if text.len() != RECORD_ID_WIDTH {
            return Err(malformed());
        }

        let field = |from: usize, to: usize| -> u32 {
            // all ascii digits, checked by the width test above
            text[from..to].parse().unwrap_or(u32::MAX)
        };
        let naive = NaiveDate::from_ymd_opt(field(0, 4) as i32, field(4, 6), field(6, 8))
            .and_then(|date| {
                date.and_hms_milli_opt(field(8, 10), field(10, 12), field(12, 14), field(14, 17))
            })
            .ok_or_else(malformed)?;
        Ok(Utc.from_utc_datetime(&naive))
    }

    /// True when `name` has exactly the shape of a record file name
    pub fn matches_pattern(name: &str) -> bool {
        name.len() == RECORD_ID_WIDTH && name.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(RecordIdError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RecordIdError::NotNumeric { id: s.to_owned() });
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| RecordIdError::NotNumeric { id: s.to_owned() })
    }
}
