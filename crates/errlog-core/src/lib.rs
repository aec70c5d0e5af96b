//! # errlog-core
//!
//! why: resolve caught errors into user-facing summaries without touching disk
//! relations: errlog-store persists the summaries and records defined here
//! what: domain error type, cause chain walking, resolver, summary, record id, clock

pub mod chain;
pub mod clock;
pub mod domain;
pub mod record;
pub mod resolver;
pub mod summary;

pub use chain::{root_cause_message, FaultRef};
pub use clock::{Clock, FixedClock, SteppingClock, SystemClock};
pub use domain::DomainError;
pub use record::{LogRecord, RecordId, RecordIdError, RECORD_ID_WIDTH, TIMESTAMP_PATTERN};
pub use resolver::resolve;
pub use summary::ErrorSummary;
