//! # clock
//!
//! why: make "now" injectable so record ids are predictable under test
//! relations: consulted by errlog-store when assigning a RecordId
//! what: Clock trait, SystemClock, FixedClock, SteppingClock

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Starts at a given instant and advances by a fixed step on every read
#[derive(Debug)]
pub struct SteppingClock {
    start: DateTime<Utc>,
    step_ms: i64,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step_ms: i64) -> Self {
        Self {
            start,
            step_ms,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        self.start + Duration::milliseconds(tick * self.step_ms)
    }
}
