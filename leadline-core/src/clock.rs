use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use parking_lot::RwLock;

/// Source of "now" for stamping records and deciding what "today" is.
pub trait Clock: Send + Sync {
    /// Current wall-clock time, local and second-precise.
    fn now(&self) -> NaiveDateTime;

    /// Current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Clock backed by the local system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        // stored timestamps carry whole seconds only
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Manually driven clock, shared between clones.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Clock pinned to midday of the given date.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_hms_opt(12, 0, 0).unwrap_or_default())
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.write() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.write();
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.read()
    }
}
