//! Wall-clock abstraction for the page cache.

#[cfg(test)]
use std::sync::atomic::{AtomicI64, Ordering};
#[cfg(test)]
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to, for walking through the cache
/// window without sleeping.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ManualClock {
    millis: AtomicI64,
}

#[cfg(test)]
impl ManualClock {
    /// Creates a clock reading `seconds` after the Unix epoch.
    pub fn at_seconds(seconds: i64) -> Self {
        Self {
            millis: AtomicI64::new(seconds * 1000),
        }
    }

    /// Moves the clock to `seconds` after the Unix epoch (may go backwards).
    pub fn set_seconds(&self, seconds: i64) {
        self.millis.store(seconds * 1000, Ordering::SeqCst);
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let by = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.millis.fetch_add(by, Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}
