//! Injectable time source.
//!
//! Engine logic never reads the wall clock directly; every operation takes
//! its notion of "now" from a [`Clock`] supplied at construction. This keeps
//! the 6/8/10 classification, the midnight-crossing repair, and the December
//! 31 reset gate fully deterministic under test.

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate, NaiveDateTime};

/// A source of the current local time.
pub trait Clock: Send + Sync {
    /// Returns the current local timestamp.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// A [`Clock`] backed by the system wall clock in local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A settable [`Clock`] for deterministic tests.
///
/// Cloning shares the underlying instant, so an engine holding a clone
/// observes every [`FixedClock::set`] and [`FixedClock::advance`] made by
/// the test.
///
/// # Example
///
/// ```
/// use attendance_engine::clock::{Clock, FixedClock};
/// use chrono::{Duration, NaiveDate};
///
/// let clock = FixedClock::at(
///     NaiveDate::from_ymd_opt(2026, 3, 2)
///         .unwrap()
///         .and_hms_opt(9, 0, 0)
///         .unwrap(),
/// );
/// clock.advance(Duration::hours(8));
/// assert_eq!(clock.now().time().to_string(), "17:00:00");
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl FixedClock {
    /// Creates a clock frozen at the given instant.
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Moves the clock to a new instant.
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().expect("clock lock poisoned") = now;
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().expect("clock lock poisoned")
    }
}
