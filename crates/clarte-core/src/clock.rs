//! Injected date/time source.
//!
//! Every "today" comparison in the crate goes through a [`Clock`], so day
//! rollover can be driven deterministically in tests.

use std::cell::Cell;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate};

/// Source of the current instant.
pub trait Clock {
    /// Current instant, carrying the local UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

/// Wall clock in the machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now: Cell::new(now) }
    }

    /// Parse an RFC 3339 instant, e.g. `2024-03-01T20:00:00+01:00`.
    ///
    /// # Panics
    /// Panics on malformed input; intended for tests and fixtures.
    pub fn at(rfc3339: &str) -> Self {
        let now = DateTime::parse_from_rfc3339(rfc3339)
            .unwrap_or_else(|e| panic!("invalid fixed clock instant {rfc3339:?}: {e}"));
        Self::new(now)
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_uses_local_offset() {
        // Still March 1st in UTC.
        let clock = FixedClock::at("2024-03-02T00:30:00+02:00");
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn advance_moves_now() {
        let clock = FixedClock::at("2024-03-01T23:59:00+00:00");
        clock.advance(Duration::minutes(2));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }
}
