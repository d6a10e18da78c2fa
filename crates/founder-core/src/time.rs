//! Wall-clock access behind a trait.
//!
//! The focus tracker and the simulation clock never read the system clock
//! directly; they ask a [`TimeSource`]. Production code uses
//! [`SystemTimeSource`]; tests drive a [`ManualTimeSource`] by hand.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};

/// A source of the current time.
pub trait TimeSource: core::fmt::Debug {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar day, used for daily resets.
    fn today(&self) -> NaiveDate;
}

/// The system clock, with the local calendar for [`TimeSource::today`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualTimeSource {
    /// Start the clock at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward by `secs` seconds (fractional allowed).
    pub fn advance_secs(&self, secs: f64) {
        let delta = TimeDelta::microseconds(secs_to_micros(secs));
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = now.checked_add_signed(delta).unwrap_or(*now);
    }

    /// Jump the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Convert seconds to whole microseconds, saturating at the `i64` range.
#[allow(clippy::cast_possible_truncation)]
pub fn secs_to_micros(secs: f64) -> i64 {
    if !secs.is_finite() {
        return 0;
    }
    // `as` saturates on overflow for float-to-int casts.
    (secs * 1_000_000.0).round() as i64
}

/// Length of `delta` in seconds.
#[allow(clippy::cast_precision_loss)]
pub fn delta_secs(delta: TimeDelta) -> f64 {
    delta
        .num_microseconds()
        .map_or_else(|| delta.num_milliseconds() as f64 / 1_000.0, |us| us as f64 / 1_000_000.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let clock = ManualTimeSource::new(start);
        let view = clock.clone();

        clock.advance_secs(1.5);
        assert!((delta_secs(view.now() - start) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn manual_today_follows_now() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 0).unwrap();
        let clock = ManualTimeSource::new(start);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        clock.advance_secs(120.0);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn non_finite_seconds_are_zero() {
        assert_eq!(secs_to_micros(f64::NAN), 0);
        assert_eq!(secs_to_micros(0.25), 250_000);
    }
}
