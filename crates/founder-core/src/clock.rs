//! The focus-gated simulation clock.
//!
//! The outer loop hands the clock a raw frame delta; the clock returns the
//! simulated delta the services may spend. Simulated time only passes while
//! the clock is running and the player is focused. The tick counter counts
//! every frame, gated or not.
//!
//! All counters use checked arithmetic.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::focus::FocusSource;
use crate::time::{TimeSource, delta_secs};

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// The raw delta was negative or not a number.
    #[error("invalid frame delta: {delta}")]
    InvalidDelta {
        /// The rejected delta in seconds.
        delta: f64,
    },
}

/// Result of one [`SimulationClock::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockStep {
    /// Tick number after the advance.
    pub tick: u64,
    /// Simulated seconds granted for this tick.
    pub delta: f64,
}

/// Persisted part of the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    /// Frames processed.
    pub tick: u64,
    /// Total simulated seconds.
    pub simulated_secs: f64,
}

/// Frame counter plus the run flag and focus gate.
#[derive(Debug)]
pub struct SimulationClock {
    running: bool,
    tick: u64,
    simulated_secs: f64,
    started_at: DateTime<Utc>,
    time: Arc<dyn TimeSource>,
}

impl SimulationClock {
    /// Create a running clock at tick 0.
    pub fn new(time: Arc<dyn TimeSource>) -> Self {
        Self {
            running: true,
            tick: 0,
            simulated_secs: 0.0,
            started_at: time.now(),
            time,
        }
    }

    /// Toggle the external run flag (for example while a modal is open).
    pub const fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Whether the run flag is set.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The simulated delta for `raw` seconds of real time.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidDelta`] if `raw` is negative or not
    /// finite.
    pub fn effective_delta(&self, raw: f64, focus: &dyn FocusSource) -> Result<f64, ClockError> {
        if !raw.is_finite() || raw < 0.0 {
            return Err(ClockError::InvalidDelta { delta: raw });
        }
        Ok(if self.running && focus.is_focused() { raw } else { 0.0 })
    }

    /// Advance one frame.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidDelta`] for a bad `raw`, or
    /// [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self, raw: f64, focus: &dyn FocusSource) -> Result<ClockStep, ClockError> {
        let delta = self.effective_delta(raw, focus)?;
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        self.simulated_secs += delta;
        Ok(ClockStep {
            tick: self.tick,
            delta,
        })
    }

    /// Frames processed so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Total simulated seconds.
    pub const fn simulated_secs(&self) -> f64 {
        self.simulated_secs
    }

    /// The current wall-clock instant, unaffected by gating.
    pub fn now(&self) -> DateTime<Utc> {
        self.time.now()
    }

    /// Real seconds since the clock was created.
    pub fn realtime_secs(&self) -> f64 {
        delta_secs(self.time.now() - self.started_at)
    }

    /// Capture the counters.
    pub const fn capture(&self) -> ClockSnapshot {
        ClockSnapshot {
            tick: self.tick,
            simulated_secs: self.simulated_secs,
        }
    }

    /// Restore the counters. The run flag is left alone.
    pub fn restore(&mut self, snapshot: ClockSnapshot) {
        self.tick = snapshot.tick;
        self.simulated_secs = if snapshot.simulated_secs.is_finite() {
            snapshot.simulated_secs.max(0.0)
        } else {
            0.0
        };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::time::ManualTimeSource;

    fn clock() -> (SimulationClock, ManualTimeSource) {
        let time = ManualTimeSource::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        (SimulationClock::new(Arc::new(time.clone())), time)
    }

    #[test]
    fn unfocused_clock_grants_nothing() {
        let (clock, _) = clock();
        for raw in [0.0, 0.016, 1.0, 3_600.0] {
            assert!(clock.effective_delta(raw, &false).unwrap().abs() < f64::EPSILON);
            assert!((clock.effective_delta(raw, &true).unwrap() - raw).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn stopped_clock_grants_nothing_even_when_focused() {
        let (mut clock, _) = clock();
        clock.set_running(false);
        assert!(clock.effective_delta(0.5, &true).unwrap().abs() < f64::EPSILON);
        clock.set_running(true);
        assert!((clock.effective_delta(0.5, &true).unwrap() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn advance_counts_every_frame() {
        let (mut clock, _) = clock();
        let first = clock.advance(0.1, &true).unwrap();
        let second = clock.advance(0.1, &false).unwrap();
        assert_eq!(first.tick, 1);
        assert_eq!(second.tick, 2);
        assert!(second.delta.abs() < f64::EPSILON);
        assert!((clock.simulated_secs() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn invalid_delta_rejected() {
        let (mut clock, _) = clock();
        assert_eq!(clock.advance(-1.0, &true), Err(ClockError::InvalidDelta { delta: -1.0 }));
        assert!(clock.advance(f64::NAN, &true).is_err());
        assert_eq!(clock.tick(), 0);
    }

    #[test]
    fn tick_overflow_is_an_error() {
        let (mut clock, _) = clock();
        clock.restore(ClockSnapshot {
            tick: u64::MAX,
            simulated_secs: 0.0,
        });
        assert_eq!(clock.advance(0.1, &true), Err(ClockError::TickOverflow));
    }

    #[test]
    fn realtime_ignores_gating() {
        let (clock, time) = clock();
        time.advance_secs(2.5);
        assert!((clock.realtime_secs() - 2.5).abs() < 1e-9);
        assert!(clock.simulated_secs().abs() < f64::EPSILON);
    }
}
