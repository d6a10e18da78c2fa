//! Focus session tracking with debounce and minimum-session gating.
//!
//! ```text
//! Unfocused --gain--> Debouncing --debounce elapsed, host focused--> Focused
//!     ^                   |                                           |
//!     +------ loss -------+------------- loss or pause ---------------+
//! ```
//!
//! Deferred work (the debounce and the session-start check) is modeled as
//! pending timers identified by a [`TimerHandle`]. Scheduling a timer bumps
//! a generation counter; a handle whose generation no longer matches the
//! pending timer is stale and firing it does nothing. The host either calls
//! [`FocusTracker::poll`] each frame or fires handles itself.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use founder_events::EventBus;
use founder_types::GameEvent;

use crate::config::FocusConfig;
use crate::time::{TimeSource, delta_secs, secs_to_micros};

/// Anything that can say whether the player is currently focused.
pub trait FocusSource {
    /// Whether simulation time may advance.
    fn is_focused(&self) -> bool;
}

/// Which deferred callback a [`TimerHandle`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Acceptance of a focus-gain signal.
    Debounce,
    /// The minimum-session check after focus was accepted.
    SessionStart,
}

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    /// What the timer does when it fires.
    pub kind: TimerKind,
    /// Generation the timer was scheduled in.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    due: DateTime<Utc>,
}

/// Persisted part of the tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusSnapshot {
    /// Validated focus seconds accumulated on `last_reset_date`.
    pub total_focus_today_secs: f64,
    /// Calendar day the total belongs to.
    pub last_reset_date: Option<NaiveDate>,
}

/// Observes host focus signals and publishes session lifecycle events.
#[derive(Debug)]
pub struct FocusTracker {
    config: FocusConfig,
    bus: EventBus,
    time: Arc<dyn TimeSource>,
    /// Last focus state reported by the host.
    host_focused: bool,
    paused: bool,
    focused: bool,
    focused_at: Option<DateTime<Utc>>,
    total_today_secs: f64,
    last_reset_date: Option<NaiveDate>,
    generation: u64,
    debounce: Option<PendingTimer>,
    session_start: Option<PendingTimer>,
}

impl FocusTracker {
    /// Create an unfocused tracker.
    pub fn new(config: FocusConfig, bus: EventBus, time: Arc<dyn TimeSource>) -> Self {
        Self {
            config,
            bus,
            time,
            host_focused: false,
            paused: false,
            focused: false,
            focused_at: None,
            total_today_secs: 0.0,
            last_reset_date: None,
            generation: 0,
            debounce: None,
            session_start: None,
        }
    }

    /// The host reports the application gained focus.
    ///
    /// Starts (or restarts) the debounce and returns its handle. Returns
    /// `None` when already focused or while paused.
    pub fn host_focus_gained(&mut self) -> Option<TimerHandle> {
        self.host_focused = true;
        if self.paused || self.focused {
            return None;
        }
        Some(self.start_debounce())
    }

    /// The host reports the application lost focus.
    pub fn host_focus_lost(&mut self) {
        self.host_focused = false;
        self.lose_focus();
    }

    /// Pause the game. Ends any session in progress.
    pub fn pause(&mut self) {
        self.paused = true;
        self.lose_focus();
    }

    /// Resume after a pause. Behaves like a fresh focus-gain signal.
    pub fn resume(&mut self) -> Option<TimerHandle> {
        self.paused = false;
        self.host_focus_gained()
    }

    /// Fire every pending timer whose due time has passed.
    ///
    /// Returns how many timers fired.
    pub fn poll(&mut self) -> usize {
        let now = self.time.now();
        let mut fired = 0_usize;
        if let Some(timer) = self.debounce
            && timer.due <= now
            && self.fire(timer.handle)
        {
            fired = fired.saturating_add(1);
        }
        // Accepting focus may have scheduled a session check that is
        // already due.
        if let Some(timer) = self.session_start
            && timer.due <= now
            && self.fire(timer.handle)
        {
            fired = fired.saturating_add(1);
        }
        fired
    }

    /// Run the callback behind `handle` now.
    ///
    /// Returns `false` for stale handles and for callbacks whose condition
    /// no longer holds.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        match handle.kind {
            TimerKind::Debounce => {
                let Some(timer) = self.debounce.filter(|t| t.handle == handle) else {
                    debug!(generation = handle.generation, "stale debounce ignored");
                    return false;
                };
                self.debounce = None;
                if !self.host_focused || self.paused {
                    return false;
                }
                self.gain_focus(timer.due.min(self.time.now()));
                true
            }
            TimerKind::SessionStart => {
                if self.session_start.is_none_or(|t| t.handle != handle) {
                    return false;
                }
                self.session_start = None;
                match (self.focused, self.focused_at) {
                    (true, Some(at)) => {
                        info!(%at, "focus session started");
                        self.bus.publish(&GameEvent::SessionStarted { at });
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    /// Whether focus has been accepted and not lost since.
    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// Whether the game is paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether a debounce is pending.
    pub const fn is_debouncing(&self) -> bool {
        self.debounce.is_some()
    }

    /// When the current focus period began.
    pub const fn focused_at(&self) -> Option<DateTime<Utc>> {
        self.focused_at
    }

    /// Seconds since focus was accepted, zero when unfocused.
    pub fn current_session_secs(&self) -> f64 {
        match (self.focused, self.focused_at) {
            (true, Some(at)) => delta_secs(self.time.now() - at).max(0.0),
            _ => 0.0,
        }
    }

    /// Validated focus seconds today plus the session in progress.
    pub fn total_focus_today_secs(&self) -> f64 {
        self.total_today_secs + self.current_session_secs()
    }

    /// Calendar day the daily total belongs to.
    pub const fn last_reset_date(&self) -> Option<NaiveDate> {
        self.last_reset_date
    }

    /// Capture the persisted part of the tracker.
    pub const fn capture(&self) -> FocusSnapshot {
        FocusSnapshot {
            total_focus_today_secs: self.total_today_secs,
            last_reset_date: self.last_reset_date,
        }
    }

    /// Restore the daily total. Live focus state is left alone.
    pub fn restore(&mut self, snapshot: &FocusSnapshot) {
        self.total_today_secs = if snapshot.total_focus_today_secs.is_finite() {
            snapshot.total_focus_today_secs.max(0.0)
        } else {
            0.0
        };
        self.last_reset_date = snapshot.last_reset_date;
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn start_debounce(&mut self) -> TimerHandle {
        let handle = self.next_handle(TimerKind::Debounce);
        let due = after(self.time.now(), self.config.debounce_secs);
        self.debounce = Some(PendingTimer { handle, due });
        debug!(generation = handle.generation, "focus debounce started");
        handle
    }

    fn gain_focus(&mut self, at: DateTime<Utc>) {
        let today = self.time.today();
        if self.last_reset_date != Some(today) {
            if self.last_reset_date.is_some() {
                info!(%today, previous_secs = self.total_today_secs, "daily focus total reset");
            }
            self.total_today_secs = 0.0;
            self.last_reset_date = Some(today);
        }

        self.focused = true;
        self.focused_at = Some(at);
        self.bus.publish(&GameEvent::FocusGained);

        let handle = self.next_handle(TimerKind::SessionStart);
        let due = after(at, self.config.min_session_secs);
        self.session_start = Some(PendingTimer { handle, due });
        debug!(%at, "focus accepted");
    }

    fn lose_focus(&mut self) {
        self.debounce = None;
        self.session_start = None;
        self.generation = self.generation.wrapping_add(1);

        if !self.focused {
            return;
        }
        let now = self.time.now();
        if let Some(at) = self.focused_at {
            let duration_secs = delta_secs(now - at).max(0.0);
            if duration_secs >= self.config.min_session_secs {
                self.total_today_secs += duration_secs;
                info!(duration_secs, total_secs = self.total_today_secs, "focus session ended");
                self.bus.publish(&GameEvent::SessionEnded {
                    at: now,
                    duration_secs,
                });
            } else {
                debug!(duration_secs, "focus period below minimum session; not counted");
            }
        }
        self.focused = false;
        self.focused_at = None;
        self.bus.publish(&GameEvent::FocusLost);
    }

    fn next_handle(&mut self, kind: TimerKind) -> TimerHandle {
        self.generation = self.generation.wrapping_add(1);
        TimerHandle {
            kind,
            generation: self.generation,
        }
    }
}

fn after(from: DateTime<Utc>, secs: f64) -> DateTime<Utc> {
    from.checked_add_signed(TimeDelta::microseconds(secs_to_micros(secs)))
        .unwrap_or(from)
}

impl FocusSource for FocusTracker {
    fn is_focused(&self) -> bool {
        self.focused
    }
}

impl FocusSource for bool {
    fn is_focused(&self) -> bool {
        *self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use founder_types::EventKind;

    use super::*;
    use crate::testing::Recorder;
    use crate::time::ManualTimeSource;

    fn tracker() -> (FocusTracker, ManualTimeSource, Recorder) {
        let clock = ManualTimeSource::new(Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap());
        let bus = EventBus::new();
        let recorder = Recorder::attach(&bus);
        let tracker = FocusTracker::new(FocusConfig::default(), bus, Arc::new(clock.clone()));
        (tracker, clock, recorder)
    }

    #[test]
    fn debounce_delays_focus() {
        let (mut tracker, clock, recorder) = tracker();
        tracker.host_focus_gained();
        clock.advance_secs(0.5);
        tracker.poll();
        assert!(!tracker.focused());
        assert!(recorder.kinds().is_empty());

        clock.advance_secs(0.5);
        tracker.poll();
        assert!(tracker.focused());
        assert_eq!(recorder.kinds(), vec![EventKind::FocusGained]);
    }

    #[test]
    fn losing_focus_during_debounce_cancels_it() {
        let (mut tracker, clock, recorder) = tracker();
        let handle = tracker.host_focus_gained().unwrap();
        clock.advance_secs(0.5);
        tracker.host_focus_lost();
        clock.advance_secs(2.0);

        assert!(!tracker.fire(handle));
        assert_eq!(tracker.poll(), 0);
        assert!(!tracker.focused());
        assert!(recorder.kinds().is_empty());
    }

    #[test]
    fn new_gain_signal_supersedes_pending_debounce() {
        let (mut tracker, clock, _recorder) = tracker();
        let first = tracker.host_focus_gained().unwrap();
        clock.advance_secs(0.8);
        let second = tracker.host_focus_gained().unwrap();
        assert_ne!(first.generation, second.generation);

        assert!(!tracker.fire(first));
        clock.advance_secs(0.3);
        tracker.poll();
        assert!(!tracker.focused());
        clock.advance_secs(0.7);
        tracker.poll();
        assert!(tracker.focused());
    }

    #[test]
    fn short_session_is_not_counted() {
        let (mut tracker, clock, recorder) = tracker();
        tracker.host_focus_gained();
        clock.advance_secs(1.0);
        tracker.poll();
        clock.advance_secs(1.5);
        tracker.poll();
        tracker.host_focus_lost();

        assert_eq!(recorder.kinds(), vec![EventKind::FocusGained, EventKind::FocusLost]);
        assert!(tracker.total_focus_today_secs().abs() < 1e-9);
    }

    #[test]
    fn long_session_starts_and_ends() {
        let (mut tracker, clock, recorder) = tracker();
        tracker.host_focus_gained();
        clock.advance_secs(1.0);
        tracker.poll();
        clock.advance_secs(5.0);
        tracker.poll();
        tracker.host_focus_lost();

        assert_eq!(
            recorder.kinds(),
            vec![
                EventKind::FocusGained,
                EventKind::SessionStarted,
                EventKind::SessionEnded,
                EventKind::FocusLost,
            ]
        );
        let ended = recorder
            .events()
            .into_iter()
            .find_map(|e| match e {
                GameEvent::SessionEnded { duration_secs, .. } => Some(duration_secs),
                _ => None,
            })
            .unwrap();
        assert!((ended - 5.0).abs() < 1e-6);
        assert!((tracker.total_focus_today_secs() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn pause_ends_session_and_resume_debounces_again() {
        let (mut tracker, clock, recorder) = tracker();
        tracker.host_focus_gained();
        clock.advance_secs(1.0);
        tracker.poll();
        tracker.pause();
        assert!(!tracker.focused());
        assert!(tracker.host_focus_gained().is_none());

        tracker.resume().unwrap();
        clock.advance_secs(1.0);
        tracker.poll();
        assert!(tracker.focused());
        assert_eq!(recorder.count(EventKind::FocusGained), 2);
        assert_eq!(recorder.count(EventKind::FocusLost), 1);
    }

    #[test]
    fn daily_total_resets_on_new_day() {
        let (mut tracker, clock, _recorder) = tracker();
        tracker.host_focus_gained();
        clock.advance_secs(1.0);
        tracker.poll();
        clock.advance_secs(10.0);
        tracker.host_focus_lost();
        assert!((tracker.total_focus_today_secs() - 10.0).abs() < 1e-6);

        clock.advance_secs(24.0 * 3_600.0);
        // Not reset until focus is gained again.
        assert!((tracker.total_focus_today_secs() - 10.0).abs() < 1e-6);
        tracker.host_focus_gained();
        clock.advance_secs(1.0);
        tracker.poll();
        assert!(tracker.total_focus_today_secs() < 1.0);
        assert_eq!(tracker.last_reset_date(), Some(clock.today()));
    }

    #[test]
    fn snapshot_restores_daily_total() {
        let (mut tracker, _clock, _recorder) = tracker();
        let snapshot = FocusSnapshot {
            total_focus_today_secs: 42.0,
            last_reset_date: NaiveDate::from_ymd_opt(2026, 5, 4),
        };
        tracker.restore(&snapshot);
        assert_eq!(tracker.capture(), snapshot);
    }
}
