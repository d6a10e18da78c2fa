//! Focus tracking, the simulation clock, services, and orchestration for
//! the Focus Founder progression engine.
//!
//! Time only advances while the player is focused. The [`Game`] turns each
//! host frame into a gated simulated delta and drives the services with it:
//! idle employees pick up queued work, work turns into rewards, rewards
//! into levels, and every transition is published on the event bus.
//!
//! # Modules
//!
//! - [`catalog`] -- Loading and validating the content catalog YAML.
//! - [`clock`] -- [`SimulationClock`] with the run flag and focus gate.
//! - [`config`] -- Configuration loading from `founder-config.yaml` into
//!   strongly-typed structs.
//! - [`focus`] -- [`FocusTracker`]: debounce, anti-cheese session gating,
//!   daily totals.
//! - [`game`] -- The [`Game`] orchestrator: tick phases, commands, and
//!   capture/restore.
//! - [`services`] -- Economy, office, employee, task, and upgrade services.
//! - [`time`] -- [`TimeSource`] abstraction over the wall clock.
//!
//! [`TimeSource`]: time::TimeSource

pub mod catalog;
pub mod clock;
pub mod config;
pub mod focus;
pub mod game;
pub mod services;
pub mod time;

#[cfg(test)]
mod testing;

pub use clock::{ClockError, ClockSnapshot, ClockStep, SimulationClock};
pub use config::{ConfigError, FounderConfig, LogFormat};
pub use focus::{FocusSnapshot, FocusSource, FocusTracker, TimerHandle, TimerKind};
pub use game::{CommandError, Game, GameSnapshot, RestoreError, RestoreReport, TickError, TickSummary};
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
