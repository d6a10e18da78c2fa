//! Employees: level, morale, experience, and the single current task.
//!
//! An employee holds a current task if and only if its state is
//! [`EmployeeState::Working`]. Every method that changes the state keeps
//! that pairing intact, and restore normalizes snapshots that break it.
//!
//! # Per-tick order of operations
//!
//! 1. Working: advance the task by `dt * productivity_rate`. On completion
//!    release the task, start celebrating, and grant completion experience.
//! 2. Celebrating (from an earlier tick): count down, then return to idle.
//! 3. Any state: regenerate morale toward 100.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use founder_types::{EmployeeArchetype, EmployeeId, EmployeeState, EmployeeStats};

use crate::config::EmployeeConfig;
use crate::error::DomainError;
use crate::task::{TaskInstance, TaskSnapshot};

/// Upper bound of the morale scale.
pub const MAX_MORALE: f64 = 100.0;

/// Rates an employee tick runs with, computed by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRates {
    /// Work units per simulated second.
    pub productivity: f64,
    /// Morale points per simulated second.
    pub morale_regen: f64,
}

/// What happened during one [`Employee::tick`].
#[derive(Debug, Default)]
pub struct EmployeeTickOutcome {
    /// The task that finished this tick, released by the employee.
    pub completed: Option<TaskInstance>,
    /// Levels gained from completion experience.
    pub levels_gained: u32,
}

/// A hired member of staff.
#[derive(Debug, Clone)]
pub struct Employee {
    id: EmployeeId,
    archetype: Arc<EmployeeArchetype>,
    level: u32,
    morale: f64,
    experience: f64,
    current_task: Option<TaskInstance>,
    state: EmployeeState,
    /// Simulated seconds of celebration left.
    celebrate_remaining: f64,
}

/// Persisted form of an [`Employee`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSnapshot {
    /// Employee id.
    pub id: EmployeeId,
    /// Archetype id.
    pub archetype: String,
    /// Level, at least 1.
    pub level: u32,
    /// Morale in `[0, 100]`.
    pub morale: f64,
    /// Experience toward the next level.
    pub experience: f64,
    /// Lifecycle state.
    pub state: EmployeeState,
    /// The task in progress, if working.
    #[serde(default)]
    pub current_task: Option<TaskSnapshot>,
    /// Celebration time left.
    #[serde(default)]
    pub celebrate_remaining: f64,
}

impl Employee {
    /// Create a level-1 idle hire of `archetype`.
    pub fn new(archetype: Arc<EmployeeArchetype>, config: &EmployeeConfig) -> Self {
        Self {
            id: EmployeeId::new(),
            archetype,
            level: 1,
            morale: config.starting_morale.clamp(0.0, MAX_MORALE),
            experience: 0.0,
            current_task: None,
            state: EmployeeState::Idle,
            celebrate_remaining: 0.0,
        }
    }

    /// Employee id.
    pub const fn id(&self) -> EmployeeId {
        self.id
    }

    /// The archetype this employee was hired as.
    pub const fn archetype(&self) -> &Arc<EmployeeArchetype> {
        &self.archetype
    }

    /// Current level, at least 1.
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Current morale in `[0, 100]`.
    pub const fn morale(&self) -> f64 {
        self.morale
    }

    /// Experience accumulated toward the next level.
    pub const fn experience(&self) -> f64 {
        self.experience
    }

    /// Lifecycle state.
    pub const fn state(&self) -> EmployeeState {
        self.state
    }

    /// The task in progress, if working.
    pub const fn current_task(&self) -> Option<&TaskInstance> {
        self.current_task.as_ref()
    }

    /// Whether the employee can take a task right now.
    pub fn is_idle(&self) -> bool {
        self.state == EmployeeState::Idle
    }

    /// Derived stats at the current level and morale.
    ///
    /// Productivity, efficiency, and quality grow by `level_scaling` per
    /// level above one; productivity is further scaled by `morale / 100`.
    pub fn stats(&self, level_scaling: f64) -> EmployeeStats {
        let base = self.archetype.base_stats;
        let level_mult = level_multiplier(self.level, level_scaling);
        EmployeeStats::new(
            base.productivity * level_mult * (self.morale / MAX_MORALE),
            self.morale,
            base.efficiency * level_mult,
            base.quality * level_mult,
        )
    }

    /// Hand a task to an idle employee.
    ///
    /// Returns the task back if the employee is not idle.
    pub fn assign_task(&mut self, task: TaskInstance) -> Result<(), TaskInstance> {
        if !self.is_idle() {
            return Err(task);
        }
        debug!(employee = %self.id, task = %task.id(), "task assigned");
        self.current_task = Some(task);
        self.state = EmployeeState::Working;
        Ok(())
    }

    /// Put an idle employee on break. Returns whether the state changed.
    pub fn send_on_break(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = EmployeeState::Break;
        true
    }

    /// Return an employee from break to idle. Returns whether the state
    /// changed.
    pub fn end_break(&mut self) -> bool {
        if self.state != EmployeeState::Break {
            return false;
        }
        self.state = EmployeeState::Idle;
        true
    }

    /// Shift morale by `delta`, clamped to `[0, 100]`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] if `delta` is not finite.
    pub fn modify_morale(&mut self, delta: f64) -> Result<(), DomainError> {
        if !delta.is_finite() {
            return Err(DomainError::InvalidAmount {
                what: "morale delta",
                value: delta,
            });
        }
        self.morale = (self.morale + delta).clamp(0.0, MAX_MORALE);
        Ok(())
    }

    /// Add experience and apply every level-up it pays for.
    ///
    /// Each level costs `level * level_xp_factor`; the loop keeps spending
    /// until the remainder no longer covers the next threshold, so a large
    /// grant can raise several levels at once. Returns the levels gained.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] if `amount` is negative or not
    /// finite, or if `level_xp_factor` is not positive.
    pub fn grant_experience(&mut self, amount: f64, level_xp_factor: f64) -> Result<u32, DomainError> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(DomainError::InvalidAmount {
                what: "experience",
                value: amount,
            });
        }
        if !(level_xp_factor.is_finite() && level_xp_factor > 0.0) {
            return Err(DomainError::InvalidAmount {
                what: "level xp factor",
                value: level_xp_factor,
            });
        }

        self.experience += amount;
        let mut gained: u32 = 0;
        loop {
            let threshold = f64::from(self.level) * level_xp_factor;
            if self.experience < threshold {
                break;
            }
            let Some(next) = self.level.checked_add(1) else {
                break;
            };
            self.experience -= threshold;
            self.level = next;
            gained = gained.saturating_add(1);
        }

        if gained > 0 {
            debug!(employee = %self.id, level = self.level, gained, "level up");
        }
        Ok(gained)
    }

    /// Advance the employee by `dt` simulated seconds.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NegativeDelta`] if `dt` is negative or not
    /// finite, and propagates invalid rates from task advancement.
    pub fn tick(
        &mut self,
        dt: f64,
        rates: TickRates,
        config: &EmployeeConfig,
    ) -> Result<EmployeeTickOutcome, DomainError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(DomainError::NegativeDelta { delta: dt });
        }

        let mut outcome = EmployeeTickOutcome::default();
        match self.state {
            EmployeeState::Working => {
                let finished = match self.current_task.as_mut() {
                    Some(task) => task.advance(dt * rates.productivity)?,
                    None => {
                        // Invariant repair: never working without a task.
                        self.state = EmployeeState::Idle;
                        false
                    }
                };
                if finished {
                    outcome.completed = self.current_task.take();
                    self.state = EmployeeState::Celebrating;
                    self.celebrate_remaining = config.celebrate_secs.max(0.0);
                    outcome.levels_gained =
                        self.grant_experience(config.completion_experience, config.level_xp_factor)?;
                }
            }
            EmployeeState::Celebrating => {
                self.celebrate_remaining -= dt;
                if self.celebrate_remaining <= 0.0 {
                    self.celebrate_remaining = 0.0;
                    self.state = EmployeeState::Idle;
                }
            }
            EmployeeState::Idle | EmployeeState::Break => {}
        }

        if self.morale < MAX_MORALE {
            let regen = dt * rates.morale_regen;
            if regen.is_finite() {
                self.morale = (self.morale + regen).clamp(0.0, MAX_MORALE);
            }
        }

        Ok(outcome)
    }

    /// Capture the employee for persistence.
    pub fn snapshot(&self) -> EmployeeSnapshot {
        EmployeeSnapshot {
            id: self.id,
            archetype: self.archetype.id.clone(),
            level: self.level,
            morale: self.morale,
            experience: self.experience,
            state: self.state,
            current_task: self.current_task.as_ref().map(TaskInstance::snapshot),
            celebrate_remaining: self.celebrate_remaining,
        }
    }

    /// Rebuild an employee from a snapshot and resolved references.
    ///
    /// `task` is the restored current task, or `None` when the snapshot had
    /// none or it could not be resolved. Out-of-range numbers are clamped
    /// and a working state without a task becomes idle.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownDefinition`] if `archetype` is not the
    /// one the snapshot names.
    pub fn from_snapshot(
        snapshot: &EmployeeSnapshot,
        archetype: Arc<EmployeeArchetype>,
        task: Option<TaskInstance>,
    ) -> Result<Self, DomainError> {
        if archetype.id != snapshot.archetype {
            return Err(DomainError::UnknownDefinition {
                kind: "archetype",
                id: snapshot.archetype.clone(),
            });
        }

        let (state, current_task) = match (snapshot.state, task) {
            (EmployeeState::Working, Some(task)) => (EmployeeState::Working, Some(task)),
            (EmployeeState::Working, None) => (EmployeeState::Idle, None),
            (other, _) => (other, None),
        };

        Ok(Self {
            id: snapshot.id,
            archetype,
            level: snapshot.level.max(1),
            morale: finite_or(snapshot.morale, MAX_MORALE).clamp(0.0, MAX_MORALE),
            experience: finite_or(snapshot.experience, 0.0).max(0.0),
            current_task,
            state,
            celebrate_remaining: finite_or(snapshot.celebrate_remaining, 0.0).max(0.0),
        })
    }
}

/// `1 + (level - 1) * scaling`.
pub fn level_multiplier(level: u32, scaling: f64) -> f64 {
    f64::from(level.saturating_sub(1)).mul_add(scaling, 1.0)
}

const fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}
