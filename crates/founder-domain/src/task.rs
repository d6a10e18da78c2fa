//! Task instances: a unit of work with a fixed total duration.
//!
//! A [`TaskInstance`] is owned by an office queue until it is dequeued,
//! then by exactly one employee until it completes. Remaining work only
//! ever decreases and stops at zero.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use founder_types::{TaskDefinition, TaskId};

use crate::error::DomainError;

/// A queued or in-progress piece of work.
#[derive(Debug, Clone)]
pub struct TaskInstance {
    id: TaskId,
    definition: Arc<TaskDefinition>,
    total_duration: f64,
    remaining: f64,
}

/// Persisted form of a [`TaskInstance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Task id.
    pub id: TaskId,
    /// Task definition id.
    pub definition: String,
    /// Work units the task needed in total.
    pub total_duration: f64,
    /// Work units still needed.
    pub remaining: f64,
}

impl TaskInstance {
    /// Create a fresh task needing `total_duration` work units.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDuration`] unless the duration is
    /// positive and finite.
    pub fn new(definition: Arc<TaskDefinition>, total_duration: f64) -> Result<Self, DomainError> {
        if !(total_duration.is_finite() && total_duration > 0.0) {
            return Err(DomainError::InvalidDuration {
                duration: total_duration,
            });
        }
        Ok(Self {
            id: TaskId::new(),
            definition,
            total_duration,
            remaining: total_duration,
        })
    }

    /// Task id.
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// The definition this task was created from.
    pub const fn definition(&self) -> &Arc<TaskDefinition> {
        &self.definition
    }

    /// Work units the task needed in total.
    pub const fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Work units still needed.
    pub const fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Fraction done, `1 - remaining / total`, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        (1.0 - self.remaining / self.total_duration).clamp(0.0, 1.0)
    }

    /// Whether no work remains.
    pub fn is_complete(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Apply `work` units. Returns whether the task is now complete.
    ///
    /// Remaining work never goes below zero.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NegativeDelta`] if `work` is negative or not
    /// finite; the task is unchanged.
    pub fn advance(&mut self, work: f64) -> Result<bool, DomainError> {
        if !(work.is_finite() && work >= 0.0) {
            return Err(DomainError::NegativeDelta { delta: work });
        }
        self.remaining = (self.remaining - work).max(0.0);
        Ok(self.is_complete())
    }

    /// Capture the task for persistence.
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id,
            definition: self.definition.id.clone(),
            total_duration: self.total_duration,
            remaining: self.remaining,
        }
    }

    /// Rebuild a task from a snapshot and its resolved definition.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDuration`] for a bad total and
    /// [`DomainError::InvalidSnapshot`] when the definition does not match
    /// or `remaining` is outside `[0, total]`.
    pub fn from_snapshot(
        snapshot: &TaskSnapshot,
        definition: Arc<TaskDefinition>,
    ) -> Result<Self, DomainError> {
        if definition.id != snapshot.definition {
            return Err(DomainError::InvalidSnapshot {
                reason: format!(
                    "task {} expects definition {}, got {}",
                    snapshot.id, snapshot.definition, definition.id
                ),
            });
        }
        let mut task = Self::new(definition, snapshot.total_duration)?;
        if !(snapshot.remaining.is_finite()
            && (0.0..=snapshot.total_duration).contains(&snapshot.remaining))
        {
            return Err(DomainError::InvalidSnapshot {
                reason: format!(
                    "task {} remaining {} outside 0..={}",
                    snapshot.id, snapshot.remaining, snapshot.total_duration
                ),
            });
        }
        task.id = snapshot.id;
        task.remaining = snapshot.remaining;
        Ok(task)
    }
}
