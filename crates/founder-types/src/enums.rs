//! Enumeration types shared across the workspace.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Employee lifecycle
// ---------------------------------------------------------------------------

/// What an employee is currently doing.
///
/// An employee holds a current task if and only if it is [`Working`].
///
/// [`Working`]: EmployeeState::Working
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EmployeeState {
    /// Waiting for work from the office queue.
    #[default]
    Idle,
    /// Advancing a task.
    Working,
    /// Just finished a task; returns to idle after a short celebration.
    Celebrating,
    /// Resting; never dispatched work.
    Break,
}

// ---------------------------------------------------------------------------
// Catalog enums
// ---------------------------------------------------------------------------

/// Category of a task definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TaskCategory {
    /// Building the product.
    #[default]
    Development,
    /// Promoting the product.
    Marketing,
    /// Keeping the company running.
    Operations,
    /// Closing deals.
    Sales,
    /// Helping customers.
    Support,
    /// Producing research points.
    Research,
}

/// What an upgrade applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum UpgradeTarget {
    /// Company-wide modifier stacks.
    #[default]
    Global,
    /// A single office's modifiers.
    Office,
}

/// Effect category of a global multiplier stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ModifierCategory {
    /// Multiplies every employee's productivity rate.
    Productivity,
    /// Multiplies morale regeneration.
    Morale,
    /// Multiplies task rewards.
    Revenue,
}

impl ModifierCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 3] = [Self::Productivity, Self::Morale, Self::Revenue];
}
