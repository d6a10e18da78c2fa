//! The closed set of notifications the simulation publishes.
//!
//! Every state transition that UI or animation collaborators react to is a
//! [`GameEvent`] variant. Subscribers register against an [`EventKind`]
//! tag rather than a runtime type, so dispatch is a plain map lookup.
//!
//! Payloads carry identifiers and values only, never live entity handles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::{CostBundle, CurrencyBalance, RewardBundle};
use crate::ids::{EmployeeId, OfficeId, TaskId};

/// Tag identifying a [`GameEvent`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// See [`GameEvent::FocusGained`].
    FocusGained,
    /// See [`GameEvent::FocusLost`].
    FocusLost,
    /// See [`GameEvent::SessionStarted`].
    SessionStarted,
    /// See [`GameEvent::SessionEnded`].
    SessionEnded,
    /// See [`GameEvent::BalanceChanged`].
    BalanceChanged,
    /// See [`GameEvent::RewardReceived`].
    RewardReceived,
    /// See [`GameEvent::CostPaid`].
    CostPaid,
    /// See [`GameEvent::EmployeeHired`].
    EmployeeHired,
    /// See [`GameEvent::EmployeeAssigned`].
    EmployeeAssigned,
    /// See [`GameEvent::EmployeeLevelUp`].
    EmployeeLevelUp,
    /// See [`GameEvent::OfficeUnlocked`].
    OfficeUnlocked,
    /// See [`GameEvent::TaskQueued`].
    TaskQueued,
    /// See [`GameEvent::TaskStarted`].
    TaskStarted,
    /// See [`GameEvent::TaskCompleted`].
    TaskCompleted,
    /// See [`GameEvent::UpgradePurchased`].
    UpgradePurchased,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::FocusGained,
        Self::FocusLost,
        Self::SessionStarted,
        Self::SessionEnded,
        Self::BalanceChanged,
        Self::RewardReceived,
        Self::CostPaid,
        Self::EmployeeHired,
        Self::EmployeeAssigned,
        Self::EmployeeLevelUp,
        Self::OfficeUnlocked,
        Self::TaskQueued,
        Self::TaskStarted,
        Self::TaskCompleted,
        Self::UpgradePurchased,
    ];
}

/// A notification published on the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type", content = "details")]
pub enum GameEvent {
    /// The application became focused (after debounce).
    FocusGained,
    /// The application lost focus or was paused.
    FocusLost,
    /// A focus session survived the minimum session length.
    SessionStarted {
        /// When the session began.
        at: DateTime<Utc>,
    },
    /// A validated focus session ended.
    SessionEnded {
        /// When the session ended.
        at: DateTime<Utc>,
        /// Session length in seconds.
        duration_secs: f64,
    },
    /// The currency balance changed.
    BalanceChanged {
        /// The balance after the change.
        balance: CurrencyBalance,
    },
    /// A reward was credited.
    RewardReceived {
        /// The credited reward.
        reward: RewardBundle,
    },
    /// A cost was paid.
    CostPaid {
        /// The paid cost.
        cost: CostBundle,
    },
    /// A new employee joined the company.
    EmployeeHired {
        /// The new employee.
        employee: EmployeeId,
        /// Archetype id of the new employee.
        archetype: String,
    },
    /// An employee was placed in an office.
    EmployeeAssigned {
        /// The employee.
        employee: EmployeeId,
        /// The office the employee now belongs to.
        office: OfficeId,
        /// The office the employee left, if this was a move.
        previous: Option<OfficeId>,
    },
    /// An employee gained one or more levels.
    EmployeeLevelUp {
        /// The employee.
        employee: EmployeeId,
        /// Level after the gain.
        level: u32,
    },
    /// A new office was unlocked.
    OfficeUnlocked {
        /// The new office.
        office: OfficeId,
        /// Definition id of the office.
        definition: String,
    },
    /// A task instance entered an office queue.
    TaskQueued {
        /// The new task.
        task: TaskId,
        /// Owning office queue.
        office: OfficeId,
        /// Definition id of the task.
        definition: String,
    },
    /// A task left its queue and was handed to an employee.
    TaskStarted {
        /// The employee now working the task.
        employee: EmployeeId,
        /// The task.
        task: TaskId,
    },
    /// A task finished and its reward was credited.
    TaskCompleted {
        /// The employee who finished it.
        employee: EmployeeId,
        /// The finished task.
        task: TaskId,
        /// Reward credited for it.
        reward: RewardBundle,
    },
    /// An upgrade level was bought.
    UpgradePurchased {
        /// Upgrade definition id.
        upgrade: String,
        /// Level now owned.
        level: u32,
        /// Target office for office upgrades.
        office: Option<OfficeId>,
    },
}

impl GameEvent {
    /// The tag subscribers use to receive this event.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::FocusGained => EventKind::FocusGained,
            Self::FocusLost => EventKind::FocusLost,
            Self::SessionStarted { .. } => EventKind::SessionStarted,
            Self::SessionEnded { .. } => EventKind::SessionEnded,
            Self::BalanceChanged { .. } => EventKind::BalanceChanged,
            Self::RewardReceived { .. } => EventKind::RewardReceived,
            Self::CostPaid { .. } => EventKind::CostPaid,
            Self::EmployeeHired { .. } => EventKind::EmployeeHired,
            Self::EmployeeAssigned { .. } => EventKind::EmployeeAssigned,
            Self::EmployeeLevelUp { .. } => EventKind::EmployeeLevelUp,
            Self::OfficeUnlocked { .. } => EventKind::OfficeUnlocked,
            Self::TaskQueued { .. } => EventKind::TaskQueued,
            Self::TaskStarted { .. } => EventKind::TaskStarted,
            Self::TaskCompleted { .. } => EventKind::TaskCompleted,
            Self::UpgradePurchased { .. } => EventKind::UpgradePurchased,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let event = GameEvent::EmployeeLevelUp {
            employee: EmployeeId::new(),
            level: 3,
        };
        assert_eq!(event.kind(), EventKind::EmployeeLevelUp);
        assert_eq!(GameEvent::FocusLost.kind(), EventKind::FocusLost);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(GameEvent::CostPaid {
            cost: CostBundle::cash(5.0),
        })
        .ok();
        let tag = json
            .as_ref()
            .and_then(|v| v.get("type"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(tag, Some("CostPaid"));
    }
}
