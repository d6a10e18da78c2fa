//! Currency bundles: costs, rewards, and the running balance.
//!
//! The game tracks three currencies (cash, research, reputation). A
//! [`CostBundle`] is what an unlock or hire requires, a [`RewardBundle`] is
//! what a completed task yields (plus experience for the employee), and a
//! [`CurrencyBalance`] is what the player holds.
//!
//! Bundles are plain `Copy` values. They combine component-wise with `+`
//! and scale with `* f64`; once computed they are never mutated in place.

use core::ops::{Add, Mul};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// CostBundle
// ---------------------------------------------------------------------------

/// Currency amounts required to perform an unlock, hire, or purchase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CostBundle {
    /// Cash component.
    #[serde(default)]
    pub cash: f64,
    /// Research component.
    #[serde(default)]
    pub research: f64,
    /// Reputation component.
    #[serde(default)]
    pub reputation: f64,
}

impl CostBundle {
    /// Create a cost bundle from its three components.
    pub const fn new(cash: f64, research: f64, reputation: f64) -> Self {
        Self {
            cash,
            research,
            reputation,
        }
    }

    /// A cost of cash only.
    pub const fn cash(cash: f64) -> Self {
        Self::new(cash, 0.0, 0.0)
    }

    /// Whether every component is zero or less (nothing to pay).
    pub fn is_empty(&self) -> bool {
        self.cash <= 0.0 && self.research <= 0.0 && self.reputation <= 0.0
    }

    /// Whether every component is a finite, non-negative number.
    pub fn is_valid(&self) -> bool {
        is_non_negative(self.cash) && is_non_negative(self.research) && is_non_negative(self.reputation)
    }
}

impl Add for CostBundle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.cash + rhs.cash,
            self.research + rhs.research,
            self.reputation + rhs.reputation,
        )
    }
}

impl Mul<f64> for CostBundle {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.cash * rhs, self.research * rhs, self.reputation * rhs)
    }
}

// ---------------------------------------------------------------------------
// RewardBundle
// ---------------------------------------------------------------------------

/// Currency and experience granted when a task completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RewardBundle {
    /// Cash component.
    #[serde(default)]
    pub cash: f64,
    /// Research component.
    #[serde(default)]
    pub research: f64,
    /// Reputation component.
    #[serde(default)]
    pub reputation: f64,
    /// Experience granted to the employee who completed the task.
    #[serde(default)]
    pub experience: f64,
}

impl RewardBundle {
    /// Create a reward bundle from its four components.
    pub const fn new(cash: f64, research: f64, reputation: f64, experience: f64) -> Self {
        Self {
            cash,
            research,
            reputation,
            experience,
        }
    }

    /// The same reward with the experience component replaced.
    #[must_use]
    pub const fn with_experience(self, experience: f64) -> Self {
        Self { experience, ..self }
    }
}

impl Add for RewardBundle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.cash + rhs.cash,
            self.research + rhs.research,
            self.reputation + rhs.reputation,
            self.experience + rhs.experience,
        )
    }
}

impl Mul<f64> for RewardBundle {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(
            self.cash * rhs,
            self.research * rhs,
            self.reputation * rhs,
            self.experience * rhs,
        )
    }
}

// ---------------------------------------------------------------------------
// CurrencyBalance
// ---------------------------------------------------------------------------

/// Currencies held by the player.
///
/// Every component stays non-negative after any successful deduction.
/// Additions are unconstrained. Only the economy ledger mutates the live
/// balance; the methods here are pure and return new values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CurrencyBalance {
    /// Cash held.
    #[serde(default)]
    pub cash: f64,
    /// Research points held.
    #[serde(default)]
    pub research: f64,
    /// Reputation held.
    #[serde(default)]
    pub reputation: f64,
}

impl CurrencyBalance {
    /// Create a balance from its three components.
    pub const fn new(cash: f64, research: f64, reputation: f64) -> Self {
        Self {
            cash,
            research,
            reputation,
        }
    }

    /// Whether every component of `cost` is covered by this balance.
    pub fn can_afford(&self, cost: &CostBundle) -> bool {
        self.cash >= cost.cash && self.research >= cost.research && self.reputation >= cost.reputation
    }

    /// The balance after paying `cost`, or `None` when it is not affordable.
    ///
    /// Affordability and subtraction read the same value, so a `Some`
    /// result never has a negative component.
    pub fn spend(&self, cost: &CostBundle) -> Option<Self> {
        if !self.can_afford(cost) {
            return None;
        }
        Some(Self::new(
            self.cash - cost.cash,
            self.research - cost.research,
            self.reputation - cost.reputation,
        ))
    }

    /// The balance after receiving the currency part of `reward`.
    ///
    /// The experience component is not a currency and is ignored here.
    #[must_use]
    pub fn credited(&self, reward: &RewardBundle) -> Self {
        Self::new(
            self.cash + reward.cash,
            self.research + reward.research,
            self.reputation + reward.reputation,
        )
    }

    /// Whether every component is a finite, non-negative number.
    pub fn is_valid(&self) -> bool {
        is_non_negative(self.cash) && is_non_negative(self.research) && is_non_negative(self.reputation)
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn can_afford_requires_every_component() {
        let balance = CurrencyBalance::new(100.0, 5.0, 0.0);
        assert!(balance.can_afford(&CostBundle::new(100.0, 5.0, 0.0)));
        assert!(!balance.can_afford(&CostBundle::new(50.0, 6.0, 0.0)));
        assert!(!balance.can_afford(&CostBundle::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn spend_subtracts_each_component() {
        let balance = CurrencyBalance::new(100.0, 10.0, 3.0);
        let after = balance.spend(&CostBundle::new(40.0, 10.0, 1.0));
        let after = after.unwrap_or_default();
        assert!(close(after.cash, 60.0));
        assert!(close(after.research, 0.0));
        assert!(close(after.reputation, 2.0));
        assert!(after.is_valid());
    }

    #[test]
    fn spend_refuses_unaffordable_cost() {
        let balance = CurrencyBalance::new(10.0, 0.0, 0.0);
        assert!(balance.spend(&CostBundle::cash(10.5)).is_none());
    }

    #[test]
    fn add_ignores_experience() {
        let balance = CurrencyBalance::new(1.0, 2.0, 3.0);
        let after = balance.credited(&RewardBundle::new(1.0, 1.0, 1.0, 500.0));
        assert_eq!(after, CurrencyBalance::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn reward_bundles_combine_and_scale() {
        let a = RewardBundle::new(1.0, 2.0, 3.0, 4.0);
        let b = RewardBundle::new(1.0, 1.0, 1.0, 1.0);
        let combined = (a + b) * 2.0;
        assert_eq!(combined, RewardBundle::new(4.0, 6.0, 8.0, 10.0));
    }

    #[test]
    fn cost_bundle_emptiness() {
        assert!(CostBundle::default().is_empty());
        assert!(!CostBundle::cash(1.0).is_empty());
        assert!(!CostBundle::new(-1.0, 0.0, 0.0).is_valid());
    }
}
