//! Derived employee statistics.

use core::ops::{Add, Mul};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The four stats that describe how well an employee works.
///
/// Archetypes carry a base set; a live employee's stats are recomputed on
/// demand from level and morale and never mutated independently. Offices sum
/// their members' stats with `+` and scale the total with `* f64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EmployeeStats {
    /// Work units produced per simulated second at baseline.
    #[serde(default)]
    pub productivity: f64,
    /// Morale (0--100 for a single employee).
    #[serde(default)]
    pub morale: f64,
    /// Efficiency factor, used in hiring cost.
    #[serde(default)]
    pub efficiency: f64,
    /// Quality factor, drives the reward quality curve.
    #[serde(default)]
    pub quality: f64,
}

impl EmployeeStats {
    /// Create a stats block from its four components.
    pub const fn new(productivity: f64, morale: f64, efficiency: f64, quality: f64) -> Self {
        Self {
            productivity,
            morale,
            efficiency,
            quality,
        }
    }
}

impl Add for EmployeeStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.productivity + rhs.productivity,
            self.morale + rhs.morale,
            self.efficiency + rhs.efficiency,
            self.quality + rhs.quality,
        )
    }
}

impl Mul<f64> for EmployeeStats {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(
            self.productivity * rhs,
            self.morale * rhs,
            self.efficiency * rhs,
            self.quality * rhs,
        )
    }
}

impl core::iter::Sum for EmployeeStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_sum_then_scale() {
        let members = [
            EmployeeStats::new(1.0, 100.0, 1.0, 1.0),
            EmployeeStats::new(2.0, 50.0, 0.5, 3.0),
        ];
        let total: EmployeeStats = members.into_iter().sum();
        assert_eq!(total * 2.0, EmployeeStats::new(6.0, 300.0, 3.0, 8.0));
    }
}
