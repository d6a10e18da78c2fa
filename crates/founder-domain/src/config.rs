//! Tunable parameters for employee and strategy mechanics.
//!
//! These structs mirror the `employee`, `productivity`, and `reward`
//! sections of `founder-config.yaml`. Every field has a serde default so a
//! partial YAML section fills in the rest, and `Default` produces the same
//! values for tests that build entities directly.

use serde::{Deserialize, Serialize};

use founder_types::Curve;

/// Per-employee progression parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeConfig {
    /// Base hiring cost in cash before count and stat scaling (default: 100).
    #[serde(default = "default_base_hire_cost")]
    pub base_hire_cost: f64,

    /// Cost increase per existing employee (default: 0.1).
    #[serde(default = "default_hire_count_scaling")]
    pub hire_count_scaling: f64,

    /// Morale recovered per simulated second (default: 2.0).
    #[serde(default = "default_morale_regen_rate")]
    pub morale_regen_rate: f64,

    /// Experience needed per level: threshold is `level * level_xp_factor`
    /// (default: 100).
    #[serde(default = "default_level_xp_factor")]
    pub level_xp_factor: f64,

    /// Experience granted whenever a task finishes (default: 10).
    #[serde(default = "default_completion_experience")]
    pub completion_experience: f64,

    /// Simulated seconds spent celebrating before returning to idle
    /// (default: 1.5).
    #[serde(default = "default_celebrate_secs")]
    pub celebrate_secs: f64,

    /// Morale of a new hire (default: 100).
    #[serde(default = "default_starting_morale")]
    pub starting_morale: f64,

    /// Per-level growth of derived productivity, efficiency, and quality
    /// (default: 0.1).
    #[serde(default = "default_level_scaling")]
    pub stat_level_scaling: f64,
}

impl Default for EmployeeConfig {
    fn default() -> Self {
        Self {
            base_hire_cost: default_base_hire_cost(),
            hire_count_scaling: default_hire_count_scaling(),
            morale_regen_rate: default_morale_regen_rate(),
            level_xp_factor: default_level_xp_factor(),
            completion_experience: default_completion_experience(),
            celebrate_secs: default_celebrate_secs(),
            starting_morale: default_starting_morale(),
            stat_level_scaling: default_level_scaling(),
        }
    }
}

/// Parameters of the base productivity formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityConfig {
    /// Rate multiplier per level above one (default: 0.1).
    #[serde(default = "default_level_scaling")]
    pub level_scaling: f64,

    /// Constant bonus applied while ticking, i.e. while focused
    /// (default: 0.2).
    #[serde(default = "default_focus_bonus")]
    pub focus_bonus: f64,

    /// Morale factor at morale 0 (default: 0.5).
    #[serde(default = "default_morale_factor_min")]
    pub morale_factor_min: f64,

    /// Morale factor at morale 100 (default: 1.5).
    #[serde(default = "default_morale_factor_max")]
    pub morale_factor_max: f64,
}

impl Default for ProductivityConfig {
    fn default() -> Self {
        Self {
            level_scaling: default_level_scaling(),
            focus_bonus: default_focus_bonus(),
            morale_factor_min: default_morale_factor_min(),
            morale_factor_max: default_morale_factor_max(),
        }
    }
}

/// Parameters of the base completion reward formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Reward multiplier as a function of the employee's quality stat
    /// (default: linear 0 -> 0.5, 100 -> 1.5).
    #[serde(default = "default_quality_curve")]
    pub quality_curve: Curve,

    /// Flat experience added to every reward (default: 10).
    #[serde(default = "default_experience_base")]
    pub experience_base: f64,

    /// Experience added per second of task base duration (default: 0.1).
    #[serde(default = "default_experience_per_duration_sec")]
    pub experience_per_duration_sec: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            quality_curve: default_quality_curve(),
            experience_base: default_experience_base(),
            experience_per_duration_sec: default_experience_per_duration_sec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_base_hire_cost() -> f64 {
    100.0
}
const fn default_hire_count_scaling() -> f64 {
    0.1
}
const fn default_morale_regen_rate() -> f64 {
    2.0
}
const fn default_level_xp_factor() -> f64 {
    100.0
}
const fn default_completion_experience() -> f64 {
    10.0
}
const fn default_celebrate_secs() -> f64 {
    1.5
}
const fn default_starting_morale() -> f64 {
    100.0
}
const fn default_level_scaling() -> f64 {
    0.1
}
const fn default_focus_bonus() -> f64 {
    0.2
}
const fn default_morale_factor_min() -> f64 {
    0.5
}
const fn default_morale_factor_max() -> f64 {
    1.5
}
const fn default_quality_curve() -> Curve {
    Curve::linear(0.0, 0.5, 100.0, 1.5)
}
const fn default_experience_base() -> f64 {
    10.0
}
const fn default_experience_per_duration_sec() -> f64 {
    0.1
}
