//! Pluggable rate and reward policies.
//!
//! Services never compute productivity or rewards themselves; they call a
//! [`ProductivityStrategy`] and a [`YieldStrategy`] held behind trait
//! objects, so alternative formulas can be swapped in without touching the
//! services. Modifier sets arrive as explicit arguments.
//!
//! # Base formulas
//!
//! ```text
//! rate   = base_productivity
//!        * lerp(morale_min, morale_max, clamp(morale + office_morale_bonus) / 100)
//!        * (1 + (level - 1) * level_scaling)
//!        * office_productivity * global_productivity
//!        * (1 + focus_bonus)
//!
//! reward = task.reward_for_level(level) * quality_curve(quality) * global_revenue
//!        + experience: experience_base + base_duration * experience_per_duration_sec
//! ```

use founder_types::{ModifierCategory, RewardBundle, TaskDefinition};

use crate::config::{ProductivityConfig, RewardConfig};
use crate::employee::{Employee, MAX_MORALE, level_multiplier};
use crate::modifiers::{GlobalModifiers, OfficeModifiers};

/// Inputs to a productivity calculation.
#[derive(Debug, Clone, Copy)]
pub struct ProductivityContext<'a> {
    /// The employee being ticked.
    pub employee: &'a Employee,
    /// Factors of the employee's office, if assigned.
    pub office: Option<&'a OfficeModifiers>,
    /// Company-wide stacks.
    pub globals: &'a GlobalModifiers,
}

/// Inputs to a completion reward calculation.
#[derive(Debug, Clone, Copy)]
pub struct YieldContext<'a> {
    /// The employee who finished the task.
    pub employee: &'a Employee,
    /// The quality stat to score the work with.
    pub quality: f64,
    /// The finished task's definition.
    pub task: &'a TaskDefinition,
    /// Factors of the employee's office, if assigned.
    pub office: Option<&'a OfficeModifiers>,
    /// Company-wide stacks.
    pub globals: &'a GlobalModifiers,
}

/// Computes an employee's work rate in units per simulated second.
pub trait ProductivityStrategy {
    /// Work units per second for the employee in `ctx`.
    fn rate(&self, ctx: &ProductivityContext<'_>) -> f64;
}

/// Computes what a completed task pays.
pub trait YieldStrategy {
    /// Reward for the completion described by `ctx`.
    fn reward(&self, ctx: &YieldContext<'_>) -> RewardBundle;
}

// ---------------------------------------------------------------------------
// Base implementations
// ---------------------------------------------------------------------------

/// The default productivity formula.
#[derive(Debug, Clone, Default)]
pub struct BaseProductivityStrategy {
    config: ProductivityConfig,
}

impl BaseProductivityStrategy {
    /// Create the strategy with explicit parameters.
    pub const fn new(config: ProductivityConfig) -> Self {
        Self { config }
    }

    /// Morale factor for `morale` in `[0, 100]`.
    pub fn morale_factor(&self, morale: f64) -> f64 {
        let t = (morale / MAX_MORALE).clamp(0.0, 1.0);
        (self.config.morale_factor_max - self.config.morale_factor_min).mul_add(t, self.config.morale_factor_min)
    }
}

impl ProductivityStrategy for BaseProductivityStrategy {
    fn rate(&self, ctx: &ProductivityContext<'_>) -> f64 {
        let base = ctx.employee.archetype().base_stats.productivity;
        let (office_mult, morale_bonus) = ctx
            .office
            .map_or((1.0, 0.0), |office| (office.productivity_multiplier, office.morale_bonus));
        let morale = (ctx.employee.morale() + morale_bonus).clamp(0.0, MAX_MORALE);

        let rate = base
            * self.morale_factor(morale)
            * level_multiplier(ctx.employee.level(), self.config.level_scaling)
            * office_mult
            * ctx.globals.multiplier(ModifierCategory::Productivity)
            * (1.0 + self.config.focus_bonus);
        if rate.is_finite() { rate.max(0.0) } else { 0.0 }
    }
}

/// The default completion reward formula.
#[derive(Debug, Clone, Default)]
pub struct BaseYieldStrategy {
    config: RewardConfig,
}

impl BaseYieldStrategy {
    /// Create the strategy with explicit parameters.
    pub const fn new(config: RewardConfig) -> Self {
        Self { config }
    }
}

impl YieldStrategy for BaseYieldStrategy {
    fn reward(&self, ctx: &YieldContext<'_>) -> RewardBundle {
        let quality = self.config.quality_curve.evaluate(ctx.quality);
        let revenue = ctx.globals.multiplier(ModifierCategory::Revenue);
        let scaled = ctx.task.reward_for_level(ctx.employee.level()) * (quality * revenue);

        let bonus_xp = ctx
            .task
            .base_duration
            .mul_add(self.config.experience_per_duration_sec, self.config.experience_base);
        scaled.with_experience(scaled.experience + bonus_xp)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::EmployeeConfig;
    use crate::testing::{archetype, task_definition};

    fn employee(productivity: f64) -> Employee {
        Employee::new(archetype("dev", productivity, 50.0), &EmployeeConfig::default())
    }

    #[test]
    fn morale_factor_maps_linearly() {
        let strategy = BaseProductivityStrategy::default();
        assert!((strategy.morale_factor(0.0) - 0.5).abs() < 1e-12);
        assert!((strategy.morale_factor(50.0) - 1.0).abs() < 1e-12);
        assert!((strategy.morale_factor(100.0) - 1.5).abs() < 1e-12);
        assert!((strategy.morale_factor(250.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn base_rate_combines_every_factor() {
        let strategy = BaseProductivityStrategy::default();
        let mut worker = employee(2.0);
        worker.grant_experience(100.0, 100.0).unwrap(); // level 2
        worker.modify_morale(-50.0).unwrap(); // morale 50

        let mut globals = GlobalModifiers::new();
        globals.add(ModifierCategory::Productivity, "coffee#1", 1.5).unwrap();
        let office = OfficeModifiers {
            productivity_multiplier: 2.0,
            ..OfficeModifiers::default()
        };

        let rate = strategy.rate(&ProductivityContext {
            employee: &worker,
            office: Some(&office),
            globals: &globals,
        });
        // 2.0 * 1.0 * 1.1 * 2.0 * 1.5 * 1.2
        assert!((rate - 7.92).abs() < 1e-9);
    }

    #[test]
    fn office_morale_bonus_raises_morale_factor() {
        let strategy = BaseProductivityStrategy::default();
        let mut worker = employee(1.0);
        worker.modify_morale(-100.0).unwrap();
        let office = OfficeModifiers {
            morale_bonus: 50.0,
            ..OfficeModifiers::default()
        };
        let globals = GlobalModifiers::new();

        let without = strategy.rate(&ProductivityContext {
            employee: &worker,
            office: None,
            globals: &globals,
        });
        let with = strategy.rate(&ProductivityContext {
            employee: &worker,
            office: Some(&office),
            globals: &globals,
        });
        assert!((without - 0.6).abs() < 1e-9);
        assert!((with - 1.2).abs() < 1e-9);
    }

    #[test]
    fn reward_scales_by_quality_and_revenue() {
        let strategy = BaseYieldStrategy::default();
        let worker = employee(1.0);
        let task = task_definition("code", 30.0);
        let mut globals = GlobalModifiers::new();
        globals.add(ModifierCategory::Revenue, "ads#1", 2.0).unwrap();

        let reward = strategy.reward(&YieldContext {
            employee: &worker,
            quality: 100.0,
            task: &task,
            office: None,
            globals: &globals,
        });
        // 10 cash * 1.5 quality * 2.0 revenue
        assert!((reward.cash - 30.0).abs() < 1e-9);
        // 10 + 30 * 0.1
        assert!((reward.experience - 13.0).abs() < 1e-9);
    }

    #[test]
    fn strategies_are_object_safe() {
        let productivity: Box<dyn ProductivityStrategy> = Box::new(BaseProductivityStrategy::default());
        let yields: Box<dyn YieldStrategy> = Box::new(BaseYieldStrategy::default());
        let worker = employee(1.0);
        let globals = GlobalModifiers::new();
        let task = task_definition("code", 10.0);

        assert!(productivity.rate(&ProductivityContext { employee: &worker, office: None, globals: &globals }) > 0.0);
        assert!(yields.reward(&YieldContext {
            employee: &worker,
            quality: 0.0,
            task: &task,
            office: None,
            globals: &globals,
        }).cash > 0.0);
    }
}
