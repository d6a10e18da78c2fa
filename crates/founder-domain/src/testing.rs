//! Definition builders shared by unit tests.

use std::sync::Arc;

use founder_types::{
    CostBundle, Curve, EmployeeArchetype, EmployeeStats, OfficeDefinition, RewardBundle,
    TaskCategory, TaskDefinition,
};

pub fn archetype(id: &str, productivity: f64, quality: f64) -> Arc<EmployeeArchetype> {
    Arc::new(EmployeeArchetype {
        id: id.to_owned(),
        display_name: id.to_owned(),
        base_stats: EmployeeStats::new(productivity, 100.0, 1.0, quality),
    })
}

pub fn task_definition(id: &str, base_duration: f64) -> Arc<TaskDefinition> {
    Arc::new(TaskDefinition {
        id: id.to_owned(),
        display_name: id.to_owned(),
        category: TaskCategory::Development,
        base_duration,
        duration_variation: 0.0,
        base_reward: RewardBundle::new(10.0, 0.0, 0.0, 0.0),
        difficulty: Curve::default(),
    })
}

pub fn office_definition(id: &str, max_staff: u32) -> Arc<OfficeDefinition> {
    Arc::new(OfficeDefinition {
        id: id.to_owned(),
        display_name: id.to_owned(),
        max_staff,
        grid_size: (10, 10),
        productivity_multiplier: 1.0,
        morale_bonus: 0.0,
        revenue_multiplier: 1.0,
        unlock_cost: CostBundle::cash(50.0),
    })
}
