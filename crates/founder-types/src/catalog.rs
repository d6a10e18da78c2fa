//! Read-only content definitions and the catalog that indexes them.
//!
//! Definitions (employee archetypes, task definitions, office definitions,
//! upgrades) are authored content. The simulation only reads their numeric
//! and curve fields and never mutates them. Live entities hold an
//! [`Arc`] to their definition; snapshots store the definition's stable
//! string `id` and resolve it back through a [`Catalog`] on restore.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::currency::{CostBundle, RewardBundle};
use crate::curve::Curve;
use crate::enums::{TaskCategory, UpgradeTarget};
use crate::stats::EmployeeStats;

/// Minimum authored task duration, in simulated seconds.
pub const MIN_TASK_DURATION_SECS: f64 = 1.0;

/// Minimum office grid edge, in cells.
pub const MIN_GRID_EDGE: u32 = 5;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// An employee category: base stats that every hire of this kind starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeArchetype {
    /// Stable identifier.
    pub id: String,
    /// Name shown to the player.
    #[serde(default)]
    pub display_name: String,
    /// Base stats before level and morale scaling.
    #[serde(default = "default_base_stats")]
    pub base_stats: EmployeeStats,
}

/// A kind of work an office can queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Stable identifier.
    pub id: String,
    /// Name shown to the player.
    #[serde(default)]
    pub display_name: String,
    /// Task category.
    #[serde(default)]
    pub category: TaskCategory,
    /// Work units needed to complete one instance.
    #[serde(default = "default_task_duration")]
    pub base_duration: f64,
    /// Fractional +/- spread applied to each instance's duration (0 = none).
    #[serde(default)]
    pub duration_variation: f64,
    /// Reward before level, quality, and revenue scaling.
    #[serde(default)]
    pub base_reward: RewardBundle,
    /// Reward multiplier as a function of employee level.
    #[serde(default)]
    pub difficulty: Curve,
}

impl TaskDefinition {
    /// Base reward for an employee of the given level.
    pub fn reward_for_level(&self, level: u32) -> RewardBundle {
        self.base_reward * self.difficulty.evaluate(f64::from(level))
    }

    /// Authored duration, floored at [`MIN_TASK_DURATION_SECS`].
    pub fn duration(&self) -> f64 {
        self.base_duration.max(MIN_TASK_DURATION_SECS)
    }
}

/// A kind of office the player can unlock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeDefinition {
    /// Stable identifier.
    pub id: String,
    /// Name shown to the player.
    #[serde(default)]
    pub display_name: String,
    /// Maximum roster size.
    #[serde(default = "default_max_staff")]
    pub max_staff: u32,
    /// Layout grid size as `(width, height)` in cells.
    #[serde(default = "default_grid_size")]
    pub grid_size: (u32, u32),
    /// Base productivity multiplier for members.
    #[serde(default = "default_one")]
    pub productivity_multiplier: f64,
    /// Flat morale bonus for members.
    #[serde(default)]
    pub morale_bonus: f64,
    /// Base revenue multiplier.
    #[serde(default = "default_one")]
    pub revenue_multiplier: f64,
    /// Price of unlocking this office.
    #[serde(default)]
    pub unlock_cost: CostBundle,
}

impl OfficeDefinition {
    /// Roster capacity, never below one.
    pub fn capacity(&self) -> usize {
        usize::try_from(self.max_staff.max(1)).unwrap_or(usize::MAX)
    }

    /// Grid size with each edge floored at [`MIN_GRID_EDGE`].
    pub fn grid(&self) -> (u32, u32) {
        (
            self.grid_size.0.max(MIN_GRID_EDGE),
            self.grid_size.1.max(MIN_GRID_EDGE),
        )
    }
}

/// A purchasable modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDefinition {
    /// Stable identifier.
    pub id: String,
    /// Name shown to the player.
    #[serde(default)]
    pub display_name: String,
    /// Global stacks or a single office.
    #[serde(default)]
    pub target: UpgradeTarget,
    /// Productivity factor applied per level.
    #[serde(default = "default_one")]
    pub productivity_multiplier: f64,
    /// Flat morale bonus (office upgrades) applied per level.
    #[serde(default)]
    pub morale_bonus: f64,
    /// Morale regeneration factor (global upgrades) applied per level.
    #[serde(default = "default_one")]
    pub morale_multiplier: f64,
    /// Revenue factor applied per level.
    #[serde(default = "default_one")]
    pub revenue_multiplier: f64,
    /// Office stats factor applied per level.
    #[serde(default = "default_one")]
    pub stats_multiplier: f64,
    /// Price of the first level.
    #[serde(default)]
    pub cost: CostBundle,
    /// Whether the upgrade can be bought more than once.
    #[serde(default)]
    pub repeatable: bool,
    /// Highest purchasable level.
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    /// Cost multiplier as a function of the level being bought.
    #[serde(default = "default_cost_scaling")]
    pub cost_scaling: Curve,
}

impl UpgradeDefinition {
    /// Price of buying `level` (1-based).
    pub fn cost_for_level(&self, level: u32) -> CostBundle {
        if !self.repeatable || level <= 1 {
            return self.cost;
        }
        self.cost * self.cost_scaling.evaluate(f64::from(level))
    }

    /// Highest purchasable level, never below one.
    pub fn level_cap(&self) -> u32 {
        if self.repeatable { self.max_level.max(1) } else { 1 }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// All authored definitions, addressable by stable string id.
///
/// Deserializes from a document with four lists (`archetypes`, `tasks`,
/// `offices`, `upgrades`); missing lists are empty.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    archetypes: BTreeMap<String, Arc<EmployeeArchetype>>,
    tasks: BTreeMap<String, Arc<TaskDefinition>>,
    offices: BTreeMap<String, Arc<OfficeDefinition>>,
    upgrades: BTreeMap<String, Arc<UpgradeDefinition>>,
}

/// Serialized shape of a [`Catalog`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Employee archetypes.
    #[serde(default)]
    pub archetypes: Vec<EmployeeArchetype>,
    /// Task definitions.
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
    /// Office definitions.
    #[serde(default)]
    pub offices: Vec<OfficeDefinition>,
    /// Upgrade definitions.
    #[serde(default)]
    pub upgrades: Vec<UpgradeDefinition>,
}

impl Catalog {
    /// Create an empty catalog.
    pub const fn new() -> Self {
        Self {
            archetypes: BTreeMap::new(),
            tasks: BTreeMap::new(),
            offices: BTreeMap::new(),
            upgrades: BTreeMap::new(),
        }
    }

    /// Add or replace an archetype, returning the shared handle.
    pub fn insert_archetype(&mut self, archetype: EmployeeArchetype) -> Arc<EmployeeArchetype> {
        let shared = Arc::new(archetype);
        self.archetypes.insert(shared.id.clone(), Arc::clone(&shared));
        shared
    }

    /// Add or replace a task definition, returning the shared handle.
    pub fn insert_task(&mut self, task: TaskDefinition) -> Arc<TaskDefinition> {
        let shared = Arc::new(task);
        self.tasks.insert(shared.id.clone(), Arc::clone(&shared));
        shared
    }

    /// Add or replace an office definition, returning the shared handle.
    pub fn insert_office(&mut self, office: OfficeDefinition) -> Arc<OfficeDefinition> {
        let shared = Arc::new(office);
        self.offices.insert(shared.id.clone(), Arc::clone(&shared));
        shared
    }

    /// Add or replace an upgrade definition, returning the shared handle.
    pub fn insert_upgrade(&mut self, upgrade: UpgradeDefinition) -> Arc<UpgradeDefinition> {
        let shared = Arc::new(upgrade);
        self.upgrades.insert(shared.id.clone(), Arc::clone(&shared));
        shared
    }

    /// Look up an archetype by id.
    pub fn archetype(&self, id: &str) -> Option<Arc<EmployeeArchetype>> {
        self.archetypes.get(id).cloned()
    }

    /// Look up a task definition by id.
    pub fn task(&self, id: &str) -> Option<Arc<TaskDefinition>> {
        self.tasks.get(id).cloned()
    }

    /// Look up an office definition by id.
    pub fn office(&self, id: &str) -> Option<Arc<OfficeDefinition>> {
        self.offices.get(id).cloned()
    }

    /// Look up an upgrade definition by id.
    pub fn upgrade(&self, id: &str) -> Option<Arc<UpgradeDefinition>> {
        self.upgrades.get(id).cloned()
    }

    /// Number of definitions of each kind, as `(archetypes, tasks, offices, upgrades)`.
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.archetypes.len(),
            self.tasks.len(),
            self.offices.len(),
            self.upgrades.len(),
        )
    }
}

impl From<CatalogDocument> for Catalog {
    fn from(doc: CatalogDocument) -> Self {
        let mut catalog = Self::new();
        for archetype in doc.archetypes {
            catalog.insert_archetype(archetype);
        }
        for task in doc.tasks {
            catalog.insert_task(task);
        }
        for office in doc.offices {
            catalog.insert_office(office);
        }
        for upgrade in doc.upgrades {
            catalog.insert_upgrade(upgrade);
        }
        catalog
    }
}

fn default_base_stats() -> EmployeeStats {
    EmployeeStats::new(1.0, 100.0, 1.0, 1.0)
}

const fn default_task_duration() -> f64 {
    30.0
}

const fn default_max_staff() -> u32 {
    5
}

const fn default_grid_size() -> (u32, u32) {
    (10, 10)
}

const fn default_one() -> f64 {
    1.0
}

const fn default_max_level() -> u32 {
    1
}

fn default_cost_scaling() -> Curve {
    Curve::linear(1.0, 1.0, 10.0, 5.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn upgrade(repeatable: bool) -> UpgradeDefinition {
        UpgradeDefinition {
            id: "coffee".to_owned(),
            display_name: String::new(),
            target: UpgradeTarget::Global,
            productivity_multiplier: 1.1,
            morale_bonus: 0.0,
            morale_multiplier: 1.0,
            revenue_multiplier: 1.0,
            stats_multiplier: 1.0,
            cost: CostBundle::cash(100.0),
            repeatable,
            max_level: 10,
            cost_scaling: default_cost_scaling(),
        }
    }

    #[test]
    fn repeatable_upgrade_cost_scales_with_level() {
        let def = upgrade(true);
        assert!(close(def.cost_for_level(1).cash, 100.0));
        assert!(close(def.cost_for_level(10).cash, 500.0));
        assert_eq!(def.level_cap(), 10);
    }

    #[test]
    fn one_shot_upgrade_has_fixed_cost_and_single_level() {
        let def = upgrade(false);
        assert!(close(def.cost_for_level(5).cash, 100.0));
        assert_eq!(def.level_cap(), 1);
    }

    #[test]
    fn task_reward_uses_difficulty_curve() {
        let def = TaskDefinition {
            id: "code".to_owned(),
            display_name: String::new(),
            category: TaskCategory::Development,
            base_duration: 0.2,
            duration_variation: 0.0,
            base_reward: RewardBundle::new(10.0, 0.0, 0.0, 0.0),
            difficulty: Curve::linear(1.0, 1.0, 3.0, 2.0),
        };
        assert!(close(def.reward_for_level(2).cash, 15.0));
        assert!(close(def.duration(), MIN_TASK_DURATION_SECS));
    }

    #[test]
    fn catalog_resolves_by_id() {
        let json = r#"{
            "archetypes": [{"id": "dev", "base_stats": {"productivity": 1.2, "morale": 100.0, "efficiency": 0.8, "quality": 1.0}}],
            "tasks": [{"id": "code", "base_duration": 10.0}],
            "offices": [{"id": "garage", "max_staff": 0, "grid_size": [2, 20]}]
        }"#;
        let doc: CatalogDocument = serde_json::from_str(json).unwrap();
        let catalog = Catalog::from(doc);
        assert_eq!(catalog.counts(), (1, 1, 1, 0));
        assert!(catalog.archetype("dev").is_some());
        assert!(catalog.task("missing").is_none());
        let garage = catalog.office("garage").unwrap();
        assert_eq!(garage.capacity(), 1);
        assert_eq!(garage.grid(), (MIN_GRID_EDGE, 20));
    }
}
