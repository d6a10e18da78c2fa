//! Upgrade service: purchased levels and their modifier effects.
//!
//! Global upgrades add one named entry per level and category to
//! [`GlobalModifiers`] (`"<upgrade id>#<level>"`), so the stacks can be
//! rebuilt from the owned levels alone. Office upgrades fold straight into
//! the target office's modifiers, which the office snapshot carries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use founder_domain::GlobalModifiers;
use founder_events::EventBus;
use founder_types::{Catalog, GameEvent, ModifierCategory, OfficeId, UpgradeDefinition, UpgradeTarget};

use super::economy::EconomyService;
use super::office::OfficeService;
use super::{ServiceError, SkippedEntity};

/// Result of a purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The level was bought and applied.
    Purchased {
        /// Level now owned.
        level: u32,
    },
    /// Every level is already owned.
    MaxLevel,
    /// The next level's cost is not affordable.
    InsufficientFunds,
    /// An office upgrade named no office, or an unknown one.
    MissingOffice,
}

/// One owned upgrade level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevel {
    /// Upgrade definition id.
    pub upgrade: String,
    /// Target office for office upgrades.
    pub office: Option<OfficeId>,
    /// Highest level bought.
    pub level: u32,
}

/// Persisted form of the upgrade service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeServiceSnapshot {
    /// Every owned upgrade.
    pub levels: Vec<UpgradeLevel>,
}

/// Tracks purchased upgrade levels.
#[derive(Debug)]
pub struct UpgradeService {
    levels: BTreeMap<(String, Option<OfficeId>), u32>,
    bus: EventBus,
}

impl UpgradeService {
    /// Create a service with nothing purchased.
    pub const fn new(bus: EventBus) -> Self {
        Self {
            levels: BTreeMap::new(),
            bus,
        }
    }

    /// Level of `upgrade` owned for `office` (`None` for global upgrades).
    pub fn level(&self, upgrade: &str, office: Option<OfficeId>) -> u32 {
        self.levels
            .get(&(upgrade.to_owned(), office))
            .copied()
            .unwrap_or(0)
    }

    /// Buy the next level of `upgrade`.
    ///
    /// `office` is required for office upgrades and ignored for global
    /// ones.
    pub fn try_purchase(
        &mut self,
        upgrade: &UpgradeDefinition,
        office: Option<OfficeId>,
        economy: &mut EconomyService,
        offices: &mut OfficeService,
        globals: &mut GlobalModifiers,
    ) -> Result<PurchaseOutcome, ServiceError> {
        let target = match upgrade.target {
            UpgradeTarget::Global => None,
            UpgradeTarget::Office => match office.filter(|id| offices.office(*id).is_some()) {
                Some(id) => Some(id),
                None => return Ok(PurchaseOutcome::MissingOffice),
            },
        };

        let current = self.level(&upgrade.id, target);
        let Some(next) = current.checked_add(1).filter(|n| *n <= upgrade.level_cap()) else {
            return Ok(PurchaseOutcome::MaxLevel);
        };

        let cost = upgrade.cost_for_level(next);
        if !economy.try_spend(&cost)? {
            debug!(upgrade = %upgrade.id, level = next, "cannot afford upgrade");
            return Ok(PurchaseOutcome::InsufficientFunds);
        }

        match target {
            None => add_global_entries(upgrade, next, globals)?,
            Some(id) => {
                offices.apply_office_upgrade(id, upgrade);
            }
        }
        self.levels.insert((upgrade.id.clone(), target), next);

        info!(upgrade = %upgrade.id, level = next, office = ?target, "upgrade purchased");
        self.bus.publish(&GameEvent::UpgradePurchased {
            upgrade: upgrade.id.clone(),
            level: next,
            office: target,
        });
        Ok(PurchaseOutcome::Purchased { level: next })
    }

    /// Forget global purchases and clear the global stacks.
    ///
    /// Office upgrade levels stay owned, since their effects live in the
    /// office modifiers and are not undone here.
    pub fn reset(&mut self, globals: &mut GlobalModifiers) {
        self.levels.retain(|(_, office), _| office.is_some());
        globals.clear();
        info!(office_upgrades = self.levels.len(), "global upgrades reset");
    }

    /// Capture owned levels.
    pub fn capture_state(&self) -> UpgradeServiceSnapshot {
        UpgradeServiceSnapshot {
            levels: self
                .levels
                .iter()
                .map(|((upgrade, office), level)| UpgradeLevel {
                    upgrade: upgrade.clone(),
                    office: *office,
                    level: *level,
                })
                .collect(),
        }
    }

    /// Replace owned levels and rebuild `globals` from them.
    ///
    /// Unknown upgrades are skipped; levels above the cap are clamped.
    pub fn restore_state(
        &mut self,
        snapshot: &UpgradeServiceSnapshot,
        catalog: &Catalog,
        globals: &mut GlobalModifiers,
    ) -> Result<Vec<SkippedEntity>, ServiceError> {
        self.levels.clear();
        globals.clear();
        let mut skipped = Vec::new();

        for saved in &snapshot.levels {
            let Some(upgrade) = catalog.upgrade(&saved.upgrade) else {
                warn!(upgrade = %saved.upgrade, "skipping unknown upgrade");
                skipped.push(SkippedEntity::new("upgrade", &saved.upgrade, "unknown definition"));
                continue;
            };
            let level = saved.level.min(upgrade.level_cap());
            if level == 0 {
                continue;
            }
            if upgrade.target == UpgradeTarget::Global {
                for l in 1..=level {
                    add_global_entries(&upgrade, l, globals)?;
                }
            }
            self.levels.insert((saved.upgrade.clone(), saved.office), level);
        }

        info!(upgrades = self.levels.len(), modifiers = globals.len(), "upgrades restored");
        Ok(skipped)
    }
}

fn add_global_entries(
    upgrade: &UpgradeDefinition,
    level: u32,
    globals: &mut GlobalModifiers,
) -> Result<(), ServiceError> {
    let source = format!("{}#{level}", upgrade.id);
    let effects = [
        (ModifierCategory::Productivity, upgrade.productivity_multiplier),
        (ModifierCategory::Morale, upgrade.morale_multiplier),
        (ModifierCategory::Revenue, upgrade.revenue_multiplier),
    ];
    for (category, factor) in effects {
        if (factor - 1.0).abs() > f64::EPSILON {
            globals.add(category, source.as_str(), factor)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use founder_types::{CurrencyBalance, EventKind};

    use super::*;
    use crate::testing::{Recorder, office_definition, upgrade_definition};

    struct Fixture {
        upgrades: UpgradeService,
        economy: EconomyService,
        offices: OfficeService,
        globals: GlobalModifiers,
        recorder: Recorder,
    }

    fn fixture(cash: f64) -> Fixture {
        let bus = EventBus::new();
        let recorder = Recorder::attach(&bus);
        Fixture {
            upgrades: UpgradeService::new(bus.clone()),
            economy: EconomyService::new(CurrencyBalance::new(cash, 0.0, 0.0), bus.clone()),
            offices: OfficeService::new(bus),
            globals: GlobalModifiers::new(),
            recorder,
        }
    }

    fn buy(fx: &mut Fixture, upgrade: &UpgradeDefinition, office: Option<OfficeId>) -> PurchaseOutcome {
        fx.upgrades
            .try_purchase(upgrade, office, &mut fx.economy, &mut fx.offices, &mut fx.globals)
            .unwrap()
    }

    #[test]
    fn global_levels_stack_until_cap() {
        let mut fx = fixture(1_000.0);
        let coffee = upgrade_definition("coffee", UpgradeTarget::Global, 1.1);

        assert_eq!(buy(&mut fx, &coffee, None), PurchaseOutcome::Purchased { level: 1 });
        assert_eq!(buy(&mut fx, &coffee, None), PurchaseOutcome::Purchased { level: 2 });
        assert_eq!(buy(&mut fx, &coffee, None), PurchaseOutcome::Purchased { level: 3 });
        assert_eq!(buy(&mut fx, &coffee, None), PurchaseOutcome::MaxLevel);

        let multiplier = fx.globals.multiplier(ModifierCategory::Productivity);
        assert!((multiplier - 1.1_f64.powi(3)).abs() < 1e-9);
        // Costs 10, 15, 20 on the 1..3 -> 1..2 scaling curve.
        assert!((fx.economy.balance().cash - 955.0).abs() < 1e-9);
        assert_eq!(fx.recorder.count(EventKind::UpgradePurchased), 3);
    }

    #[test]
    fn unaffordable_purchase_changes_nothing() {
        let mut fx = fixture(5.0);
        let coffee = upgrade_definition("coffee", UpgradeTarget::Global, 1.1);
        assert_eq!(buy(&mut fx, &coffee, None), PurchaseOutcome::InsufficientFunds);
        assert!(fx.globals.is_empty());
        assert_eq!(fx.upgrades.level("coffee", None), 0);
    }

    #[test]
    fn office_upgrades_need_a_known_office() {
        let mut fx = fixture(100.0);
        let desks = upgrade_definition("desks", UpgradeTarget::Office, 2.0);
        assert_eq!(buy(&mut fx, &desks, None), PurchaseOutcome::MissingOffice);
        assert_eq!(buy(&mut fx, &desks, Some(OfficeId::new())), PurchaseOutcome::MissingOffice);

        let office = fx
            .offices
            .try_unlock_office(office_definition("garage", 2, 0.0), &mut fx.economy)
            .unwrap()
            .unwrap();
        assert_eq!(buy(&mut fx, &desks, Some(office)), PurchaseOutcome::Purchased { level: 1 });
        let modifiers = fx.offices.office(office).unwrap().modifiers();
        assert!((modifiers.productivity_multiplier - 2.0).abs() < 1e-9);
        assert!(fx.globals.is_empty());
        assert_eq!(fx.upgrades.level("desks", Some(office)), 1);
    }

    #[test]
    fn reset_keeps_office_levels_capped() {
        let mut fx = fixture(10_000.0);
        let coffee = upgrade_definition("coffee", UpgradeTarget::Global, 1.1);
        let desks = upgrade_definition("desks", UpgradeTarget::Office, 2.0);
        let office = fx
            .offices
            .try_unlock_office(office_definition("garage", 2, 0.0), &mut fx.economy)
            .unwrap()
            .unwrap();
        buy(&mut fx, &coffee, None);
        for _ in 0..3 {
            buy(&mut fx, &desks, Some(office));
        }

        fx.upgrades.reset(&mut fx.globals);
        assert!(fx.globals.is_empty());
        assert_eq!(fx.upgrades.level("coffee", None), 0);
        assert_eq!(fx.upgrades.level("desks", Some(office)), 3);

        assert_eq!(buy(&mut fx, &desks, Some(office)), PurchaseOutcome::MaxLevel);
        let modifiers = fx.offices.office(office).unwrap().modifiers();
        assert!((modifiers.productivity_multiplier - 8.0).abs() < 1e-9);
        assert_eq!(buy(&mut fx, &coffee, None), PurchaseOutcome::Purchased { level: 1 });
    }

    #[test]
    fn restore_rebuilds_global_stacks() {
        let mut fx = fixture(1_000.0);
        let coffee = upgrade_definition("coffee", UpgradeTarget::Global, 1.1);
        buy(&mut fx, &coffee, None);
        buy(&mut fx, &coffee, None);
        let mut snapshot = fx.upgrades.capture_state();
        snapshot.levels.push(UpgradeLevel {
            upgrade: "discontinued".to_owned(),
            office: None,
            level: 1,
        });
        let before = fx.globals.clone();

        let mut catalog = Catalog::new();
        catalog.insert_upgrade(coffee);
        fx.upgrades.reset(&mut fx.globals);
        assert!(fx.globals.is_empty());

        let skipped = fx.upgrades.restore_state(&snapshot, &catalog, &mut fx.globals).unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(fx.globals, before);
        assert_eq!(fx.upgrades.level("coffee", None), 2);
    }
}
