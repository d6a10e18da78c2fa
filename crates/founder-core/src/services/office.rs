//! Office service: unlocked offices and the assignment registry.
//!
//! The registry (`employee -> office`) is the single answer to "where does
//! this employee work". Office rosters and the registry are only changed
//! together, so they never disagree.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use founder_domain::{Footprint, GridPosition, Office, OfficeModifiers, OfficeSnapshot, Placement, PlacementId};
use founder_events::EventBus;
use founder_ledger::LedgerError;
use founder_types::{Catalog, EmployeeId, EmployeeState, GameEvent, OfficeDefinition, OfficeId, UpgradeDefinition};

use super::SkippedEntity;
use super::economy::EconomyService;
use super::employee::EmployeeService;

/// Persisted form of the office service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfficeServiceSnapshot {
    /// Every office, in id order.
    pub offices: Vec<OfficeSnapshot>,
}

/// Owns offices and the employee-to-office registry.
#[derive(Debug)]
pub struct OfficeService {
    offices: BTreeMap<OfficeId, Office>,
    assignments: BTreeMap<EmployeeId, OfficeId>,
    bus: EventBus,
}

impl OfficeService {
    /// Create a service with no offices.
    pub const fn new(bus: EventBus) -> Self {
        Self {
            offices: BTreeMap::new(),
            assignments: BTreeMap::new(),
            bus,
        }
    }

    /// Pay the unlock cost and open a new office.
    ///
    /// Returns `Ok(None)` when the cost is not affordable. A zero cost is
    /// not charged.
    pub fn try_unlock_office(
        &mut self,
        definition: Arc<OfficeDefinition>,
        economy: &mut EconomyService,
    ) -> Result<Option<OfficeId>, LedgerError> {
        if !definition.unlock_cost.is_empty() && !economy.try_spend(&definition.unlock_cost)? {
            debug!(office = %definition.id, "cannot afford office unlock");
            return Ok(None);
        }

        let office = Office::new(definition);
        let id = office.id();
        let definition_id = office.definition().id.clone();
        info!(office = %id, definition = %definition_id, "office unlocked");
        self.offices.insert(id, office);
        self.bus.publish(&GameEvent::OfficeUnlocked {
            office: id,
            definition: definition_id,
        });
        Ok(Some(id))
    }

    /// Move `employee` into `office`.
    ///
    /// The move is atomic: when the target cannot accept the employee, the
    /// employee stays where it was and `false` is returned. Assigning to the
    /// current office is a no-op that succeeds.
    pub fn assign_employee_to_office(&mut self, employee: EmployeeId, office: OfficeId) -> bool {
        let previous = self.assignments.get(&employee).copied();
        if previous == Some(office) {
            return true;
        }
        if !self.offices.get(&office).is_some_and(|o| o.can_accept(employee)) {
            debug!(%employee, %office, "office cannot accept employee");
            return false;
        }

        if let Some(old) = previous.and_then(|id| self.offices.get_mut(&id)) {
            old.try_remove_employee(employee);
        }
        let added = self
            .offices
            .get_mut(&office)
            .is_some_and(|target| target.try_add_employee(employee));
        if !added {
            if let Some(old) = previous.and_then(|id| self.offices.get_mut(&id)) {
                old.try_add_employee(employee);
            }
            return false;
        }

        self.assignments.insert(employee, office);
        info!(%employee, %office, ?previous, "employee assigned");
        self.bus.publish(&GameEvent::EmployeeAssigned {
            employee,
            office,
            previous,
        });
        true
    }

    /// Remove `employee` from its office. Returns the office it left.
    pub fn unassign_employee(&mut self, employee: EmployeeId) -> Option<OfficeId> {
        let office = self.assignments.remove(&employee)?;
        if let Some(o) = self.offices.get_mut(&office) {
            o.try_remove_employee(employee);
        }
        debug!(%employee, %office, "employee unassigned");
        Some(office)
    }

    /// The office `employee` is assigned to.
    pub fn office_for_employee(&self, employee: EmployeeId) -> Option<OfficeId> {
        self.assignments.get(&employee).copied()
    }

    /// Modifiers of the office `employee` works in.
    pub fn modifiers_for_employee(&self, employee: EmployeeId) -> Option<&OfficeModifiers> {
        self.office_for_employee(employee)
            .and_then(|id| self.offices.get(&id))
            .map(Office::modifiers)
    }

    /// Look up an office.
    pub fn office(&self, id: OfficeId) -> Option<&Office> {
        self.offices.get(&id)
    }

    /// Every office, in id order.
    pub fn offices(&self) -> impl Iterator<Item = &Office> {
        self.offices.values()
    }

    /// Number of unlocked offices.
    pub fn len(&self) -> usize {
        self.offices.len()
    }

    /// Whether no office is unlocked.
    pub fn is_empty(&self) -> bool {
        self.offices.is_empty()
    }

    /// Members of `office`; empty for an unknown office.
    pub fn roster(&self, office: OfficeId) -> &[EmployeeId] {
        self.offices.get(&office).map_or(&[], Office::roster)
    }

    /// Members of `office` currently in `state`, such as the idle or the
    /// working part of the roster.
    pub fn members_in_state(
        &self,
        office: OfficeId,
        employees: &EmployeeService,
        state: EmployeeState,
    ) -> Vec<EmployeeId> {
        self.roster(office)
            .iter()
            .copied()
            .filter(|id| employees.employee(*id).is_some_and(|e| e.state() == state))
            .collect()
    }

    /// Place a decoration in an office's layout.
    pub fn place_decoration(
        &mut self,
        office: OfficeId,
        item: impl Into<String>,
        origin: GridPosition,
        footprint: Footprint,
    ) -> Option<PlacementId> {
        let placed = self
            .offices
            .get_mut(&office)?
            .layout_mut()
            .try_place(item, origin, footprint);
        if let Some(id) = placed {
            debug!(%office, placement = id.0, "decoration placed");
        }
        placed
    }

    /// Remove a decoration from an office's layout.
    pub fn remove_decoration(&mut self, office: OfficeId, placement: PlacementId) -> Option<Placement> {
        self.offices.get_mut(&office)?.layout_mut().try_remove(placement)
    }

    /// Apply an office-targeted upgrade. Returns `false` for an unknown
    /// office.
    pub fn apply_office_upgrade(&mut self, office: OfficeId, upgrade: &UpgradeDefinition) -> bool {
        let Some(target) = self.offices.get_mut(&office) else {
            return false;
        };
        target.modifiers_mut().apply_upgrade(upgrade);
        true
    }

    /// Drop roster entries for which `exists` is false. Returns how many
    /// were dropped.
    pub fn retain_employees<F>(&mut self, exists: F) -> usize
    where
        F: Fn(EmployeeId) -> bool,
    {
        let orphans: Vec<EmployeeId> = self
            .assignments
            .keys()
            .copied()
            .filter(|id| !exists(*id))
            .collect();
        for employee in &orphans {
            warn!(%employee, "dropping assignment of unknown employee");
            self.unassign_employee(*employee);
        }
        orphans.len()
    }

    /// Capture every office.
    pub fn capture_state(&self) -> OfficeServiceSnapshot {
        OfficeServiceSnapshot {
            offices: self.offices.values().map(Office::snapshot).collect(),
        }
    }

    /// Replace all offices with captured ones.
    ///
    /// Offices whose definition is missing from `catalog` are skipped. The
    /// registry is rebuilt from the restored rosters; an employee listed in
    /// several offices stays in the first one.
    pub fn restore_state(&mut self, snapshot: &OfficeServiceSnapshot, catalog: &Catalog) -> Vec<SkippedEntity> {
        self.offices.clear();
        self.assignments.clear();
        let mut skipped = Vec::new();

        for saved in &snapshot.offices {
            let Some(definition) = catalog.office(&saved.definition) else {
                warn!(office = %saved.id, definition = %saved.definition, "skipping office with unknown definition");
                skipped.push(SkippedEntity::new("office", saved.id, format!("unknown definition {}", saved.definition)));
                continue;
            };
            let mut office = match Office::from_snapshot(saved, definition) {
                Ok(office) => office,
                Err(err) => {
                    warn!(office = %saved.id, error = %err, "skipping office");
                    skipped.push(SkippedEntity::new("office", saved.id, err));
                    continue;
                }
            };

            let duplicates: Vec<EmployeeId> = office
                .roster()
                .iter()
                .copied()
                .filter(|member| self.assignments.contains_key(member))
                .collect();
            for member in duplicates {
                warn!(office = %saved.id, employee = %member, "employee already assigned elsewhere");
                office.try_remove_employee(member);
            }
            for member in office.roster() {
                self.assignments.insert(*member, office.id());
            }
            self.offices.insert(office.id(), office);
        }

        info!(offices = self.offices.len(), assignments = self.assignments.len(), "offices restored");
        skipped
    }
}
