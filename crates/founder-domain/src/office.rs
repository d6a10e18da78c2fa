//! Offices: a capped roster, a layout grid, and local modifiers.
//!
//! The office owns roster membership only. Employees themselves live in
//! the employee service; the roster stores their ids.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use founder_types::{EmployeeId, EmployeeStats, OfficeDefinition, OfficeId};

use crate::error::DomainError;
use crate::layout::{LayoutSnapshot, OfficeLayout};
use crate::modifiers::OfficeModifiers;

/// An unlocked office.
#[derive(Debug, Clone)]
pub struct Office {
    id: OfficeId,
    definition: Arc<OfficeDefinition>,
    roster: Vec<EmployeeId>,
    layout: OfficeLayout,
    modifiers: OfficeModifiers,
}

/// Persisted form of an [`Office`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeSnapshot {
    /// Office id.
    pub id: OfficeId,
    /// Office definition id.
    pub definition: String,
    /// Member ids in join order.
    pub roster: Vec<EmployeeId>,
    /// Placed decorations.
    #[serde(default)]
    pub layout: LayoutSnapshot,
    /// Current factors.
    pub modifiers: OfficeModifiers,
}

impl Office {
    /// Create an empty office from its definition.
    pub fn new(definition: Arc<OfficeDefinition>) -> Self {
        let (width, height) = definition.grid();
        Self {
            id: OfficeId::new(),
            modifiers: OfficeModifiers::from_definition(&definition),
            layout: OfficeLayout::new(width, height),
            roster: Vec::new(),
            definition,
        }
    }

    /// Office id.
    pub const fn id(&self) -> OfficeId {
        self.id
    }

    /// The definition this office was unlocked from.
    pub const fn definition(&self) -> &Arc<OfficeDefinition> {
        &self.definition
    }

    /// Maximum roster size.
    pub fn capacity(&self) -> usize {
        self.definition.capacity()
    }

    /// Member ids in join order.
    pub fn roster(&self) -> &[EmployeeId] {
        &self.roster
    }

    /// Whether `employee` is a member.
    pub fn contains(&self, employee: EmployeeId) -> bool {
        self.roster.contains(&employee)
    }

    /// Whether the roster is at capacity.
    pub fn is_full(&self) -> bool {
        self.roster.len() >= self.capacity()
    }

    /// Whether [`try_add_employee`](Self::try_add_employee) would succeed.
    pub fn can_accept(&self, employee: EmployeeId) -> bool {
        !self.is_full() && !self.contains(employee)
    }

    /// Add `employee` if there is room and it is not already a member.
    pub fn try_add_employee(&mut self, employee: EmployeeId) -> bool {
        if !self.can_accept(employee) {
            return false;
        }
        self.roster.push(employee);
        true
    }

    /// Remove `employee` if present. Returns whether it was a member.
    pub fn try_remove_employee(&mut self, employee: EmployeeId) -> bool {
        let before = self.roster.len();
        self.roster.retain(|member| *member != employee);
        before != self.roster.len()
    }

    /// Sum of member stats scaled by the office stats multiplier.
    ///
    /// `stats_of` resolves a member id to its current stats; members it
    /// cannot resolve contribute nothing.
    pub fn combined_stats<F>(&self, stats_of: F) -> EmployeeStats
    where
        F: Fn(EmployeeId) -> Option<EmployeeStats>,
    {
        let total: EmployeeStats = self.roster.iter().filter_map(|id| stats_of(*id)).sum();
        total * self.modifiers.stats_multiplier
    }

    /// The layout grid.
    pub const fn layout(&self) -> &OfficeLayout {
        &self.layout
    }

    /// The layout grid, for placement and removal.
    pub const fn layout_mut(&mut self) -> &mut OfficeLayout {
        &mut self.layout
    }

    /// Current factors.
    pub const fn modifiers(&self) -> &OfficeModifiers {
        &self.modifiers
    }

    /// Current factors, for upgrades.
    pub const fn modifiers_mut(&mut self) -> &mut OfficeModifiers {
        &mut self.modifiers
    }

    /// Capture the office for persistence.
    pub fn snapshot(&self) -> OfficeSnapshot {
        OfficeSnapshot {
            id: self.id,
            definition: self.definition.id.clone(),
            roster: self.roster.clone(),
            layout: self.layout.snapshot(),
            modifiers: self.modifiers,
        }
    }

    /// Rebuild an office from a snapshot and its resolved definition.
    ///
    /// Duplicate members and members beyond capacity are dropped, as are
    /// placements that no longer fit the grid.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownDefinition`] if `definition` is not the
    /// one the snapshot names.
    pub fn from_snapshot(
        snapshot: &OfficeSnapshot,
        definition: Arc<OfficeDefinition>,
    ) -> Result<Self, DomainError> {
        if definition.id != snapshot.definition {
            return Err(DomainError::UnknownDefinition {
                kind: "office",
                id: snapshot.definition.clone(),
            });
        }

        let (width, height) = definition.grid();
        let (layout, rejected) = OfficeLayout::from_snapshot(width, height, &snapshot.layout);
        for placement in &rejected {
            warn!(office = %snapshot.id, item = %placement.item, "dropped placement that no longer fits");
        }

        let mut office = Self {
            id: snapshot.id,
            definition,
            roster: Vec::new(),
            layout,
            modifiers: snapshot.modifiers,
        };
        for member in &snapshot.roster {
            if !office.try_add_employee(*member) {
                warn!(office = %snapshot.id, employee = %member, "dropped roster entry on restore");
            }
        }
        Ok(office)
    }
}
