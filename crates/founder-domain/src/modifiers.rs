//! Multiplier stacks: company-wide and per office.
//!
//! [`GlobalModifiers`] keeps named entries per [`ModifierCategory`]; the
//! effective multiplier of a category is the product of its entries, or 1
//! when it has none. It is an explicit value passed into strategies, never
//! ambient state.
//!
//! [`OfficeModifiers`] are the single office's factors, seeded from its
//! definition and raised by office upgrades.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use founder_types::{ModifierCategory, OfficeDefinition, UpgradeDefinition};

use crate::error::DomainError;

// ---------------------------------------------------------------------------
// GlobalModifiers
// ---------------------------------------------------------------------------

/// Named multiplier entries per effect category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalModifiers {
    stacks: BTreeMap<ModifierCategory, BTreeMap<String, f64>>,
}

impl GlobalModifiers {
    /// Create an empty set; every multiplier is 1.
    pub const fn new() -> Self {
        Self {
            stacks: BTreeMap::new(),
        }
    }

    /// Add or replace the entry `source` in `category`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] if `factor` is negative or not
    /// finite.
    pub fn add(
        &mut self,
        category: ModifierCategory,
        source: impl Into<String>,
        factor: f64,
    ) -> Result<(), DomainError> {
        if !(factor.is_finite() && factor >= 0.0) {
            return Err(DomainError::InvalidAmount {
                what: "modifier factor",
                value: factor,
            });
        }
        self.stacks
            .entry(category)
            .or_default()
            .insert(source.into(), factor);
        Ok(())
    }

    /// Remove the entry `source` from `category`. Returns whether it existed.
    pub fn remove(&mut self, category: ModifierCategory, source: &str) -> bool {
        let Some(stack) = self.stacks.get_mut(&category) else {
            return false;
        };
        let removed = stack.remove(source).is_some();
        if stack.is_empty() {
            self.stacks.remove(&category);
        }
        removed
    }

    /// Product of every entry in `category`; 1 when there are none.
    pub fn multiplier(&self, category: ModifierCategory) -> f64 {
        self.stacks
            .get(&category)
            .map_or(1.0, |stack| stack.values().product())
    }

    /// Entries of `category` as `(source, factor)`, ordered by source.
    pub fn entries(&self, category: ModifierCategory) -> impl Iterator<Item = (&str, f64)> {
        self.stacks
            .get(&category)
            .into_iter()
            .flat_map(|stack| stack.iter().map(|(source, factor)| (source.as_str(), *factor)))
    }

    /// Number of entries across all categories.
    pub fn len(&self) -> usize {
        self.stacks.values().map(BTreeMap::len).sum()
    }

    /// Whether no category has entries.
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.stacks.clear();
    }
}

// ---------------------------------------------------------------------------
// OfficeModifiers
// ---------------------------------------------------------------------------

/// Multiplicative factors of a single office.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OfficeModifiers {
    /// Multiplies members' productivity rate.
    pub productivity_multiplier: f64,
    /// Added to members' morale when computing productivity.
    pub morale_bonus: f64,
    /// Office revenue factor.
    pub revenue_multiplier: f64,
    /// Multiplies the office's combined stats.
    pub stats_multiplier: f64,
}

impl Default for OfficeModifiers {
    fn default() -> Self {
        Self {
            productivity_multiplier: 1.0,
            morale_bonus: 0.0,
            revenue_multiplier: 1.0,
            stats_multiplier: 1.0,
        }
    }
}

impl OfficeModifiers {
    /// Factors an office starts with, taken from its definition.
    pub const fn from_definition(definition: &OfficeDefinition) -> Self {
        Self {
            productivity_multiplier: definition.productivity_multiplier,
            morale_bonus: definition.morale_bonus,
            revenue_multiplier: definition.revenue_multiplier,
            stats_multiplier: 1.0,
        }
    }

    /// Apply one level of an office upgrade.
    pub fn apply_upgrade(&mut self, upgrade: &UpgradeDefinition) {
        self.productivity_multiplier *= upgrade.productivity_multiplier;
        self.morale_bonus += upgrade.morale_bonus;
        self.revenue_multiplier *= upgrade.revenue_multiplier;
        self.stats_multiplier *= upgrade.stats_multiplier;
    }
}
