//! Content catalog loading.
//!
//! The catalog YAML holds four lists (`archetypes`, `tasks`, `offices`,
//! `upgrades`). Loading rejects duplicate ids and definitions whose costs
//! or rewards are unusable; everything else is taken as authored.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use founder_types::{Catalog, CatalogDocument};

/// Errors that can occur when loading the content catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the catalog file from disk.
    #[error("failed to read catalog file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse catalog YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Two definitions of the same kind share an id.
    #[error("duplicate {kind} id: {id}")]
    Duplicate {
        /// Definition kind.
        kind: &'static str,
        /// The repeated id.
        id: String,
    },

    /// A definition has an unusable value.
    #[error("invalid {kind} {id}: {reason}")]
    Invalid {
        /// Definition kind.
        kind: &'static str,
        /// Definition id.
        id: String,
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for CatalogError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Load and validate the catalog at `path`.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file cannot be read, parsed, or
/// validated.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let contents = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&contents)?;
    let (archetypes, tasks, offices, upgrades) = catalog.counts();
    info!(
        path = %path.display(),
        archetypes,
        tasks,
        offices,
        upgrades,
        "catalog loaded"
    );
    Ok(catalog)
}

/// Parse and validate a catalog from a YAML string.
///
/// # Errors
///
/// Returns [`CatalogError::Yaml`] for malformed YAML, and
/// [`CatalogError::Duplicate`] or [`CatalogError::Invalid`] for content
/// problems.
pub fn parse_catalog(yaml: &str) -> Result<Catalog, CatalogError> {
    let document: CatalogDocument = serde_yml::from_str(yaml)?;
    validate(&document)?;
    Ok(Catalog::from(document))
}

fn validate(doc: &CatalogDocument) -> Result<(), CatalogError> {
    unique("archetype", doc.archetypes.iter().map(|a| a.id.as_str()))?;
    unique("task", doc.tasks.iter().map(|t| t.id.as_str()))?;
    unique("office", doc.offices.iter().map(|o| o.id.as_str()))?;
    unique("upgrade", doc.upgrades.iter().map(|u| u.id.as_str()))?;

    for task in &doc.tasks {
        if !task.base_duration.is_finite() {
            return Err(invalid("task", &task.id, "base_duration is not finite"));
        }
        if !(0.0..1.0).contains(&task.duration_variation) {
            return Err(invalid("task", &task.id, "duration_variation must be in [0, 1)"));
        }
    }
    for office in &doc.offices {
        if !office.unlock_cost.is_valid() {
            return Err(invalid("office", &office.id, "unlock_cost must be non-negative"));
        }
    }
    for upgrade in &doc.upgrades {
        if !upgrade.cost.is_valid() {
            return Err(invalid("upgrade", &upgrade.id, "cost must be non-negative"));
        }
        let factors = [
            upgrade.productivity_multiplier,
            upgrade.morale_multiplier,
            upgrade.revenue_multiplier,
            upgrade.stats_multiplier,
        ];
        if factors.iter().any(|f| !f.is_finite() || *f < 0.0) {
            return Err(invalid("upgrade", &upgrade.id, "multipliers must be non-negative"));
        }
    }
    Ok(())
}

fn unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::Duplicate {
                kind,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}

fn invalid(kind: &'static str, id: &str, reason: &str) -> CatalogError {
    CatalogError::Invalid {
        kind,
        id: id.to_owned(),
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
archetypes:
  - id: junior-dev
    display_name: Junior Developer
    base_stats: { productivity: 1.0, morale: 100, efficiency: 1.0, quality: 40 }
tasks:
  - id: write-code
    base_duration: 20
    base_reward: { cash: 12 }
    difficulty:
      linear: { from: [1, 1.0], to: [10, 3.0] }
offices:
  - id: garage
    max_staff: 3
    unlock_cost: { cash: 0 }
upgrades:
  - id: coffee
    target: Global
    productivity_multiplier: 1.1
    cost: { cash: 50 }
    repeatable: true
    max_level: 5
";

    #[test]
    fn sample_catalog_parses() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.counts(), (1, 1, 1, 1));

        let task = catalog.task("write-code").unwrap();
        assert!((task.reward_for_level(10).cash - 36.0).abs() < 1e-9);

        let office = catalog.office("garage").unwrap();
        assert_eq!(office.capacity(), 3);
        assert_eq!(office.grid(), (10, 10));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let yaml = "tasks:\n  - id: a\n  - id: a\n";
        let result = parse_catalog(yaml);
        assert!(matches!(result, Err(CatalogError::Duplicate { kind: "task", .. })));
    }

    #[test]
    fn negative_unlock_cost_rejected() {
        let yaml = "offices:\n  - id: tower\n    unlock_cost: { cash: -5 }\n";
        assert!(matches!(parse_catalog(yaml), Err(CatalogError::Invalid { .. })));
    }
}
