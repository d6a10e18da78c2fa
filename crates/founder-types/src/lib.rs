//! Shared type definitions for the Focus Founder progression engine.
//!
//! This crate is the single source of truth for the value types used across
//! the workspace. Types that UI collaborators consume flow downstream to
//! `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for live entities
//! - [`currency`] -- Cost and reward bundles and the currency balance
//! - [`stats`] -- Derived employee statistics
//! - [`enums`] -- Employee state, task category, upgrade target, modifier category
//! - [`curve`] -- Scalar response curves used by content
//! - [`catalog`] -- Read-only content definitions and the [`Catalog`]
//! - [`events`] -- The closed [`GameEvent`] set and its [`EventKind`] tags

pub mod catalog;
pub mod currency;
pub mod curve;
pub mod enums;
pub mod events;
pub mod ids;
pub mod stats;

// Re-export all public types at crate root for convenience.
pub use catalog::{
    Catalog, CatalogDocument, EmployeeArchetype, OfficeDefinition, TaskDefinition,
    UpgradeDefinition,
};
pub use currency::{CostBundle, CurrencyBalance, RewardBundle};
pub use curve::Curve;
pub use enums::{EmployeeState, ModifierCategory, TaskCategory, UpgradeTarget};
pub use events::{EventKind, GameEvent};
pub use ids::{EmployeeId, OfficeId, TaskId};
pub use stats::EmployeeStats;

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for UI-facing types.

    #[test]
    fn export_bindings() {
        // ts-rs writes bindings for #[ts(export)] types into `bindings/`
        // relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::EmployeeId::export_all();
        let _ = crate::ids::OfficeId::export_all();
        let _ = crate::ids::TaskId::export_all();

        // Enums
        let _ = crate::enums::EmployeeState::export_all();
        let _ = crate::enums::TaskCategory::export_all();
        let _ = crate::enums::UpgradeTarget::export_all();
        let _ = crate::enums::ModifierCategory::export_all();

        // Values
        let _ = crate::currency::CostBundle::export_all();
        let _ = crate::currency::RewardBundle::export_all();
        let _ = crate::currency::CurrencyBalance::export_all();
        let _ = crate::stats::EmployeeStats::export_all();
        let _ = crate::curve::Curve::export_all();

        // Events
        let _ = crate::events::EventKind::export_all();
        let _ = crate::events::GameEvent::export_all();
    }
}
