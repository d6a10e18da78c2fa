//! Domain entities and rate/reward policies for the Focus Founder
//! progression engine.
//!
//! This crate contains the state holders that the services tick and
//! mutate: everything here operates on in-memory values without touching
//! I/O, the event bus, or the ledger. It sits between `founder-types`
//! (which defines the shared value types) and `founder-core` (which
//! orchestrates).
//!
//! # Modules
//!
//! - [`config`] -- Tunable parameters ([`EmployeeConfig`], [`ProductivityConfig`], [`RewardConfig`])
//! - [`employee`] -- Employee state, leveling, morale, per-tick advancement
//! - [`error`] -- Error types for contract violations ([`DomainError`])
//! - [`layout`] -- Sparse office grid with non-overlapping placements
//! - [`modifiers`] -- [`GlobalModifiers`] stacks and per-office [`OfficeModifiers`]
//! - [`office`] -- Office roster with capacity enforcement
//! - [`strategy`] -- [`ProductivityStrategy`] and [`YieldStrategy`] with base formulas
//! - [`task`] -- Task instances with monotonically decreasing remaining work

pub mod config;
pub mod employee;
pub mod error;
pub mod layout;
pub mod modifiers;
pub mod office;
pub mod strategy;
pub mod task;

#[cfg(test)]
mod testing;

// Re-export primary types at crate root for convenience.
pub use config::{EmployeeConfig, ProductivityConfig, RewardConfig};
pub use employee::{Employee, EmployeeSnapshot, EmployeeTickOutcome, MAX_MORALE, TickRates};
pub use error::DomainError;
pub use layout::{Footprint, GridPosition, LayoutSnapshot, OfficeLayout, Placement, PlacementId};
pub use modifiers::{GlobalModifiers, OfficeModifiers};
pub use office::{Office, OfficeSnapshot};
pub use strategy::{
    BaseProductivityStrategy, BaseYieldStrategy, ProductivityContext, ProductivityStrategy,
    YieldContext, YieldStrategy,
};
pub use task::{TaskInstance, TaskSnapshot};
