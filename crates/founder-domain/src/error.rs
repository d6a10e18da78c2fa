//! Error types for the founder-domain crate.
//!
//! Ordinary game conditions (full office, occupied cell, employee busy)
//! are `bool` or `Option` results. The variants here are contract
//! violations by the caller.

/// Errors that can occur during entity operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A task duration was zero, negative, or not finite.
    #[error("task duration must be positive and finite, got {duration}")]
    InvalidDuration {
        /// The rejected duration.
        duration: f64,
    },

    /// A time step or work amount was negative or not finite.
    #[error("delta must be non-negative and finite, got {delta}")]
    NegativeDelta {
        /// The rejected delta.
        delta: f64,
    },

    /// An experience grant, modifier factor, or similar amount was unusable.
    #[error("invalid {what}: {value}")]
    InvalidAmount {
        /// What the amount was for.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A snapshot referenced a definition the catalog does not have.
    #[error("unknown {kind} definition: {id}")]
    UnknownDefinition {
        /// Definition kind ("archetype", "task", "office", "upgrade").
        kind: &'static str,
        /// The unresolved id.
        id: String,
    },

    /// A snapshot violated an entity invariant.
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot {
        /// Description of the violation.
        reason: String,
    },
}
