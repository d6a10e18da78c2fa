//! Economy ledger for the Focus Founder progression engine.
//!
//! Every currency unit the player holds passes through this crate. Rewards
//! are credited unconditionally; costs are debited only when the whole
//! bundle is affordable, so no balance component ever goes negative after
//! a successful spend.
//!
//! # Architecture
//!
//! - [`ledger`] -- The [`Ledger`] struct: current balance, journal, and the
//!   event side effects of each mutation.
//! - [`transaction`] -- [`LedgerEntry`] records appended for every credit
//!   and debit.
//! - [`conservation`] -- Reconciliation of the journal against the balance.
//!
//! # Conservation Law
//!
//! For every currency C:
//!
//! ```text
//! opening(C) + sum(credits of C) - sum(debits of C) == balance(C)
//! ```
//!
//! A mismatch beyond floating-point tolerance is a [`LedgerAnomaly`]. The
//! ledger never panics; it returns errors.
//!
//! # Usage
//!
//! ```
//! use founder_events::EventBus;
//! use founder_ledger::Ledger;
//! use founder_types::{CostBundle, CurrencyBalance, RewardBundle};
//!
//! let mut ledger = Ledger::new(CurrencyBalance::new(100.0, 0.0, 0.0), EventBus::new());
//! ledger.add(&RewardBundle::new(20.0, 1.0, 0.0, 0.0)).ok();
//! assert_eq!(ledger.try_spend(&CostBundle::cash(500.0)).ok(), Some(false));
//! assert_eq!(ledger.try_spend(&CostBundle::cash(50.0)).ok(), Some(true));
//! assert!(ledger.reconcile().is_balanced());
//! ```

pub mod conservation;
pub mod ledger;
pub mod transaction;

pub use conservation::ConservationResult;
pub use ledger::Ledger;
pub use transaction::{EntryDirection, LedgerEntry};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording ledger entries.
///
/// These are contract violations by the caller. An unaffordable cost is not
/// an error; it is a `false` result from [`Ledger::try_spend`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// A component of the amount is NaN or infinite.
    #[error("{side} amount has a non-finite {currency} component: {value}")]
    NonFinite {
        /// Which operation received the amount ("credit" or "debit").
        side: &'static str,
        /// Name of the offending currency.
        currency: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// A cost component is negative.
    #[error("cost has a negative {currency} component: {value}")]
    NegativeCost {
        /// Name of the offending currency.
        currency: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// A restored balance has a negative or non-finite component.
    #[error("restored balance is invalid: {cash}/{research}/{reputation}")]
    InvalidBalance {
        /// Cash component.
        cash: f64,
        /// Research component.
        research: f64,
        /// Reputation component.
        reputation: f64,
    },
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A reconciliation failure: the journal does not explain the balance.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerAnomaly {
    /// Per-currency mismatch as `(currency, expected_from_journal, actual)`.
    pub imbalances: Vec<(&'static str, f64, f64)>,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
