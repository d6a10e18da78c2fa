//! Journal records for the economy ledger.
//!
//! Each successful credit or debit appends one [`LedgerEntry`]. Entries
//! carry the three currency components only; experience never enters the
//! ledger.

use serde::{Deserialize, Serialize};

use founder_types::{CostBundle, RewardBundle};

use crate::LedgerError;

/// Whether an entry added to or removed from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryDirection {
    /// Currency received (task rewards).
    Credit,
    /// Currency paid (hires, unlocks, upgrades).
    Debit,
}

/// One append-only journal record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Position in the journal, starting at 1.
    pub sequence: u64,
    /// Credit or debit.
    pub direction: EntryDirection,
    /// Cash moved.
    pub cash: f64,
    /// Research moved.
    pub research: f64,
    /// Reputation moved.
    pub reputation: f64,
}

impl LedgerEntry {
    /// Build a credit entry from the currency part of a reward.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NonFinite`] if any component is NaN or infinite.
    pub fn credit(sequence: u64, reward: &RewardBundle) -> Result<Self, LedgerError> {
        check_finite("credit", "cash", reward.cash)?;
        check_finite("credit", "research", reward.research)?;
        check_finite("credit", "reputation", reward.reputation)?;
        Ok(Self {
            sequence,
            direction: EntryDirection::Credit,
            cash: reward.cash,
            research: reward.research,
            reputation: reward.reputation,
        })
    }

    /// Build a debit entry from a cost.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NonFinite`] or [`LedgerError::NegativeCost`]
    /// if any component is unusable.
    pub fn debit(sequence: u64, cost: &CostBundle) -> Result<Self, LedgerError> {
        for (currency, value) in [
            ("cash", cost.cash),
            ("research", cost.research),
            ("reputation", cost.reputation),
        ] {
            check_finite("debit", currency, value)?;
            if value < 0.0 {
                return Err(LedgerError::NegativeCost { currency, value });
            }
        }
        Ok(Self {
            sequence,
            direction: EntryDirection::Debit,
            cash: cost.cash,
            research: cost.research,
            reputation: cost.reputation,
        })
    }

    /// Signed components: positive for credits, negative for debits.
    pub fn signed(&self) -> (f64, f64, f64) {
        match self.direction {
            EntryDirection::Credit => (self.cash, self.research, self.reputation),
            EntryDirection::Debit => (-self.cash, -self.research, -self.reputation),
        }
    }
}

fn check_finite(side: &'static str, currency: &'static str, value: f64) -> Result<(), LedgerError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LedgerError::NonFinite {
            side,
            currency,
            value,
        })
    }
}
