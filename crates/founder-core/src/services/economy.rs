//! Economy service: the ledger plus capture/restore of the raw balance.

use serde::{Deserialize, Serialize};

use founder_events::EventBus;
use founder_ledger::{ConservationResult, Ledger, LedgerError};
use founder_types::{CostBundle, CurrencyBalance, RewardBundle};

/// Persisted form of the economy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomySnapshot {
    /// Balance at capture time.
    pub balance: CurrencyBalance,
}

/// Facade over the [`Ledger`].
#[derive(Debug)]
pub struct EconomyService {
    ledger: Ledger,
}

impl EconomyService {
    /// Create the service with a starting balance.
    pub const fn new(starting: CurrencyBalance, bus: EventBus) -> Self {
        Self {
            ledger: Ledger::new(starting, bus),
        }
    }

    /// The current balance.
    pub const fn balance(&self) -> CurrencyBalance {
        self.ledger.balance()
    }

    /// Credit a reward. Emits reward-received then balance-changed.
    pub fn add(&mut self, reward: &RewardBundle) -> Result<(), LedgerError> {
        self.ledger.add(reward)
    }

    /// Whether every component of `cost` is covered.
    pub fn can_afford(&self, cost: &CostBundle) -> bool {
        self.ledger.can_afford(cost)
    }

    /// Pay `cost` if affordable. `Ok(false)` leaves the balance unchanged.
    pub fn try_spend(&mut self, cost: &CostBundle) -> Result<bool, LedgerError> {
        self.ledger.try_spend(cost)
    }

    /// Check the balance against the journal.
    pub fn reconcile(&self) -> ConservationResult {
        self.ledger.reconcile()
    }

    /// The underlying ledger.
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Capture the balance.
    pub const fn capture_state(&self) -> EconomySnapshot {
        EconomySnapshot {
            balance: self.ledger.capture(),
        }
    }

    /// Replace the balance with a captured one.
    pub fn restore_state(&mut self, snapshot: &EconomySnapshot) -> Result<(), LedgerError> {
        self.ledger.restore(snapshot.balance)
    }
}
