//! The economy ledger: current balance plus an append-only journal.
//!
//! The [`Ledger`] is the only writer of the player's [`CurrencyBalance`].
//! Each mutation appends a [`LedgerEntry`] and publishes the matching
//! events on the [`EventBus`].
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or deleted, except that
//!   [`Ledger::restore`] starts a fresh journal from the restored balance.
//! - **All-or-nothing spend**: affordability and subtraction read the same
//!   balance value; a failed spend leaves no trace.
//! - **Event order**: `add` emits reward-received then balance-changed;
//!   `try_spend` emits cost-paid then balance-changed.

use founder_events::EventBus;
use founder_types::{CostBundle, CurrencyBalance, GameEvent, RewardBundle};
use tracing::{debug, info};

use crate::conservation::{ConservationResult, reconcile};
use crate::transaction::LedgerEntry;
use crate::LedgerError;

/// The player's currency balance and its journal.
#[derive(Debug)]
pub struct Ledger {
    /// Balance when the current journal began.
    opening: CurrencyBalance,
    /// Current balance.
    balance: CurrencyBalance,
    /// All entries since `opening`, in insertion order.
    entries: Vec<LedgerEntry>,
    /// Next journal sequence number.
    next_sequence: u64,
    /// Where balance events are published.
    bus: EventBus,
}

impl Ledger {
    /// Create a ledger holding `opening`.
    pub const fn new(opening: CurrencyBalance, bus: EventBus) -> Self {
        Self {
            opening,
            balance: opening,
            entries: Vec::new(),
            next_sequence: 1,
            bus,
        }
    }

    /// The current balance.
    pub const fn balance(&self) -> CurrencyBalance {
        self.balance
    }

    /// The balance the current journal started from.
    pub const fn opening(&self) -> CurrencyBalance {
        self.opening
    }

    /// Journal entries since the opening balance.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Return the number of entries in the journal.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the journal has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Credit the currency part of `reward`.
    ///
    /// Additions are unconstrained. Emits reward-received then
    /// balance-changed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NonFinite`] if a component is NaN or infinite;
    /// the balance is unchanged.
    pub fn add(&mut self, reward: &RewardBundle) -> Result<(), LedgerError> {
        let entry = LedgerEntry::credit(self.next_sequence, reward)?;
        self.balance = self.balance.credited(reward);
        self.push(entry);
        debug!(
            cash = reward.cash,
            research = reward.research,
            reputation = reward.reputation,
            "reward credited"
        );

        self.bus.publish(&GameEvent::RewardReceived { reward: *reward });
        self.publish_balance();
        Ok(())
    }

    /// Whether every component of `cost` is covered by the balance.
    ///
    /// An unusable cost (negative or non-finite) is never affordable.
    pub fn can_afford(&self, cost: &CostBundle) -> bool {
        cost.is_valid() && self.balance.can_afford(cost)
    }

    /// Pay `cost` if the whole bundle is affordable.
    ///
    /// Returns `Ok(true)` after subtracting every component and emitting
    /// cost-paid then balance-changed. Returns `Ok(false)` with no mutation
    /// and no events when any component is not covered.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if a cost component is negative or not
    /// finite; the balance is unchanged.
    pub fn try_spend(&mut self, cost: &CostBundle) -> Result<bool, LedgerError> {
        let entry = LedgerEntry::debit(self.next_sequence, cost)?;
        let Some(after) = self.balance.spend(cost) else {
            debug!(
                cash = cost.cash,
                research = cost.research,
                reputation = cost.reputation,
                "spend rejected: insufficient funds"
            );
            return Ok(false);
        };

        self.balance = after;
        self.push(entry);
        debug!(
            cash = cost.cash,
            research = cost.research,
            reputation = cost.reputation,
            "cost paid"
        );

        self.bus.publish(&GameEvent::CostPaid { cost: *cost });
        self.publish_balance();
        Ok(true)
    }

    /// Check that the journal explains the current balance.
    pub fn reconcile(&self) -> ConservationResult {
        reconcile(self.opening, &self.entries, self.balance)
    }

    /// Raw balance for persistence.
    pub const fn capture(&self) -> CurrencyBalance {
        self.balance
    }

    /// Replace the balance with a captured one and start a fresh journal.
    ///
    /// Emits balance-changed so observers refresh.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidBalance`] if a component is negative or
    /// not finite; the ledger is unchanged.
    pub fn restore(&mut self, balance: CurrencyBalance) -> Result<(), LedgerError> {
        if !balance.is_valid() {
            return Err(LedgerError::InvalidBalance {
                cash: balance.cash,
                research: balance.research,
                reputation: balance.reputation,
            });
        }
        self.opening = balance;
        self.balance = balance;
        self.entries.clear();
        self.next_sequence = 1;
        info!(
            cash = balance.cash,
            research = balance.research,
            reputation = balance.reputation,
            "balance restored"
        );
        self.publish_balance();
        Ok(())
    }

    fn push(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
        self.next_sequence = self.next_sequence.saturating_add(1);
    }

    fn publish_balance(&self) {
        self.bus.publish(&GameEvent::BalanceChanged {
            balance: self.balance,
        });
    }
}
