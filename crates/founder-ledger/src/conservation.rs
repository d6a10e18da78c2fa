//! Reconciliation of the journal against the balance.
//!
//! The ledger updates its balance and its journal in the same call. Any
//! disagreement between the two is a defect in the ledger itself.
//!
//! For each currency C:
//!
//! ```text
//! opening(C) + sum(signed entries of C) == balance(C)   (within tolerance)
//! ```

use founder_types::CurrencyBalance;

use crate::LedgerAnomaly;
use crate::transaction::LedgerEntry;

/// Absolute tolerance for floating-point drift, scaled by journal length.
const TOLERANCE_PER_ENTRY: f64 = 1e-9;

/// The result of a reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConservationResult {
    /// The journal explains the balance.
    Balanced,
    /// One or more currencies do not reconcile.
    Anomaly(LedgerAnomaly),
}

impl ConservationResult {
    /// Whether the journal reconciled.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Replay `entries` on top of `opening` and compare with `balance`.
pub fn reconcile(
    opening: CurrencyBalance,
    entries: &[LedgerEntry],
    balance: CurrencyBalance,
) -> ConservationResult {
    let (mut cash, mut research, mut reputation) =
        (opening.cash, opening.research, opening.reputation);
    for entry in entries {
        let (dc, dr, dp) = entry.signed();
        cash += dc;
        research += dr;
        reputation += dp;
    }

    #[allow(clippy::cast_precision_loss)]
    let tolerance = TOLERANCE_PER_ENTRY * (entries.len().max(1) as f64) * scale(balance);

    let imbalances: Vec<(&'static str, f64, f64)> = [
        ("cash", cash, balance.cash),
        ("research", research, balance.research),
        ("reputation", reputation, balance.reputation),
    ]
    .into_iter()
    .filter(|(_, expected, actual)| (expected - actual).abs() > tolerance)
    .collect();

    if imbalances.is_empty() {
        return ConservationResult::Balanced;
    }

    let message = imbalances
        .iter()
        .map(|(currency, expected, actual)| format!("{currency}: journal {expected}, balance {actual}"))
        .collect::<Vec<_>>()
        .join("; ");
    ConservationResult::Anomaly(LedgerAnomaly {
        imbalances,
        message: format!("LEDGER_ANOMALY {message}"),
    })
}

fn scale(balance: CurrencyBalance) -> f64 {
    balance
        .cash
        .abs()
        .max(balance.research.abs())
        .max(balance.reputation.abs())
        .max(1.0)
}
