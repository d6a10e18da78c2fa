//! Orchestration services.
//!
//! Each service owns one collection and is the only code that mutates it:
//!
//! - [`economy`] -- Facade over the ledger
//! - [`office`] -- Offices and the employee-to-office assignment registry
//! - [`employee`] -- The employee collection, hiring, per-tick advancement
//! - [`task`] -- Per-office FIFO task queues, dispatch, completion
//! - [`upgrade`] -- Purchased upgrade levels and their modifier effects
//!
//! Services never hold references to each other. When an operation needs
//! another service it takes it as an argument, so the borrow of each
//! collection stays visible at the call site.

pub mod economy;
pub mod employee;
pub mod office;
pub mod task;
pub mod upgrade;

use founder_domain::DomainError;
use founder_ledger::LedgerError;

pub use economy::{EconomyService, EconomySnapshot};
pub use employee::{EmployeeService, EmployeeServiceSnapshot, EmployeeTickReport};
pub use office::{OfficeService, OfficeServiceSnapshot};
pub use task::{OfficeQueueSnapshot, TaskService, TaskServiceSnapshot};
pub use upgrade::{PurchaseOutcome, UpgradeLevel, UpgradeService, UpgradeServiceSnapshot};

/// Errors a service operation can raise.
///
/// These are contract violations (bad amounts, bad durations), never
/// ordinary conditions such as insufficient funds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// An entity rejected an operation.
    #[error("domain error: {source}")]
    Domain {
        /// The underlying domain error.
        #[from]
        source: DomainError,
    },

    /// The ledger rejected an amount.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },
}

/// An entity left out of a restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntity {
    /// Entity kind ("office", "employee", "task", "upgrade").
    pub kind: &'static str,
    /// Identifier of the skipped entity.
    pub id: String,
    /// Why it was skipped.
    pub reason: String,
}

impl SkippedEntity {
    pub(crate) fn new(kind: &'static str, id: impl ToString, reason: impl ToString) -> Self {
        Self {
            kind,
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}
