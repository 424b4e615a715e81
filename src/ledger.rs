//! Per-user transactions and budgets, kept on the client.

pub mod dashboard;
pub mod store;
pub mod view;

use thiserror::Error;

use crate::storage::StorageError;

pub use dashboard::{Change, Dashboard, SubscriptionId};
pub use store::LedgerStore;
pub use view::{BudgetProgress, BudgetStatus, CategoryTotal, DashboardView, MonthlyTotals, Summary};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("{0}")]
    Validation(&'static str),
}
