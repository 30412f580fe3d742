//! Ledger records consumed by reporting.
//!
//! The ledger itself lives outside this crate; these are the read-only shapes
//! a storage layer hands over for one report computation:
//! - Transactions (income and outcome)
//! - Spending plans referenced by transactions

pub mod plan;
pub mod transaction;
pub mod types;

pub use plan::SpendingPlan;
pub use transaction::Transaction;
pub use types::{PlanPeriod, TransactionKind};
