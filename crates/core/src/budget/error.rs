//! Budget error types.

use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    /// An intermediate amount does not fit in a decimal.
    #[error("Amount overflow while comparing plan {0}")]
    AmountOverflow(String),
}
