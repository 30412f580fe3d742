//! Report error types.

use tally_shared::AppError;

use crate::budget::BudgetError;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The caller passed an argument the report cannot be built from.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ReportError {
    /// Spending plans were not supplied for a plan report.
    #[must_use]
    pub fn missing_plans() -> Self {
        Self::InvalidArgument("spending plans are required for a by_plan report".to_string())
    }

    /// The requested report kind does not exist.
    #[must_use]
    pub fn unknown_kind(name: &str) -> Self {
        Self::InvalidArgument(format!("unknown report kind: {name}"))
    }

    /// A sum or ratio left the representable decimal range.
    #[must_use]
    pub fn overflow() -> Self {
        Self::InvalidArgument("amount overflow: ledger totals exceed the decimal range".to_string())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<BudgetError> for ReportError {
    fn from(err: BudgetError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidArgument(msg) => Self::Validation(msg),
        }
    }
}
