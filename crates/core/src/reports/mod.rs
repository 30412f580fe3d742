//! Ledger report generation.
//!
//! This module provides pure business logic for turning a list of transactions
//! into year/month reports grouped by:
//! - Transaction type (income vs outcome, with monthly net)
//! - Category
//! - Spending plan (with budget comparison)

pub mod error;
mod partition;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
