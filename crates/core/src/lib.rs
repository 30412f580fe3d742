//! Core reporting logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Ledger records are handed in by the caller; reports are computed fresh on
//! every call and never persisted here.
//!
//! # Modules
//!
//! - `ledger` - Transaction and spending plan records
//! - `budget` - Spending plan budget vs actual comparison
//! - `reports` - Year/month reports grouped by type, category, or plan

pub mod budget;
pub mod ledger;
pub mod reports;

pub use reports::{Report, ReportError, ReportKind, ReportOptions, ReportService};
