//! Spending plan tracking: budget vs actual comparison.

pub mod error;
pub mod service;
pub mod types;


pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{BudgetStatus, PlanComparison};
