//! Budget comparison types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::SpendingPlanId;

/// Where actual spend sits relative to the plan's budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Spent less than budgeted.
    UnderBudget,
    /// Spent exactly the budget.
    OnBudget,
    /// Spent more than budgeted.
    OverBudget,
}

/// A plan's monthly budget next to its actual spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanComparison {
    /// Plan ID.
    pub plan_id: SpendingPlanId,
    /// Plan label.
    pub label: String,
    /// Budget for the month.
    pub budget: Decimal,
    /// Actual spend in the month.
    pub spent: Decimal,
    /// Money left over (budget - spent). Negative when over budget.
    pub remaining: Decimal,
    /// Spent as a percentage of budget (spent / budget * 100).
    pub utilization_percent: Decimal,
    /// Budget status.
    pub status: BudgetStatus,
}
