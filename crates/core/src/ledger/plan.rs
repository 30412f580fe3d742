//! Spending plan record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::SpendingPlanId;

use super::types::PlanPeriod;

/// A budget that transactions can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingPlan {
    /// Plan ID.
    pub id: SpendingPlanId,
    /// Display label.
    pub label: String,
    /// Budgeted amount for one `period`.
    pub budget_amount: Decimal,
    /// Period the budget covers.
    #[serde(default)]
    pub period: PlanPeriod,
}

impl SpendingPlan {
    /// Creates a monthly plan with a fresh ID.
    #[must_use]
    pub fn monthly(label: impl Into<String>, budget_amount: Decimal) -> Self {
        Self {
            id: SpendingPlanId::new(),
            label: label.into(),
            budget_amount,
            period: PlanPeriod::Monthly,
        }
    }

    /// Budget available in a single calendar month.
    #[must_use]
    pub fn monthly_budget(&self) -> Decimal {
        self.period.monthly_share(self.budget_amount)
    }
}
