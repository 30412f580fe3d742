//! Budget service for plan comparison.

use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{BudgetStatus, PlanComparison};
use crate::ledger::SpendingPlan;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Compare a plan's monthly budget against the amount spent in one month.
    ///
    /// remaining = budget - spent
    ///   - Positive remaining is under budget
    ///   - Negative remaining is over budget
    ///
    /// Utilization is 0 when the budget is zero.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::AmountOverflow` when remaining or utilization
    /// cannot be represented.
    pub fn compare(plan: &SpendingPlan, spent: Decimal) -> Result<PlanComparison, BudgetError> {
        let overflow = || BudgetError::AmountOverflow(plan.label.clone());
        let budget = plan.monthly_budget();
        let remaining = budget.checked_sub(spent).ok_or_else(overflow)?;

        let status = match remaining.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => BudgetStatus::UnderBudget,
            std::cmp::Ordering::Less => BudgetStatus::OverBudget,
            std::cmp::Ordering::Equal => BudgetStatus::OnBudget,
        };

        let utilization_percent = if budget.is_zero() {
            Decimal::ZERO
        } else {
            spent
                .checked_div(budget)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or_else(overflow)?
                .round_dp(2)
        };

        Ok(PlanComparison {
            plan_id: plan.id,
            label: plan.label.clone(),
            budget,
            spent,
            remaining,
            utilization_percent,
            status,
        })
    }
}
