//! Ledger transaction record.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{SpendingPlanId, TransactionId, YearMonth};

use super::types::TransactionKind;

/// A recorded income or outcome.
///
/// Immutable once recorded. Outcome amounts are stored as positive spend;
/// the sign of `amount` is preserved as-is by every aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Booking date.
    pub date: NaiveDate,
    /// Signed amount.
    pub amount: Decimal,
    /// Income or outcome.
    pub kind: TransactionKind,
    /// Category label, if categorised.
    #[serde(default)]
    pub category: Option<String>,
    /// Spending plan the transaction counts against.
    #[serde(default)]
    pub plan_id: Option<SpendingPlanId>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Transaction {
    /// Creates a transaction with a fresh ID and no category or plan.
    #[must_use]
    pub fn new(date: NaiveDate, amount: Decimal, kind: TransactionKind) -> Self {
        Self {
            id: TransactionId::new(),
            date,
            amount,
            kind,
            category: None,
            plan_id: None,
            description: None,
        }
    }

    /// Creates an income transaction.
    #[must_use]
    pub fn income(date: NaiveDate, amount: Decimal) -> Self {
        Self::new(date, amount, TransactionKind::Income)
    }

    /// Creates an outcome transaction.
    #[must_use]
    pub fn outcome(date: NaiveDate, amount: Decimal) -> Self {
        Self::new(date, amount, TransactionKind::Outcome)
    }

    /// Sets the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the spending plan.
    #[must_use]
    pub fn with_plan(mut self, plan_id: SpendingPlanId) -> Self {
        self.plan_id = Some(plan_id);
        self
    }

    /// Calendar month the transaction falls in.
    #[must_use]
    pub fn year_month(&self) -> YearMonth {
        YearMonth::from(self.date)
    }

    /// Category label, treating blank labels as absent.
    #[must_use]
    pub fn category_label(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
