//! Ledger domain enums.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of money for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received.
    Income,
    /// Money spent.
    Outcome,
}

impl TransactionKind {
    /// Returns the label used as a grouping key in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Period a spending plan's budget amount covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanPeriod {
    /// Budget is per calendar month.
    #[default]
    Monthly,
    /// Budget is per quarter.
    Quarterly,
    /// Budget is per year.
    Annual,
}

impl PlanPeriod {
    /// Number of calendar months the period spans.
    #[must_use]
    pub const fn months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Annual => 12,
        }
    }

    /// Spreads a budget for this period evenly over one month, rounded to cents.
    #[must_use]
    pub fn monthly_share(&self, amount: Decimal) -> Decimal {
        match self {
            Self::Monthly => amount,
            _ => (amount / Decimal::from(self.months())).round_dp(2),
        }
    }
}
