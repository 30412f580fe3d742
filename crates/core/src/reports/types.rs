//! Report data types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::config::ReportConfig;
use tally_shared::types::{SortOrder, TransactionId};

use super::error::ReportError;
use crate::budget::PlanComparison;

/// Grouping dimension of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Group by transaction kind (income / outcome).
    ByType,
    /// Group by category label.
    ByCategory,
    /// Group by spending plan.
    ByPlan,
}

impl ReportKind {
    /// Report type identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ByType => "by_type",
            Self::ByCategory => "by_category",
            Self::ByPlan => "by_plan",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "by_type" | "type" => Ok(Self::ByType),
            "by_category" | "category" => Ok(Self::ByCategory),
            "by_plan" | "plan" => Ok(Self::ByPlan),
            _ => Err(ReportError::unknown_kind(s)),
        }
    }
}

/// Knobs for report generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Ordering of years and months.
    pub sort_order: SortOrder,
    /// Minimum ledger size for parallel partitioning. Zero disables it.
    pub parallel_threshold: usize,
    /// Decimal places kept in averages.
    pub average_scale: u32,
    /// Bucket for transactions without a category.
    pub uncategorized_label: String,
    /// Bucket for transactions without a spending plan.
    pub unplanned_label: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

impl From<&ReportConfig> for ReportOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            sort_order: config.sort_order,
            parallel_threshold: config.parallel_threshold,
            average_scale: config.average_scale,
            uncategorized_label: config.uncategorized_label.clone(),
            unplanned_label: config.unplanned_label.clone(),
        }
    }
}

impl ReportOptions {
    /// Returns true if a ledger of `len` transactions should be partitioned in parallel.
    #[must_use]
    pub const fn use_parallel(&self, len: usize) -> bool {
        self.parallel_threshold > 0 && len >= self.parallel_threshold
    }
}

/// One (year, month, key) leaf of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Grouping key (`income`, a category label, or a plan ID).
    pub key: String,
    /// Sum of the contributing transaction amounts.
    pub total: Decimal,
    /// Contributing transactions, in ledger order.
    pub transaction_ids: Vec<TransactionId>,
    /// Budget comparison, for plan reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanComparison>,
}

/// A month within a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDetail {
    /// Month of the year (1-12).
    pub month: u32,
    /// Sum of the group totals.
    pub total: Decimal,
    /// Income minus outcome, for type reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net: Option<Decimal>,
    /// Groups sorted by key.
    pub groups: Vec<GroupSummary>,
}

impl MonthDetail {
    /// Looks up a group by key.
    #[must_use]
    pub fn group(&self, key: &str) -> Option<&GroupSummary> {
        self.groups.iter().find(|g| g.key == key)
    }
}

/// A calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearDetail {
    /// Calendar year.
    pub year: i32,
    /// Sum of the month totals.
    pub total: Decimal,
    /// Months with activity.
    pub months: Vec<MonthDetail>,
}

/// A grouped ledger report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Grouping dimension.
    pub kind: ReportKind,
    /// Per-key average over the months in which the key has activity.
    pub averages: BTreeMap<String, Decimal>,
    /// Per-plan money saved (budget - spent) summed over active months.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<BTreeMap<String, Decimal>>,
    /// Years with activity.
    pub details: Vec<YearDetail>,
}

impl Report {
    /// Returns true if the report holds no activity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// Looks up a single month.
    #[must_use]
    pub fn month(&self, year: i32, month: u32) -> Option<&MonthDetail> {
        self.details
            .iter()
            .find(|y| y.year == year)?
            .months
            .iter()
            .find(|m| m.month == month)
    }

    /// Iterates over every leaf in output order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupSummary> {
        self.details
            .iter()
            .flat_map(|y| y.months.iter())
            .flat_map(|m| m.groups.iter())
    }
}
