//! Report generation service.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use tally_shared::types::YearMonth;

use super::error::ReportError;
use super::partition::{Bucket, checked_add, partition};
use super::types::{GroupSummary, MonthDetail, Report, ReportKind, ReportOptions, YearDetail};
use crate::budget::BudgetService;
use crate::ledger::{SpendingPlan, Transaction, TransactionKind};

/// Service for generating ledger reports.
pub struct ReportService;

impl ReportService {
    /// Builds a report with default options.
    ///
    /// `plans` is required for [`ReportKind::ByPlan`] and ignored otherwise.
    pub fn build_report(
        transactions: &[Transaction],
        kind: ReportKind,
        plans: Option<&[SpendingPlan]>,
    ) -> Result<Report, ReportError> {
        Self::build_report_with(transactions, kind, plans, &ReportOptions::default())
    }

    /// Builds a report of the given kind.
    ///
    /// Transactions are partitioned by year and month, then grouped by the
    /// kind's key. Averages divide each key's total by the number of months in
    /// which that key has at least one transaction. An empty ledger yields an
    /// empty report.
    ///
    /// Group totals add every amount in the group, income included. A plan's
    /// spend only counts its outcome transactions, so a refund booked as
    /// income against a plan raises the group total but not the spend.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidArgument` if `kind` is `ByPlan` and no
    /// plans were supplied, or if any total, net or average does not fit in
    /// a decimal.
    pub fn build_report_with(
        transactions: &[Transaction],
        kind: ReportKind,
        plans: Option<&[SpendingPlan]>,
        options: &ReportOptions,
    ) -> Result<Report, ReportError> {
        let plan_index: HashMap<String, &SpendingPlan> = match (kind, plans) {
            (ReportKind::ByPlan, None) => return Err(ReportError::missing_plans()),
            (ReportKind::ByPlan, Some(plans)) => {
                plans.iter().map(|p| (p.id.to_string(), p)).collect()
            }
            _ => HashMap::new(),
        };

        let parallel = options.use_parallel(transactions.len());
        let cells = partition(
            transactions,
            |txn| Self::group_key(kind, txn, options),
            parallel,
        )?;

        let mut sums: BTreeMap<String, (Decimal, u32)> = BTreeMap::new();
        let mut savings: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut unknown_plans: BTreeSet<String> = BTreeSet::new();
        let mut years: BTreeMap<i32, Vec<MonthDetail>> = BTreeMap::new();

        for (period, buckets) in cells {
            let mut groups = Vec::with_capacity(buckets.len());
            for (key, Bucket { total, spent, ids }) in buckets {
                let (sum, months) = sums.entry(key.clone()).or_default();
                *sum = checked_add(*sum, total)?;
                *months += 1;

                let plan = if kind == ReportKind::ByPlan && key != options.unplanned_label {
                    match plan_index.get(&key) {
                        Some(plan) => {
                            let comparison = BudgetService::compare(plan, spent)?;
                            let saved = savings.entry(key.clone()).or_default();
                            *saved = checked_add(*saved, comparison.remaining)?;
                            Some(comparison)
                        }
                        None => {
                            unknown_plans.insert(key.clone());
                            None
                        }
                    }
                } else {
                    None
                };

                groups.push(GroupSummary {
                    key,
                    total,
                    transaction_ids: ids,
                    plan,
                });
            }

            years
                .entry(period.year)
                .or_default()
                .push(Self::month_detail(kind, period, groups)?);
        }

        if !unknown_plans.is_empty() {
            tracing::warn!(
                count = unknown_plans.len(),
                plans = ?unknown_plans,
                "Transactions reference spending plans that were not supplied"
            );
        }

        let mut details = years
            .into_iter()
            .map(|(year, mut months)| {
                options.sort_order.apply(&mut months);
                Ok(YearDetail {
                    year,
                    total: checked_sum(months.iter().map(|m| m.total))?,
                    months,
                })
            })
            .collect::<Result<Vec<YearDetail>, ReportError>>()?;
        options.sort_order.apply(&mut details);

        let averages: BTreeMap<String, Decimal> = sums
            .into_iter()
            .map(|(key, (sum, months))| {
                let average = sum
                    .checked_div(Decimal::from(months))
                    .ok_or_else(ReportError::overflow)?
                    .round_dp(options.average_scale);
                Ok((key, average))
            })
            .collect::<Result<_, ReportError>>()?;

        let report = Report {
            kind,
            averages,
            totals: (kind == ReportKind::ByPlan).then_some(savings),
            details,
        };

        tracing::debug!(
            kind = %kind,
            transactions = transactions.len(),
            years = report.details.len(),
            parallel,
            "Report built"
        );

        Ok(report)
    }

    fn group_key(kind: ReportKind, txn: &Transaction, options: &ReportOptions) -> String {
        match kind {
            ReportKind::ByType => txn.kind.as_str().to_string(),
            ReportKind::ByCategory => txn
                .category_label()
                .unwrap_or(&options.uncategorized_label)
                .to_string(),
            ReportKind::ByPlan => txn
                .plan_id
                .map_or_else(|| options.unplanned_label.clone(), |id| id.to_string()),
        }
    }

    fn month_detail(
        kind: ReportKind,
        period: YearMonth,
        groups: Vec<GroupSummary>,
    ) -> Result<MonthDetail, ReportError> {
        let total = checked_sum(groups.iter().map(|g| g.total))?;

        let net = if kind == ReportKind::ByType {
            let of = |k: TransactionKind| {
                groups
                    .iter()
                    .find(|g| g.key == k.as_str())
                    .map_or(Decimal::ZERO, |g| g.total)
            };
            let net = of(TransactionKind::Income)
                .checked_sub(of(TransactionKind::Outcome))
                .ok_or_else(ReportError::overflow)?;
            Some(net)
        } else {
            None
        };

        Ok(MonthDetail {
            month: period.month,
            total,
            net,
            groups,
        })
    }
}

fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, ReportError> {
    amounts.into_iter().try_fold(Decimal::ZERO, checked_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BudgetStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tally_shared::types::SortOrder;
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between a test and its subscriber.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn december_ledger() -> Vec<Transaction> {
        vec![
            Transaction::income(date(2021, 12, 1), dec!(1000)),
            Transaction::outcome(date(2021, 12, 15), dec!(400)).with_category("food"),
        ]
    }

    #[test]
    fn test_by_type_example() {
        let txns = december_ledger();
        let report = ReportService::build_report(&txns, ReportKind::ByType, None).unwrap();

        let december = report.month(2021, 12).unwrap();
        assert_eq!(december.group("income").unwrap().total, dec!(1000));
        assert_eq!(december.group("outcome").unwrap().total, dec!(400));
        assert_eq!(december.group("income").unwrap().transaction_ids, vec![txns[0].id]);
        assert_eq!(december.net, Some(dec!(600)));
        assert_eq!(december.total, dec!(1400));

        assert_eq!(report.averages["income"], dec!(1000));
        assert_eq!(report.averages["outcome"], dec!(400));
        assert!(report.totals.is_none());
    }

    #[test]
    fn test_by_category_buckets_uncategorized() {
        let txns = december_ledger();
        let report = ReportService::build_report(&txns, ReportKind::ByCategory, None).unwrap();

        let december = report.month(2021, 12).unwrap();
        assert_eq!(december.groups.len(), 2);
        assert_eq!(december.group("food").unwrap().total, dec!(400));
        assert_eq!(december.group("uncategorized").unwrap().total, dec!(1000));
        assert_eq!(december.net, None);
    }

    #[test]
    fn test_custom_uncategorized_label() {
        let options = ReportOptions {
            uncategorized_label: "other".to_string(),
            ..ReportOptions::default()
        };
        let report = ReportService::build_report_with(
            &december_ledger(),
            ReportKind::ByCategory,
            None,
            &options,
        )
        .unwrap();

        assert!(report.month(2021, 12).unwrap().group("other").is_some());
    }

    #[test]
    fn test_empty_input_for_every_kind() {
        let plans: Vec<SpendingPlan> = Vec::new();
        for kind in [ReportKind::ByType, ReportKind::ByCategory, ReportKind::ByPlan] {
            let report = ReportService::build_report(&[], kind, Some(plans.as_slice())).unwrap();
            assert!(report.is_empty());
            assert!(report.details.is_empty());
            assert!(report.averages.is_empty());
            assert_eq!(report.kind, kind);
            if kind == ReportKind::ByPlan {
                assert_eq!(report.totals, Some(BTreeMap::new()));
            } else {
                assert_eq!(report.totals, None);
            }
        }
    }

    #[test]
    fn test_by_plan_without_plans_is_invalid_argument() {
        let err = ReportService::build_report(&december_ledger(), ReportKind::ByPlan, None)
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = ReportService::build_report(&[], ReportKind::ByPlan, None).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_averages_skip_inactive_months() {
        let txns = vec![
            Transaction::outcome(date(2021, 1, 5), dec!(100)).with_category("food"),
            Transaction::outcome(date(2021, 2, 5), dec!(50)).with_category("rent"),
            Transaction::outcome(date(2021, 3, 5), dec!(300)).with_category("food"),
        ];
        let report = ReportService::build_report(&txns, ReportKind::ByCategory, None).unwrap();

        assert_eq!(report.averages["food"], dec!(200));
        assert_eq!(report.averages["rent"], dec!(50));
    }

    #[test]
    fn test_averages_rounded_to_scale() {
        let txns = vec![
            Transaction::outcome(date(2021, 1, 5), dec!(100)),
            Transaction::outcome(date(2021, 2, 5), dec!(100)),
            Transaction::outcome(date(2021, 3, 5), dec!(0)),
        ];
        let report = ReportService::build_report(&txns, ReportKind::ByType, None).unwrap();

        assert_eq!(report.averages["outcome"], dec!(66.67));
    }

    #[test]
    fn test_descending_order_by_default() {
        let txns = vec![
            Transaction::income(date(2020, 3, 1), dec!(1)),
            Transaction::income(date(2021, 1, 1), dec!(1)),
            Transaction::income(date(2021, 11, 1), dec!(1)),
            Transaction::income(date(2020, 12, 1), dec!(1)),
        ];
        let report = ReportService::build_report(&txns, ReportKind::ByType, None).unwrap();

        let years: Vec<i32> = report.details.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![2021, 2020]);
        let months_2021: Vec<u32> = report.details[0].months.iter().map(|m| m.month).collect();
        assert_eq!(months_2021, vec![11, 1]);
        let months_2020: Vec<u32> = report.details[1].months.iter().map(|m| m.month).collect();
        assert_eq!(months_2020, vec![12, 3]);
    }

    #[test]
    fn test_ascending_order_option() {
        let txns = vec![
            Transaction::income(date(2021, 11, 1), dec!(1)),
            Transaction::income(date(2020, 3, 1), dec!(1)),
            Transaction::income(date(2021, 1, 1), dec!(1)),
        ];
        let options = ReportOptions {
            sort_order: SortOrder::Ascending,
            ..ReportOptions::default()
        };
        let report =
            ReportService::build_report_with(&txns, ReportKind::ByType, None, &options).unwrap();

        let years: Vec<i32> = report.details.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![2020, 2021]);
        let months_2021: Vec<u32> = report.details[1].months.iter().map(|m| m.month).collect();
        assert_eq!(months_2021, vec![1, 11]);
    }

    #[test]
    fn test_year_totals() {
        let txns = vec![
            Transaction::outcome(date(2021, 1, 5), dec!(100)),
            Transaction::income(date(2021, 2, 5), dec!(250)),
            Transaction::outcome(date(2022, 2, 5), dec!(10)),
        ];
        let report = ReportService::build_report(&txns, ReportKind::ByType, None).unwrap();

        assert_eq!(report.details[0].year, 2022);
        assert_eq!(report.details[0].total, dec!(10));
        assert_eq!(report.details[1].total, dec!(350));
    }

    #[test]
    fn test_net_savings_per_month() {
        let txns = vec![
            Transaction::income(date(2021, 11, 1), dec!(2000)),
            Transaction::outcome(date(2021, 11, 3), dec!(1500)),
            Transaction::outcome(date(2021, 11, 20), dec!(700)),
            Transaction::outcome(date(2021, 12, 3), dec!(80)),
        ];
        let report = ReportService::build_report(&txns, ReportKind::ByType, None).unwrap();

        assert_eq!(report.month(2021, 11).unwrap().net, Some(dec!(-200)));
        assert_eq!(report.month(2021, 12).unwrap().net, Some(dec!(-80)));
    }

    #[test]
    fn test_by_plan_attaches_budget_comparison() {
        let groceries = SpendingPlan::monthly("groceries", dec!(700));
        let travel = SpendingPlan::monthly("travel", dec!(1000));
        let txns = vec![
            Transaction::outcome(date(2021, 12, 2), dec!(300)).with_plan(groceries.id),
            Transaction::outcome(date(2021, 12, 9), dec!(200)).with_plan(groceries.id),
            Transaction::outcome(date(2021, 12, 10), dec!(1200)).with_plan(travel.id),
            Transaction::outcome(date(2021, 11, 10), dec!(600)).with_plan(groceries.id),
            Transaction::outcome(date(2021, 11, 11), dec!(45)),
        ];
        let plans = vec![groceries.clone(), travel.clone()];

        let report =
            ReportService::build_report(&txns, ReportKind::ByPlan, Some(plans.as_slice())).unwrap();

        let december = report.month(2021, 12).unwrap();
        let groceries_dec = december.group(&groceries.id.to_string()).unwrap();
        assert_eq!(groceries_dec.total, dec!(500));
        let comparison = groceries_dec.plan.as_ref().unwrap();
        assert_eq!(comparison.budget, dec!(700));
        assert_eq!(comparison.remaining, dec!(200));
        assert_eq!(comparison.status, BudgetStatus::UnderBudget);

        let travel_dec = december.group(&travel.id.to_string()).unwrap();
        assert_eq!(
            travel_dec.plan.as_ref().unwrap().status,
            BudgetStatus::OverBudget
        );

        let november = report.month(2021, 11).unwrap();
        let unplanned = november.group("unplanned").unwrap();
        assert_eq!(unplanned.total, dec!(45));
        assert!(unplanned.plan.is_none());

        let totals = report.totals.as_ref().unwrap();
        assert_eq!(totals[&groceries.id.to_string()], dec!(300));
        assert_eq!(totals[&travel.id.to_string()], dec!(-200));
        assert!(!totals.contains_key("unplanned"));

        assert_eq!(report.averages[&groceries.id.to_string()], dec!(550));
        assert_eq!(report.averages["unplanned"], dec!(45));
    }

    #[test]
    fn test_unknown_plan_keeps_bucket_without_comparison() {
        let known = SpendingPlan::monthly("known", dec!(100));
        let stray = SpendingPlan::monthly("stray", dec!(100));
        let txns = vec![Transaction::outcome(date(2021, 5, 1), dec!(30)).with_plan(stray.id)];

        let report =
            ReportService::build_report(&txns, ReportKind::ByPlan, Some(&[known][..])).unwrap();

        let may = report.month(2021, 5).unwrap();
        let group = may.group(&stray.id.to_string()).unwrap();
        assert_eq!(group.total, dec!(30));
        assert!(group.plan.is_none());
        assert!(report.totals.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_plan_logs_a_warning() {
        let known = SpendingPlan::monthly("known", dec!(100));
        let stray = SpendingPlan::monthly("stray", dec!(100));
        let txns = vec![Transaction::outcome(date(2021, 5, 1), dec!(30)).with_plan(stray.id)];

        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            ReportService::build_report(&txns, ReportKind::ByPlan, Some(&[known][..])).unwrap();
        });

        let logs = captured.contents();
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains(&stray.id.to_string()), "{logs}");
    }

    #[test]
    fn test_known_plans_log_no_warning() {
        let plan = SpendingPlan::monthly("groceries", dec!(700));
        let txns = vec![Transaction::outcome(date(2021, 5, 1), dec!(30)).with_plan(plan.id)];

        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            ReportService::build_report(&txns, ReportKind::ByPlan, Some(&[plan][..])).unwrap();
        });

        assert!(!captured.contents().contains("WARN"));
    }

    #[test]
    fn test_plan_spend_ignores_income() {
        let plan = SpendingPlan::monthly("travel", dec!(1000));
        let txns = vec![
            Transaction::outcome(date(2021, 6, 2), dec!(900)).with_plan(plan.id),
            Transaction::income(date(2021, 6, 20), dec!(150)).with_plan(plan.id),
        ];

        let report =
            ReportService::build_report(&txns, ReportKind::ByPlan, Some(&[plan.clone()][..]))
                .unwrap();

        let group = report.month(2021, 6).unwrap().group(&plan.id.to_string()).unwrap();
        assert_eq!(group.total, dec!(1050));
        assert_eq!(group.transaction_ids.len(), 2);
        let comparison = group.plan.as_ref().unwrap();
        assert_eq!(comparison.spent, dec!(900));
        assert_eq!(comparison.remaining, dec!(100));
        assert_eq!(comparison.status, BudgetStatus::UnderBudget);
        assert_eq!(report.totals.unwrap()[&plan.id.to_string()], dec!(100));
    }

    #[test]
    fn test_overflowing_totals_are_invalid_argument() {
        let txns = vec![
            Transaction::outcome(date(2021, 5, 1), Decimal::MAX),
            Transaction::outcome(date(2021, 5, 2), Decimal::MAX),
        ];
        let parallel = ReportOptions {
            parallel_threshold: 1,
            ..ReportOptions::default()
        };

        for options in [ReportOptions::default(), parallel] {
            let err = ReportService::build_report_with(&txns, ReportKind::ByType, None, &options)
                .unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn test_overflowing_totals_across_months_are_invalid_argument() {
        let txns = vec![
            Transaction::outcome(date(2021, 5, 1), Decimal::MAX),
            Transaction::outcome(date(2021, 6, 1), Decimal::MAX),
        ];

        let err = ReportService::build_report(&txns, ReportKind::ByType, None).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_overflowing_net_is_invalid_argument() {
        let txns = vec![
            Transaction::income(date(2021, 5, 1), Decimal::MAX),
            Transaction::outcome(date(2021, 5, 2), Decimal::MIN),
        ];

        let err = ReportService::build_report(&txns, ReportKind::ByType, None).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_overflowing_utilization_is_invalid_argument() {
        let plan = SpendingPlan::monthly("tiny", dec!(0.0001));
        let txns = vec![
            Transaction::outcome(date(2021, 5, 1), dec!(10000000000000000000000000))
                .with_plan(plan.id),
        ];

        let err = ReportService::build_report(&txns, ReportKind::ByPlan, Some(&[plan][..]))
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_plans_ignored_for_other_kinds() {
        let plan = SpendingPlan::monthly("groceries", dec!(700));
        let txns = vec![Transaction::outcome(date(2021, 12, 2), dec!(300)).with_plan(plan.id)];

        let report =
            ReportService::build_report(&txns, ReportKind::ByType, Some(&[plan][..])).unwrap();

        assert!(report.totals.is_none());
        assert!(report.groups().all(|g| g.plan.is_none()));
    }

    #[test]
    fn test_report_serializes_without_empty_optionals() {
        let report =
            ReportService::build_report(&december_ledger(), ReportKind::ByCategory, None).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["kind"], "by_category");
        assert!(json.get("totals").is_none());
        assert!(json["details"][0]["months"][0].get("net").is_none());
    }
}
