//! Year/month partitioning of a ledger.

use std::collections::BTreeMap;

use rayon::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{TransactionId, YearMonth};

use super::error::ReportError;
use crate::ledger::{Transaction, TransactionKind};

/// Running totals and contributors for one (month, key) cell.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct Bucket {
    /// Sum of every contributing amount.
    pub(super) total: Decimal,
    /// Sum of the outcome amounts only.
    pub(super) spent: Decimal,
    pub(super) ids: Vec<TransactionId>,
}

impl Bucket {
    fn add(&mut self, txn: &Transaction) -> Result<(), ReportError> {
        self.total = checked_add(self.total, txn.amount)?;
        if txn.kind == TransactionKind::Outcome {
            self.spent = checked_add(self.spent, txn.amount)?;
        }
        self.ids.push(txn.id);
        Ok(())
    }

    fn absorb(&mut self, later: Self) -> Result<(), ReportError> {
        self.total = checked_add(self.total, later.total)?;
        self.spent = checked_add(self.spent, later.spent)?;
        self.ids.extend(later.ids);
        Ok(())
    }
}

/// Month -> grouping key -> bucket, both levels in ascending order.
pub(super) type Partition = BTreeMap<YearMonth, BTreeMap<String, Bucket>>;

/// Adds two amounts, failing instead of panicking when the sum is not representable.
pub(super) fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal, ReportError> {
    a.checked_add(b).ok_or_else(ReportError::overflow)
}

/// Splits transactions by calendar month and grouping key.
///
/// Contributor lists keep ledger order on both paths.
pub(super) fn partition<F>(
    transactions: &[Transaction],
    key_of: F,
    parallel: bool,
) -> Result<Partition, ReportError>
where
    F: Fn(&Transaction) -> String + Sync,
{
    if parallel {
        transactions
            .par_iter()
            .try_fold(Partition::new, |mut acc, txn| {
                insert(&mut acc, txn, &key_of)?;
                Ok(acc)
            })
            .try_reduce(Partition::new, merge)
    } else {
        let mut acc = Partition::new();
        for txn in transactions {
            insert(&mut acc, txn, &key_of)?;
        }
        Ok(acc)
    }
}

fn insert<F>(acc: &mut Partition, txn: &Transaction, key_of: &F) -> Result<(), ReportError>
where
    F: Fn(&Transaction) -> String,
{
    acc.entry(txn.year_month())
        .or_default()
        .entry(key_of(txn))
        .or_default()
        .add(txn)
}

// `right` always covers later ledger positions than `left`.
fn merge(mut left: Partition, right: Partition) -> Result<Partition, ReportError> {
    for (month, groups) in right {
        let target = left.entry(month).or_default();
        for (key, bucket) in groups {
            target.entry(key).or_default().absorb(bucket)?;
        }
    }
    Ok(left)
}
