//! crates/tr_algo/src/expense.rs
//! Expense ordering, 1-based sequence numbers and the overall total.
//! Integer arithmetic only; the total is widened so it cannot overflow.

use chrono::NaiveDate;
use tr_core::{calendar::compare_dates, ExpenseEntry};

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ExpenseRow {
    pub seq: usize,
    pub entry: ExpenseEntry,
}

/// Ordered expense rows plus their sum.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ExpenseLedger {
    pub rows: Vec<ExpenseRow>,
    pub total: u128,
}

impl ExpenseLedger {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Per-day sums in ascending date order.
    pub fn subtotals_by_date(&self) -> Vec<(NaiveDate, u128)> {
        let mut out: Vec<(NaiveDate, u128)> = Vec::new();
        // rows are already date-ordered, so equal dates are adjacent
        for r in &self.rows {
            let units = u128::from(r.entry.amount);
            match out.last_mut() {
                Some((d, sum)) if *d == r.entry.date => *sum += units,
                _ => out.push((r.entry.date, units)),
            }
        }
        out
    }
}

/// Sort by date (stable), number from 1, and sum.
pub fn aggregate_expenses(entries: &[ExpenseEntry]) -> ExpenseLedger {
    let mut ordered: Vec<&ExpenseEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| compare_dates(&a.date, &b.date));

    let total = total_amount(entries);
    let rows = ordered
        .into_iter()
        .enumerate()
        .map(|(i, e)| ExpenseRow { seq: i + 1, entry: e.clone() })
        .collect();
    ExpenseLedger { rows, total }
}

#[inline]
pub fn total_amount(entries: &[ExpenseEntry]) -> u128 {
    entries.iter().map(|e| u128::from(e.amount)).sum()
}
