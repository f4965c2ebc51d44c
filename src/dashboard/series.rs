//! Builds the aligned income/expense time series for the dashboard chart.

use std::collections::HashMap;

use time::Date;

use crate::transaction::Transaction;

use super::window::{Bucket, Window};

/// One chart point: a bucket label with the income and expense totals for
/// that bucket.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SeriesPoint {
    pub label: String,
    pub income_total: f64,
    pub expense_total: f64,
}

/// The first day of every bucket in the window, oldest first.
///
/// The series has no gaps: every bucket between the window start and today
/// appears, even when nothing falls in it.
pub(crate) fn bucket_starts(window: Window, today: Date) -> Vec<Date> {
    let bucket = window.bucket();

    let mut starts = Vec::new();
    let mut current = bucket.truncate(window.start_date(today));
    while current <= today {
        starts.push(current);
        current = bucket.next(current);
    }

    starts
}

/// Build the chart series for `window`, bucketing the two transaction lists
/// independently.
///
/// The output is chronological, oldest bucket first, and is recomputed from
/// scratch on every call.
pub(crate) fn build_series(
    incomes: &[Transaction],
    expenses: &[Transaction],
    window: Window,
    today: Date,
) -> Vec<SeriesPoint> {
    let bucket = window.bucket();
    let starts = bucket_starts(window, today);

    let Some(window_start) = starts.first().copied() else {
        return Vec::new();
    };

    let income_totals = totals_by_bucket(incomes, bucket, window_start, today);
    let expense_totals = totals_by_bucket(expenses, bucket, window_start, today);

    starts
        .into_iter()
        .map(|start| SeriesPoint {
            label: bucket.label(start),
            income_total: income_totals.get(&start).copied().unwrap_or(0.0),
            expense_total: expense_totals.get(&start).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Sum transaction amounts per bucket, keyed by the bucket's first day.
///
/// Transactions outside `start..=end` are ignored.
fn totals_by_bucket(
    transactions: &[Transaction],
    bucket: Bucket,
    start: Date,
    end: Date,
) -> HashMap<Date, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        if transaction.date < start || transaction.date > end {
            continue;
        }

        *totals.entry(bucket.truncate(transaction.date)).or_insert(0.0) += transaction.amount;
    }

    totals
}
