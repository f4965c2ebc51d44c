//! Composes aggregation results into named report shapes.
//!
//! Reports are ephemeral: every request re-reads the records and recomputes
//! the report from scratch. Nothing here is cached.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, UserId,
    inventory::{InventoryItem, get_inventory_by_user},
    transaction::{SortOrder, Transaction, TransactionFilter, TransactionKind, get_transactions},
};

use super::aggregation::{
    InventoryValuation, ValuationLine, inventory_valuation, sum_amounts, summarize_by_category,
};

/// The report shapes the user can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    /// Whole-population income vs expenses with the net result.
    IncomeStatement,
    /// Income transactions with totals and a category breakdown.
    IncomeSummary,
    /// Expense transactions with totals and a category breakdown.
    ExpenseSummary,
    /// A snapshot valuation of the inventory on hand.
    InventorySummary,
}

impl ReportType {
    pub(crate) fn as_query_value(self) -> &'static str {
        match self {
            Self::IncomeStatement => "income-statement",
            Self::IncomeSummary => "income-summary",
            Self::ExpenseSummary => "expense-summary",
            Self::InventorySummary => "inventory-summary",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::IncomeStatement => "Income Statement",
            Self::IncomeSummary => "Income Summary",
            Self::ExpenseSummary => "Expense Summary",
            Self::InventorySummary => "Inventory Summary",
        }
    }
}

/// The sort orders the user can request.
///
/// Date and amount keys apply to transaction summaries; name, SKU, quantity
/// and value keys apply to the inventory summary. A key that does not apply
/// to the requested report falls back to that report's default order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
    Category,
    Name,
    Sku,
    Quantity,
    Value,
}

impl SortBy {
    pub(crate) fn as_query_value(self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::AmountDesc => "amount-desc",
            Self::AmountAsc => "amount-asc",
            Self::Category => "category",
            Self::Name => "name",
            Self::Sku => "sku",
            Self::Quantity => "quantity",
            Self::Value => "value",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::DateDesc => "Date (newest first)",
            Self::DateAsc => "Date (oldest first)",
            Self::AmountDesc => "Amount (highest first)",
            Self::AmountAsc => "Amount (lowest first)",
            Self::Category => "Category",
            Self::Name => "Name",
            Self::Sku => "SKU",
            Self::Quantity => "Quantity",
            Self::Value => "Value",
        }
    }

    /// Every sort key, in the order shown on the reports page.
    pub(crate) fn all() -> [SortBy; 9] {
        [
            Self::DateDesc,
            Self::DateAsc,
            Self::AmountDesc,
            Self::AmountAsc,
            Self::Category,
            Self::Name,
            Self::Sku,
            Self::Quantity,
            Self::Value,
        ]
    }
}

/// An inclusive calendar date range.
///
/// The whole end day is included: a record dated on `end` is inside the
/// range, one dated the following day is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDateRange {
    pub start: Date,
    pub end: Date,
}

/// A fully parsed report request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub report_type: ReportType,
    /// Requested date filter. `None` means all time. Ignored by the
    /// inventory summary, which is a snapshot rather than a time series.
    pub date_range: Option<ReportDateRange>,
    /// Requested category filter. `None` means all categories. Ignored by
    /// the income statement, which always covers the whole population.
    pub category: Option<String>,
    pub sort_by: SortBy,
}

/// Whole-population income vs expenses.
///
/// The date range reflects the dates actually present in the filtered data,
/// not the requested filter; with no records at all it collapses to today.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    pub report_type: ReportType,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    pub date_range: ReportDateRange,
}

/// A filtered, sorted list of one transaction kind with totals and a
/// category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub report_type: ReportType,
    pub transactions: Vec<Transaction>,
    pub total: f64,
    pub category_summary: HashMap<String, f64>,
    pub date_range: ReportDateRange,
}

/// A snapshot valuation of the inventory on hand. No date range: inventory
/// is not a time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub report_type: ReportType,
    pub inventory: Vec<ValuationLine>,
    pub total: f64,
}

/// The output envelope of the report builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    IncomeStatement(IncomeStatement),
    TransactionSummary(TransactionSummary),
    InventorySummary(InventorySummary),
}

/// Fetch the records a report needs and build it.
///
/// Every call is a fresh read-aggregate cycle. A fetch failure propagates,
/// no partial report is produced.
///
/// # Errors
/// Returns [Error::SqlError] if a record fetch fails.
pub fn generate_report(
    request: &ReportRequest,
    user_id: UserId,
    today: Date,
    connection: &Connection,
) -> Result<Report, Error> {
    match request.report_type {
        ReportType::IncomeStatement => {
            // The statement always covers the whole population, so the
            // category filter is deliberately not applied.
            let filter = TransactionFilter {
                date_range: to_query_range(request.date_range),
                category: None,
            };
            let incomes = get_transactions(
                TransactionKind::Income,
                user_id,
                &filter,
                SortOrder::Ascending,
                connection,
            )?;
            let expenses = get_transactions(
                TransactionKind::Expense,
                user_id,
                &filter,
                SortOrder::Ascending,
                connection,
            )?;

            Ok(Report::IncomeStatement(build_income_statement(
                &incomes, &expenses, today,
            )))
        }
        ReportType::IncomeSummary | ReportType::ExpenseSummary => {
            let kind = if request.report_type == ReportType::IncomeSummary {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let filter = TransactionFilter {
                date_range: to_query_range(request.date_range),
                category: request.category.clone(),
            };
            let transactions =
                get_transactions(kind, user_id, &filter, SortOrder::Ascending, connection)?;

            Ok(Report::TransactionSummary(build_transaction_summary(
                request.report_type,
                transactions,
                request.sort_by,
                today,
            )))
        }
        ReportType::InventorySummary => {
            let mut items = get_inventory_by_user(user_id, connection)?;
            if let Some(category) = &request.category {
                items.retain(|item| item.category == *category);
            }

            Ok(Report::InventorySummary(build_inventory_summary(
                &items,
                request.sort_by,
            )))
        }
    }
}

fn to_query_range(range: Option<ReportDateRange>) -> Option<std::ops::RangeInclusive<Date>> {
    range.map(|range| range.start..=range.end)
}

/// Build an income statement from already-filtered records.
pub(crate) fn build_income_statement(
    incomes: &[Transaction],
    expenses: &[Transaction],
    today: Date,
) -> IncomeStatement {
    let total_income = sum_amounts(incomes);
    let total_expenses = sum_amounts(expenses);

    IncomeStatement {
        report_type: ReportType::IncomeStatement,
        total_income,
        total_expenses,
        net_income: total_income - total_expenses,
        date_range: actual_date_range(incomes.iter().chain(expenses.iter()), today),
    }
}

/// Build a transaction summary from already-filtered records.
pub(crate) fn build_transaction_summary(
    report_type: ReportType,
    mut transactions: Vec<Transaction>,
    sort_by: SortBy,
    today: Date,
) -> TransactionSummary {
    sort_transactions(&mut transactions, sort_by);

    let total = sum_amounts(&transactions);
    let category_summary = summarize_by_category(&transactions);
    let date_range = actual_date_range(transactions.iter(), today);

    TransactionSummary {
        report_type,
        transactions,
        total,
        category_summary,
        date_range,
    }
}

/// Build an inventory summary from already-filtered items.
pub(crate) fn build_inventory_summary(
    items: &[InventoryItem],
    sort_by: SortBy,
) -> InventorySummary {
    let InventoryValuation {
        mut line_items,
        total,
    } = inventory_valuation(items);

    sort_valuation_lines(&mut line_items, sort_by);

    InventorySummary {
        report_type: ReportType::InventorySummary,
        inventory: line_items,
        total,
    }
}

/// The min/max dates actually present in `transactions`, collapsing to
/// `today` when there are none.
fn actual_date_range<'a>(
    transactions: impl Iterator<Item = &'a Transaction>,
    today: Date,
) -> ReportDateRange {
    let mut bounds: Option<(Date, Date)> = None;

    for transaction in transactions {
        bounds = Some(match bounds {
            None => (transaction.date, transaction.date),
            Some((start, end)) => (start.min(transaction.date), end.max(transaction.date)),
        });
    }

    match bounds {
        Some((start, end)) => ReportDateRange { start, end },
        None => ReportDateRange {
            start: today,
            end: today,
        },
    }
}

/// Sort transactions by the requested key.
///
/// The sort is stable: records with equal keys keep the order they were
/// fetched in (date, then ID).
fn sort_transactions(transactions: &mut [Transaction], sort_by: SortBy) {
    match sort_by {
        SortBy::DateAsc => transactions.sort_by(|a, b| a.date.cmp(&b.date)),
        SortBy::AmountDesc => transactions.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
        SortBy::AmountAsc => transactions.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
        SortBy::Category => transactions.sort_by(|a, b| a.tag.cmp(&b.tag)),
        // Inventory-only keys fall back to the default ordering.
        SortBy::DateDesc | SortBy::Name | SortBy::Sku | SortBy::Quantity | SortBy::Value => {
            transactions.sort_by(|a, b| b.date.cmp(&a.date))
        }
    }
}

/// Sort valuation lines by the requested key.
///
/// Quantity and value sort largest-first; name and SKU sort ascending.
fn sort_valuation_lines(lines: &mut [ValuationLine], sort_by: SortBy) {
    match sort_by {
        SortBy::Sku => lines.sort_by_key(|line| line.sku_id),
        SortBy::Quantity => lines.sort_by(|a, b| b.quantity.cmp(&a.quantity)),
        SortBy::Value => lines.sort_by(|a, b| b.total_value.total_cmp(&a.total_value)),
        // Transaction-only keys fall back to the default ordering.
        _ => lines.sort_by(|a, b| a.name.cmp(&b.name)),
    }
}
