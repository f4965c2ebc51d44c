//! Renders reports as CSV for download.
//!
//! Each report type has its own column set; the income statement exports as
//! metric/amount rows.

use crate::Error;

use super::builder::{IncomeStatement, InventorySummary, Report, TransactionSummary};

/// Render `report` as a CSV document.
///
/// # Errors
/// Returns [Error::CsvError] if the CSV writer fails.
pub(crate) fn report_to_csv(report: &Report) -> Result<String, Error> {
    match report {
        Report::IncomeStatement(statement) => income_statement_csv(statement),
        Report::TransactionSummary(summary) => transaction_summary_csv(summary),
        Report::InventorySummary(summary) => inventory_summary_csv(summary),
    }
}

fn income_statement_csv(statement: &IncomeStatement) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(["Metric", "Amount"]).map_err(to_csv_error)?;
    writer
        .write_record(["Total Income", &format!("{:.2}", statement.total_income)])
        .map_err(to_csv_error)?;
    writer
        .write_record(["Total Expenses", &format!("{:.2}", statement.total_expenses)])
        .map_err(to_csv_error)?;
    writer
        .write_record(["Net Income", &format!("{:.2}", statement.net_income)])
        .map_err(to_csv_error)?;

    finish(writer)
}

fn transaction_summary_csv(summary: &TransactionSummary) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Date", "Category", "Description", "Amount", "Tax"])
        .map_err(to_csv_error)?;

    for transaction in &summary.transactions {
        writer
            .write_record([
                transaction.date.to_string(),
                transaction.tag.clone(),
                transaction.description.clone(),
                format!("{:.2}", transaction.amount),
                transaction
                    .tax_amount
                    .map(|tax_amount| format!("{tax_amount:.2}"))
                    .unwrap_or_default(),
            ])
            .map_err(to_csv_error)?;
    }

    finish(writer)
}

fn inventory_summary_csv(summary: &InventorySummary) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Item Name", "SKU", "Quantity", "Unit Cost", "Total Value"])
        .map_err(to_csv_error)?;

    for line in &summary.inventory {
        writer
            .write_record([
                line.name.clone(),
                line.sku_id.to_string(),
                line.quantity.to_string(),
                format!("{:.2}", line.unit_price),
                format!("{:.2}", line.total_value),
            ])
            .map_err(to_csv_error)?;
    }

    finish(writer)
}

fn to_csv_error(error: csv::Error) -> Error {
    Error::CsvError(error.to_string())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, Error> {
    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

#[cfg(test)]
mod csv_tests {
    use std::collections::HashMap;

    use time::macros::date;

    use crate::{
        report::{
            aggregation::ValuationLine,
            builder::{
                Report, ReportDateRange, ReportType, SortBy, TransactionSummary,
                build_income_statement, build_inventory_summary,
            },
        },
        transaction::Transaction,
    };

    use super::report_to_csv;

    #[test]
    fn transaction_summary_uses_report_column_set() {
        let summary = TransactionSummary {
            report_type: ReportType::IncomeSummary,
            transactions: vec![Transaction {
                id: 1,
                user_id: 1,
                amount: 19.99,
                date: date!(2025 - 06 - 14),
                description: "card payment".to_owned(),
                tag: "Sales".to_owned(),
                tax_rate: Some(13.0),
                tax_amount: Some(2.6),
            }],
            total: 19.99,
            category_summary: HashMap::from([("Sales".to_owned(), 19.99)]),
            date_range: ReportDateRange {
                start: date!(2025 - 06 - 14),
                end: date!(2025 - 06 - 14),
            },
        };

        let csv = report_to_csv(&Report::TransactionSummary(summary)).unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Date,Category,Description,Amount,Tax"));
        assert_eq!(lines.next(), Some("2025-06-14,Sales,card payment,19.99,2.60"));
    }

    #[test]
    fn inventory_summary_uses_inventory_column_set() {
        let mut summary = build_inventory_summary(&[], SortBy::Name);
        summary.inventory.push(ValuationLine {
            name: "Widget".to_owned(),
            sku_id: 1001,
            quantity: 5,
            unit_price: 30.0,
            total_value: 150.0,
        });

        let csv = report_to_csv(&Report::InventorySummary(summary)).unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Item Name,SKU,Quantity,Unit Cost,Total Value"));
        assert_eq!(lines.next(), Some("Widget,1001,5,30.00,150.00"));
    }

    #[test]
    fn income_statement_exports_metric_rows() {
        let statement = build_income_statement(&[], &[], date!(2025 - 06 - 14));

        let csv = report_to_csv(&Report::IncomeStatement(statement)).unwrap();

        assert!(csv.starts_with("Metric,Amount\n"));
        assert!(csv.contains("Net Income,0.00"));
    }
}
