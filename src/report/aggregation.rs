//! Pure aggregation functions over already-fetched records.
//!
//! Everything in this module is side-effect free: the same input always
//! produces the same summary, and empty input is a valid zero-valued result,
//! never an error.

use std::collections::HashMap;

use serde::Serialize;

use crate::{inventory::InventoryItem, transaction::Transaction, transaction::tax::TaxTotals};

/// Sum the amounts of `transactions`. Empty input yields 0.
pub(crate) fn sum_amounts(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|transaction| transaction.amount).sum()
}

/// Group `transactions` by category, summing the amount per group.
///
/// The iteration order of the result is unspecified; callers that display it
/// should sort the keys themselves.
pub(crate) fn summarize_by_category(transactions: &[Transaction]) -> HashMap<String, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        *totals.entry(transaction.tag.clone()).or_insert(0.0) += transaction.amount;
    }

    totals
}

/// One inventory item priced out at its quantity on hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationLine {
    pub name: String,
    pub sku_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_value: f64,
}

/// The priced-out inventory and its grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValuation {
    pub line_items: Vec<ValuationLine>,
    pub total: f64,
}

/// Price out each item at `quantity * unit_price` and total the result.
pub(crate) fn inventory_valuation(items: &[InventoryItem]) -> InventoryValuation {
    let line_items: Vec<ValuationLine> = items
        .iter()
        .map(|item| ValuationLine {
            name: item.name.clone(),
            sku_id: item.sku_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_value: item.quantity as f64 * item.unit_price,
        })
        .collect();

    let total = line_items.iter().map(|line| line.total_value).sum();

    InventoryValuation { line_items, total }
}

/// Total the sales tax collected on `incomes` and paid on `expenses`.
///
/// Transactions without tax tracking contribute 0.
pub(crate) fn tax_totals(incomes: &[Transaction], expenses: &[Transaction]) -> TaxTotals {
    let sum_tax = |transactions: &[Transaction]| {
        transactions
            .iter()
            .filter_map(|transaction| transaction.tax_amount)
            .sum()
    };

    TaxTotals {
        collected: sum_tax(incomes),
        paid: sum_tax(expenses),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{inventory::InventoryItem, transaction::Transaction};

    use super::{inventory_valuation, sum_amounts, summarize_by_category, tax_totals};

    fn create_test_transaction(amount: f64, tag: &str) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            amount,
            date: date!(2025 - 06 - 14),
            description: String::new(),
            tag: tag.to_owned(),
            tax_rate: None,
            tax_amount: None,
        }
    }

    fn create_test_item(quantity: i64, unit_price: f64) -> InventoryItem {
        InventoryItem {
            id: 0,
            user_id: 1,
            sku_id: 1001,
            name: "Widget".to_owned(),
            description: String::new(),
            quantity,
            unit_price,
            category: "Parts".to_owned(),
        }
    }

    #[test]
    fn sum_amounts_handles_empty_input() {
        assert_eq!(sum_amounts(&[]), 0.0);
    }

    #[test]
    fn sum_amounts_totals_all_records() {
        let transactions = vec![
            create_test_transaction(150.5, "Sales"),
            create_test_transaction(300.75, "Consulting"),
        ];

        assert_eq!(sum_amounts(&transactions), 451.25);
    }

    #[test]
    fn summarize_by_category_groups_and_sums() {
        let transactions = vec![
            create_test_transaction(100.0, "Sales"),
            create_test_transaction(50.0, "Consulting"),
            create_test_transaction(25.0, "Sales"),
        ];

        let summary = summarize_by_category(&transactions);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary["Sales"], 125.0);
        assert_eq!(summary["Consulting"], 50.0);
    }

    #[test]
    fn summarize_by_category_handles_empty_input() {
        let summary = summarize_by_category(&[]);

        assert!(summary.is_empty());
    }

    #[test]
    fn summarize_by_category_is_idempotent() {
        let transactions = vec![
            create_test_transaction(100.0, "Sales"),
            create_test_transaction(50.0, "Consulting"),
        ];

        let first = summarize_by_category(&transactions);
        let second = summarize_by_category(&transactions);

        assert_eq!(first, second);
    }

    #[test]
    fn category_summary_totals_match_overall_sum() {
        let transactions = vec![
            create_test_transaction(100.0, "Sales"),
            create_test_transaction(50.0, "Consulting"),
            create_test_transaction(25.25, "Sales"),
        ];

        let summary = summarize_by_category(&transactions);
        let summary_total: f64 = summary.values().sum();

        assert!((summary_total - sum_amounts(&transactions)).abs() < 1e-9);
    }

    #[test]
    fn inventory_valuation_prices_out_each_item() {
        let items = vec![create_test_item(5, 30.0)];

        let valuation = inventory_valuation(&items);

        assert_eq!(valuation.line_items.len(), 1);
        assert_eq!(valuation.line_items[0].total_value, 150.0);
        assert_eq!(valuation.total, 150.0);
    }

    #[test]
    fn inventory_valuation_totals_across_items() {
        let items = vec![
            create_test_item(5, 30.0),
            create_test_item(2, 9.5),
            create_test_item(0, 99.0),
        ];

        let valuation = inventory_valuation(&items);

        assert_eq!(valuation.total, 150.0 + 19.0);
    }

    #[test]
    fn inventory_valuation_handles_empty_input() {
        let valuation = inventory_valuation(&[]);

        assert!(valuation.line_items.is_empty());
        assert_eq!(valuation.total, 0.0);
    }

    #[test]
    fn tax_totals_default_untracked_transactions_to_zero() {
        let mut taxed = create_test_transaction(100.0, "Sales");
        taxed.tax_rate = Some(13.0);
        taxed.tax_amount = Some(13.0);
        let untaxed = create_test_transaction(50.0, "Sales");

        let totals = tax_totals(&[taxed, untaxed], &[]);

        assert_eq!(totals.collected, 13.0);
        assert_eq!(totals.paid, 0.0);
    }
}
