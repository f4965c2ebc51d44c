//! Summary cards shown above the dashboard chart.

use maud::{Markup, html};

use crate::{html::format_currency, transaction::tax::TaxTotals};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

/// Renders the income, expense, net and tax-owing cards for the selected
/// window.
pub(super) fn summary_cards_view(
    window_label: &str,
    income_total: f64,
    expense_total: f64,
    tax_totals: TaxTotals,
) -> Markup {
    let net = income_total - expense_total;
    let net_style = if net < 0.0 {
        "text-2xl font-bold text-red-600 dark:text-red-400"
    } else {
        "text-2xl font-bold text-green-600 dark:text-green-400"
    };

    html! {
        section class="w-full mx-auto mb-4"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h2 class="text-xl font-semibold" { "Overview" }
                span class="text-sm text-gray-600 dark:text-gray-400" { (window_label) }
            }

            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                (summary_card("Income", &format_currency(income_total), "text-2xl font-bold"))
                (summary_card("Expenses", &format_currency(expense_total), "text-2xl font-bold"))
                (summary_card("Net", &format_currency(net), net_style))
                (summary_card(
                    "Tax Owing",
                    &format_currency(tax_totals.owing()),
                    "text-2xl font-bold",
                ))
            }
        }
    }
}

fn summary_card(title: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-600 dark:text-gray-400 mb-1" { (title) }
            p class=(value_style) { (value) }
        }
    }
}
