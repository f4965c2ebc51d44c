//! The income and expenses list pages.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    endpoints::format_endpoint,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TAG_BADGE_STYLE, base, format_currency,
    },
    navigation::NavBar,
    report::sum_amounts,
};

use super::{
    SortOrder, TransactionFilter, TransactionState,
    core::{Transaction, TransactionKind},
    get_transactions,
};

/// Display the user's income records, most recent first.
pub async fn get_income_page(State(state): State<TransactionState>) -> Result<Response, Error> {
    get_transactions_page(TransactionKind::Income, state).await
}

/// Display the user's expense records, most recent first.
pub async fn get_expenses_page(State(state): State<TransactionState>) -> Result<Response, Error> {
    get_transactions_page(TransactionKind::Expense, state).await
}

async fn get_transactions_page(
    kind: TransactionKind,
    state: TransactionState,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(
        kind,
        state.user_id,
        &TransactionFilter::default(),
        SortOrder::Descending,
        &connection,
    )?;

    Ok(transactions_view(kind, &transactions).into_response())
}

fn transactions_view(kind: TransactionKind, transactions: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(kind.list_endpoint()).into_html();
    let total = sum_amounts(transactions);

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl flex justify-between items-baseline mb-4"
            {
                h1 class="text-2xl font-bold" { (kind.plural_label()) }

                a href=(kind.new_endpoint()) class=(LINK_STYLE)
                {
                    "Record " (kind.label())
                }
            }

            @if transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400"
                {
                    "Nothing recorded yet."
                }
            } @else {
                div class="w-full max-w-4xl relative overflow-x-auto shadow-md sm:rounded-lg"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Tax" }
                                th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(kind, transaction))
                            }
                        }

                        tfoot
                        {
                            tr class="font-semibold text-gray-900 dark:text-white"
                            {
                                th scope="row" class=(TABLE_CELL_STYLE) colspan="3" { "Total" }
                                td class=(TABLE_CELL_STYLE) { (format_currency(total)) }
                                td class=(TABLE_CELL_STYLE) {}
                                td class=(TABLE_CELL_STYLE) {}
                            }
                        }
                    }
                }
            }
        }
    };

    base(kind.plural_label(), &[], &content)
}

fn transaction_row(kind: TransactionKind, transaction: &Transaction) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(TAG_BADGE_STYLE) { (transaction.tag) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                @match transaction.tax_amount {
                    Some(tax_amount) => { (format_currency(tax_amount)) }
                    None => { "—" }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a
                        href=(format_endpoint(kind.edit_endpoint(), transaction.id))
                        class=(LINK_STYLE)
                    {
                        "Edit"
                    }

                    button
                        type="button"
                        hx-delete=(format_endpoint(kind.record_endpoint(), transaction.id))
                        hx-confirm=(format!("Delete this {}?", kind.label().to_lowercase()))
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}
