//! Income and expense records: models, database operations, list pages and
//! CRUD endpoints.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, UserId};

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_page;
mod query;
pub(crate) mod tax;

pub(crate) use self::core::{Transaction, TransactionData, TransactionKind};
pub use self::core::{
    create_transaction, create_transaction_tables, delete_transaction, get_transaction,
    update_transaction,
};
pub use create_endpoint::{
    create_expense_endpoint, create_income_endpoint, get_new_expense_page, get_new_income_page,
};
pub use delete_endpoint::{delete_expense_endpoint, delete_income_endpoint};
pub use edit_endpoint::{
    get_edit_expense_page, get_edit_income_page, update_expense_endpoint, update_income_endpoint,
};
pub use list_page::{get_expenses_page, get_income_page};
pub(crate) use query::{SortOrder, TransactionFilter, get_transactions};
pub use tax::create_sales_tax_table;

/// The state shared by the transaction pages and endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub user_id: UserId,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            user_id: state.user_id,
        }
    }
}
