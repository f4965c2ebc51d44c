//! Endpoints for deleting income and expense transactions.
//!
//! Deletes are hard deletes; the linked sales tax record goes with the
//! transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{Error, database_id::TransactionId};

use super::{
    TransactionState,
    core::{TransactionKind, delete_transaction},
};

/// Delete an income transaction.
pub async fn delete_income_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    delete_transaction_endpoint(TransactionKind::Income, state, transaction_id).await
}

/// Delete an expense transaction.
pub async fn delete_expense_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    delete_transaction_endpoint(TransactionKind::Expense, state, transaction_id).await
}

async fn delete_transaction_endpoint(
    kind: TransactionKind,
    state: TransactionState,
    transaction_id: TransactionId,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(kind, state.user_id, transaction_id, &connection) {
        Ok(()) => (
            HxRedirect(kind.list_endpoint().to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not delete {}: {error}", kind.label().to_lowercase());

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            TransactionData, TransactionKind, TransactionState, create_transaction,
            get_transaction,
        },
    };

    use super::delete_income_endpoint;

    fn get_test_state() -> TransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
            user_id: 1,
        }
    }

    #[tokio::test]
    async fn can_delete_income() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                TransactionKind::Income,
                1,
                TransactionData {
                    amount: 10.0,
                    date: date!(2025 - 06 - 14),
                    description: String::new(),
                    tag: "Sales".to_owned(),
                    tax_rate: None,
                },
                &connection,
            )
            .unwrap();
        }

        let response = delete_income_endpoint(State(state.clone()), Path(1)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            get_transaction(
                TransactionKind::Income,
                1,
                1,
                &state.db_connection.lock().unwrap()
            ),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_missing_income_returns_not_found() {
        let state = get_test_state();

        let response = delete_income_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
