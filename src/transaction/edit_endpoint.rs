//! Pages and endpoints for editing existing income and expense transactions.
//!
//! Updates are full-field replaces, the form always submits every field.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::html;

use crate::{
    Error,
    database_id::TransactionId,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    tag::get_tags_by_kind,
};

use super::{
    TransactionState,
    core::{TransactionKind, get_transaction, update_transaction},
    form::{FormAction, TransactionFormData, transaction_form_view},
};

/// Render the page for editing an income transaction.
pub async fn get_edit_income_page(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    get_edit_transaction_page(TransactionKind::Income, state, transaction_id).await
}

/// Render the page for editing an expense transaction.
pub async fn get_edit_expense_page(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    get_edit_transaction_page(TransactionKind::Expense, state, transaction_id).await
}

/// Handle income edit form submission.
pub async fn update_income_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    update_transaction_endpoint(TransactionKind::Income, state, transaction_id, form).await
}

/// Handle expense edit form submission.
pub async fn update_expense_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    update_transaction_endpoint(TransactionKind::Expense, state, transaction_id, form).await
}

async fn get_edit_transaction_page(
    kind: TransactionKind,
    state: TransactionState,
    transaction_id: TransactionId,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(kind, state.user_id, transaction_id, &connection)?;
    let tags = get_tags_by_kind(state.user_id, kind.tag_kind(), &connection)?;

    let nav_bar = NavBar::new(kind.list_endpoint()).into_html();
    let form = transaction_form_view(
        kind,
        FormAction::Update(transaction_id),
        Some(&transaction),
        &tags,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Edit " (kind.label()) }
            (form)
        }
    };

    Ok(base(&format!("Edit {}", kind.label()), &[], &content).into_response())
}

async fn update_transaction_endpoint(
    kind: TransactionKind,
    state: TransactionState,
    transaction_id: TransactionId,
    form: TransactionFormData,
) -> Response {
    let data = match form.parse() {
        Ok(data) => data,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_transaction(kind, state.user_id, transaction_id, data, &connection) {
        Ok(()) => (
            HxRedirect(kind.list_endpoint().to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update {}: {error}", kind.label().to_lowercase());

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod edit_transaction_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        test_utils::{
            assert_form_input_with_value, assert_valid_html, must_get_form, parse_html_document,
        },
        transaction::{
            TransactionData, TransactionKind, TransactionState, create_transaction,
            form::TransactionFormData, get_transaction,
        },
    };

    use super::{get_edit_income_page, update_income_endpoint};

    fn get_test_state() -> TransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
            user_id: 1,
        }
    }

    fn seed_income(state: &TransactionState) {
        let connection = state.db_connection.lock().unwrap();
        create_transaction(
            TransactionKind::Income,
            1,
            TransactionData {
                amount: 100.0,
                date: date!(2025 - 06 - 14),
                description: "invoice".to_owned(),
                tag: "Sales".to_owned(),
                tax_rate: None,
            },
            &connection,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn edit_page_prefills_form() {
        let state = get_test_state();
        seed_income(&state);

        let response = get_edit_income_page(State(state), Path(1)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "date", "date", "2025-06-14");
        assert_form_input_with_value(&form, "amount", "number", "100.00");
    }

    #[tokio::test]
    async fn edit_page_for_missing_transaction_returns_not_found() {
        let state = get_test_state();

        let result = get_edit_income_page(State(state), Path(42)).await;

        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn update_replaces_record() {
        let state = get_test_state();
        seed_income(&state);

        let form = TransactionFormData {
            date: "2025-07-01".to_owned(),
            amount: "250.00".to_owned(),
            description: "retainer".to_owned(),
            tag: "Consulting".to_owned(),
            tax_rate: String::new(),
        };
        let response = update_income_endpoint(State(state.clone()), Path(1), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let updated = get_transaction(
            TransactionKind::Income,
            1,
            1,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(updated.amount, 250.0);
        assert_eq!(updated.tag, "Consulting");
        assert_eq!(updated.date, date!(2025 - 07 - 01));
    }

    #[tokio::test]
    async fn update_missing_transaction_returns_not_found() {
        let state = get_test_state();

        let form = TransactionFormData {
            date: "2025-07-01".to_owned(),
            amount: "250.00".to_owned(),
            description: String::new(),
            tag: "Consulting".to_owned(),
            tax_rate: String::new(),
        };
        let response = update_income_endpoint(State(state), Path(42), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
