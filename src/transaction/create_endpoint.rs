//! Pages and endpoints for recording new income and expense transactions.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::html;

use crate::{
    Error,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    tag::get_tags_by_kind,
};

use super::{
    TransactionState,
    core::{TransactionKind, create_transaction},
    form::{FormAction, TransactionFormData, transaction_form_view},
};

/// Render the page for recording a new income transaction.
pub async fn get_new_income_page(State(state): State<TransactionState>) -> Result<Response, Error> {
    get_new_transaction_page(TransactionKind::Income, state).await
}

/// Render the page for recording a new expense transaction.
pub async fn get_new_expense_page(
    State(state): State<TransactionState>,
) -> Result<Response, Error> {
    get_new_transaction_page(TransactionKind::Expense, state).await
}

/// Handle income creation form submission.
pub async fn create_income_endpoint(
    State(state): State<TransactionState>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    create_transaction_endpoint(TransactionKind::Income, state, form).await
}

/// Handle expense creation form submission.
pub async fn create_expense_endpoint(
    State(state): State<TransactionState>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    create_transaction_endpoint(TransactionKind::Expense, state, form).await
}

async fn get_new_transaction_page(
    kind: TransactionKind,
    state: TransactionState,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let tags = get_tags_by_kind(state.user_id, kind.tag_kind(), &connection)?;

    let nav_bar = NavBar::new(kind.list_endpoint()).into_html();
    let form = transaction_form_view(kind, FormAction::Create, None, &tags);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Record " (kind.label()) }
            (form)
        }
    };

    Ok(base(&format!("Record {}", kind.label()), &[], &content).into_response())
}

async fn create_transaction_endpoint(
    kind: TransactionKind,
    state: TransactionState,
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

    match create_transaction(kind, state.user_id, data, &connection) {
        Ok(_) => (
            HxRedirect(kind.list_endpoint().to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create {}: {error}", kind.label().to_lowercase());

            error.into_alert_response()
        }
    }
}


#[cfg(test)]
mod create_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::assert_hx_redirect,
        transaction::{
            TransactionKind, TransactionState, form::TransactionFormData, get_transaction,
        },
    };

    use super::{create_expense_endpoint, create_income_endpoint};

    fn get_test_state() -> TransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
            user_id: 1,
        }
    }

    fn form(date: &str, amount: &str) -> TransactionFormData {
        TransactionFormData {
            date: date.to_owned(),
            amount: amount.to_owned(),
            description: "test".to_owned(),
            tag: "Sales".to_owned(),
            tax_rate: String::new(),
        }
    }

    #[tokio::test]
    async fn can_create_income() {
        let state = get_test_state();

        let response =
            create_income_endpoint(State(state.clone()), Form(form("2025-06-14", "19.99"))).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::INCOME_VIEW);

        let created = get_transaction(
            TransactionKind::Income,
            1,
            1,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Transaction was not created");
        assert_eq!(created.amount, 19.99);
    }

    #[tokio::test]
    async fn create_rejects_unparseable_date() {
        let state = get_test_state();

        let response =
            create_expense_endpoint(State(state), Form(form("not a date", "19.99"))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_rejects_negative_amount() {
        let state = get_test_state();

        let response =
            create_expense_endpoint(State(state), Form(form("2025-06-14", "-19.99"))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
