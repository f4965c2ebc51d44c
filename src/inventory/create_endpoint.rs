//! Page and endpoint for adding new inventory items.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::html;

use crate::{
    Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    tag::{TagKind, get_tags_by_kind},
};

use super::{
    InventoryState,
    core::create_inventory_item,
    form::{FormAction, ItemFormData, item_form_view},
};

/// Render the page for adding a new inventory item.
pub async fn get_new_inventory_page(
    State(state): State<InventoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let tags = get_tags_by_kind(state.user_id, TagKind::Inventory, &connection)?;

    let nav_bar = NavBar::new(endpoints::INVENTORY_VIEW).into_html();
    let form = item_form_view(FormAction::Create, None, &tags);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Add Inventory Item" }
            (form)
        }
    };

    Ok(base("Add Inventory Item", &[], &content).into_response())
}

/// Handle inventory item creation form submission.
pub async fn create_inventory_endpoint(
    State(state): State<InventoryState>,
    Form(form): Form<ItemFormData>,
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

    match create_inventory_item(state.user_id, data, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::INVENTORY_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create inventory item: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod new_inventory_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        inventory::InventoryState,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::get_new_inventory_page;

    fn get_test_state() -> InventoryState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        InventoryState {
            db_connection: Arc::new(Mutex::new(connection)),
            user_id: 1,
        }
    }

    #[tokio::test]
    async fn render_page() {
        let response = get_new_inventory_page(State(get_test_state())).await.unwrap();

        assert_status_ok(&response);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::INVENTORY_API, "hx-post");
        assert_form_input(&form, "sku_id", "number");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "quantity", "number");
        assert_form_input(&form, "unit_price", "number");
        assert_form_input(&form, "category", "text");
        assert_form_submit_button(&form);
    }
}

#[cfg(test)]
mod create_inventory_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        inventory::{InventoryState, form::ItemFormData, get_inventory_item},
        test_utils::assert_hx_redirect,
    };

    use super::create_inventory_endpoint;

    fn get_test_state() -> InventoryState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        InventoryState {
            db_connection: Arc::new(Mutex::new(connection)),
            user_id: 1,
        }
    }

    fn form(sku_id: &str) -> ItemFormData {
        ItemFormData {
            sku_id: sku_id.to_owned(),
            name: "Widget".to_owned(),
            description: String::new(),
            quantity: "5".to_owned(),
            unit_price: "30.00".to_owned(),
            category: "Parts".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_item() {
        let state = get_test_state();

        let response = create_inventory_endpoint(State(state.clone()), Form(form("1001"))).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::INVENTORY_VIEW);

        let created = get_inventory_item(1, 1, &state.db_connection.lock().unwrap())
            .expect("Item was not created");
        assert_eq!(created.sku_id, 1001);
    }

    #[tokio::test]
    async fn duplicate_sku_is_rejected() {
        let state = get_test_state();
        create_inventory_endpoint(State(state.clone()), Form(form("1001"))).await;

        let response = create_inventory_endpoint(State(state), Form(form("1001"))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
