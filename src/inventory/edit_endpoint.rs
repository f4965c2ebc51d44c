//! Page and endpoint for editing existing inventory items.
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
    database_id::InventoryItemId,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    tag::{TagKind, get_tags_by_kind},
};

use super::{
    InventoryState,
    core::{get_inventory_item, update_inventory_item},
    form::{FormAction, ItemFormData, item_form_view},
};

/// Render the page for editing an inventory item.
pub async fn get_edit_inventory_page(
    State(state): State<InventoryState>,
    Path(item_id): Path<InventoryItemId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let item = get_inventory_item(state.user_id, item_id, &connection)?;
    let tags = get_tags_by_kind(state.user_id, TagKind::Inventory, &connection)?;

    let nav_bar = NavBar::new(endpoints::INVENTORY_VIEW).into_html();
    let form = item_form_view(FormAction::Update(item_id), Some(&item), &tags);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Edit Inventory Item" }
            (form)
        }
    };

    Ok(base("Edit Inventory Item", &[], &content).into_response())
}

/// Handle inventory item edit form submission.
pub async fn update_inventory_endpoint(
    State(state): State<InventoryState>,
    Path(item_id): Path<InventoryItemId>,
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

    match update_inventory_item(state.user_id, item_id, data, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::INVENTORY_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update inventory item: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod edit_inventory_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        inventory::{
            InventoryItemData, InventoryState, create_inventory_item, form::ItemFormData,
            get_inventory_item,
        },
        test_utils::{
            assert_form_input_with_value, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::{get_edit_inventory_page, update_inventory_endpoint};

    fn get_test_state() -> InventoryState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        InventoryState {
            db_connection: Arc::new(Mutex::new(connection)),
            user_id: 1,
        }
    }

    fn seed_item(state: &InventoryState) {
        let connection = state.db_connection.lock().unwrap();
        create_inventory_item(
            1,
            InventoryItemData {
                sku_id: 1001,
                name: "Widget".to_owned(),
                description: String::new(),
                quantity: 5,
                unit_price: 30.0,
                category: "Parts".to_owned(),
            },
            &connection,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn edit_page_prefills_form() {
        let state = get_test_state();
        seed_item(&state);

        let response = get_edit_inventory_page(State(state), Path(1)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "sku_id", "number", "1001");
        assert_form_input_with_value(&form, "quantity", "number", "5");
    }

    #[tokio::test]
    async fn edit_page_for_missing_item_returns_not_found() {
        let state = get_test_state();

        let result = get_edit_inventory_page(State(state), Path(42)).await;

        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn update_replaces_item() {
        let state = get_test_state();
        seed_item(&state);

        let form = ItemFormData {
            sku_id: "2002".to_owned(),
            name: "Gadget".to_owned(),
            description: "improved".to_owned(),
            quantity: "8".to_owned(),
            unit_price: "45.00".to_owned(),
            category: "Gadgets".to_owned(),
        };
        let response = update_inventory_endpoint(State(state.clone()), Path(1), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let updated = get_inventory_item(1, 1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.sku_id, 2002);
        assert_eq!(updated.name, "Gadget");
    }

    #[tokio::test]
    async fn update_missing_item_returns_not_found() {
        let state = get_test_state();

        let form = ItemFormData {
            sku_id: "2002".to_owned(),
            name: "Gadget".to_owned(),
            description: String::new(),
            quantity: "8".to_owned(),
            unit_price: "45.00".to_owned(),
            category: "Gadgets".to_owned(),
        };
        let response = update_inventory_endpoint(State(state), Path(42), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
