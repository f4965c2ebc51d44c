//! Endpoint for deleting inventory items.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{Error, database_id::InventoryItemId, endpoints};

use super::{InventoryState, core::delete_inventory_item};

/// Delete an inventory item.
pub async fn delete_inventory_endpoint(
    State(state): State<InventoryState>,
    Path(item_id): Path<InventoryItemId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_inventory_item(state.user_id, item_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::INVENTORY_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not delete inventory item: {error}");

            error.into_alert_response()
        }
    }
}
