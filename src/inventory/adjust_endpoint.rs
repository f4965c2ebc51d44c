//! Endpoint for applying stock adjustments to inventory items.
//!
//! Purchases add stock, consumption and sales deduct it. Deductions that
//! would take the quantity on hand below zero are rejected.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{Error, database_id::InventoryItemId, endpoints};

use super::{InventoryState, core::adjust_quantity};

/// Form data for a stock adjustment.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustFormData {
    /// Signed change in quantity, e.g. `25` for a delivery or `-3` for a sale.
    pub delta: String,
}

/// Apply a stock adjustment to an inventory item.
pub async fn adjust_inventory_endpoint(
    State(state): State<InventoryState>,
    Path(item_id): Path<InventoryItemId>,
    Form(form): Form<AdjustFormData>,
) -> Response {
    let delta: i64 = match form.delta.trim().parse() {
        Ok(delta) => delta,
        Err(_) => return Error::InvalidAmount(form.delta).into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match adjust_quantity(state.user_id, item_id, delta, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::INVENTORY_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not adjust inventory quantity: {error}");

            error.into_alert_response()
        }
    }
}
