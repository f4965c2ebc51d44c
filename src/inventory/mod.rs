//! Inventory items: model, database operations, list page and CRUD endpoints.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, UserId};

mod adjust_endpoint;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_page;

pub use adjust_endpoint::adjust_inventory_endpoint;
pub(crate) use self::core::InventoryItem;
pub use self::core::{
    InventoryItemData, adjust_quantity, create_inventory_item, create_inventory_table,
    delete_inventory_item, get_inventory_by_user, get_inventory_item, update_inventory_item,
};
pub use create_endpoint::{create_inventory_endpoint, get_new_inventory_page};
pub use delete_endpoint::delete_inventory_endpoint;
pub use edit_endpoint::{get_edit_inventory_page, update_inventory_endpoint};
pub use list_page::get_inventory_page;

/// The state shared by the inventory pages and endpoints.
#[derive(Debug, Clone)]
pub struct InventoryState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub user_id: UserId,
}

impl FromRef<AppState> for InventoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            user_id: state.user_id,
        }
    }
}
