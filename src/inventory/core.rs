//! Defines the core data model and database queries for inventory items.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{
    Error, UserId,
    database_id::InventoryItemId,
    tag::{TagKind, TagName, ensure_tag},
};

// ============================================================================
// MODELS
// ============================================================================

/// A stocked product with a user-chosen SKU, unique within the user's
/// inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// The ID of the item.
    #[serde(skip)]
    pub id: InventoryItemId,
    /// The user that owns the item.
    #[serde(skip)]
    pub user_id: UserId,
    /// The user-chosen stock keeping unit number.
    pub sku_id: i64,
    /// The product name.
    pub name: String,
    /// A text description of the product.
    pub description: String,
    /// The quantity on hand. Never negative.
    pub quantity: i64,
    /// The cost of a single unit.
    pub unit_price: f64,
    /// The category the item belongs to.
    pub category: String,
}

/// The validated fields needed to create or fully replace an inventory item.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItemData {
    pub sku_id: i64,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub category: String,
}

impl InventoryItemData {
    /// Check the data invariants and return the parsed category name.
    fn validate(&self) -> Result<TagName, Error> {
        if self.quantity < 0 {
            return Err(Error::NegativeAmount(self.quantity as f64));
        }

        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(Error::NegativeAmount(self.unit_price));
        }

        TagName::new(&self.category)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new inventory item for `user_id`.
///
/// A novel category name is added to the user's tag vocabulary in the same
/// SQL transaction.
///
/// # Errors
/// This function will return the validation errors from [InventoryItemData],
/// [Error::DuplicateSku] if the user already has an item with the same SKU,
/// or [Error::SqlError] if there is some other SQL error.
pub fn create_inventory_item(
    user_id: UserId,
    data: InventoryItemData,
    connection: &Connection,
) -> Result<InventoryItem, Error> {
    let category = data.validate()?;

    let sql_transaction = connection.unchecked_transaction()?;

    ensure_tag(user_id, TagKind::Inventory, &category, &sql_transaction)?;

    let item = sql_transaction
        .prepare(
            "INSERT INTO inventory (user_id, sku_id, name, description, quantity, unit_price, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, sku_id, name, description, quantity, unit_price, category",
        )?
        .query_row(
            (
                user_id,
                data.sku_id,
                &data.name,
                &data.description,
                data.quantity,
                data.unit_price,
                category.as_ref(),
            ),
            map_inventory_row,
        )?;

    sql_transaction.commit()?;

    Ok(item)
}

/// Retrieve one of the user's inventory items by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `(user_id, id)` does not refer to a valid item,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_inventory_item(
    user_id: UserId,
    id: InventoryItemId,
    connection: &Connection,
) -> Result<InventoryItem, Error> {
    let item = connection
        .prepare(
            "SELECT id, user_id, sku_id, name, description, quantity, unit_price, category
             FROM inventory WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(&[(":id", &id), (":user_id", &user_id)], map_inventory_row)?;

    Ok(item)
}

/// Retrieve all of the user's inventory items, ordered by SKU.
pub fn get_inventory_by_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<InventoryItem>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, sku_id, name, description, quantity, unit_price, category
             FROM inventory WHERE user_id = ?1
             ORDER BY sku_id ASC",
        )?
        .query_map([user_id], map_inventory_row)?
        .map(|item_result| item_result.map_err(|error| error.into()))
        .collect()
}

/// Replace every field of one of the user's inventory items.
///
/// # Errors
/// This function will return the validation errors from [InventoryItemData],
/// [Error::UpdateMissingItem] if `(user_id, id)` does not refer to a valid
/// item, [Error::DuplicateSku] if the new SKU collides with another item, or
/// [Error::SqlError] if there is some other SQL error.
pub fn update_inventory_item(
    user_id: UserId,
    id: InventoryItemId,
    data: InventoryItemData,
    connection: &Connection,
) -> Result<(), Error> {
    let category = data.validate()?;

    let sql_transaction = connection.unchecked_transaction()?;

    ensure_tag(user_id, TagKind::Inventory, &category, &sql_transaction)?;

    let rows_affected = sql_transaction.execute(
        "UPDATE inventory SET sku_id = ?1, name = ?2, description = ?3, quantity = ?4,
         unit_price = ?5, category = ?6
         WHERE id = ?7 AND user_id = ?8",
        (
            data.sku_id,
            &data.name,
            &data.description,
            data.quantity,
            data.unit_price,
            category.as_ref(),
            id,
            user_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingItem);
    }

    sql_transaction.commit()?;

    Ok(())
}

/// Delete one of the user's inventory items.
///
/// # Errors
/// This function will return a [Error::DeleteMissingItem] if `(user_id, id)`
/// does not refer to a valid item, or [Error::SqlError] if there is some
/// other SQL error.
pub fn delete_inventory_item(
    user_id: UserId,
    id: InventoryItemId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM inventory WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingItem);
    }

    Ok(())
}

/// Apply a stock adjustment of `delta` units to one of the user's items.
///
/// Positive deltas record purchases, negative deltas record consumption or
/// sales. A deduction larger than the quantity on hand is rejected and
/// leaves the item untouched.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `(user_id, id)` does not refer to a valid item,
/// - [Error::InsufficientStock] if the deduction would take quantity below zero,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn adjust_quantity(
    user_id: UserId,
    id: InventoryItemId,
    delta: i64,
    connection: &Connection,
) -> Result<InventoryItem, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let item = get_inventory_item(user_id, id, &sql_transaction)?;

    let new_quantity = item.quantity + delta;
    if new_quantity < 0 {
        return Err(Error::InsufficientStock {
            on_hand: item.quantity,
            requested: -delta,
        });
    }

    sql_transaction.execute(
        "UPDATE inventory SET quantity = ?1 WHERE id = ?2 AND user_id = ?3",
        (new_quantity, id, user_id),
    )?;

    sql_transaction.commit()?;

    Ok(InventoryItem {
        quantity: new_quantity,
        ..item
    })
}

/// Create the inventory table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_inventory_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS inventory (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            sku_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            unit_price REAL NOT NULL,
            category TEXT NOT NULL,
            UNIQUE(user_id, sku_id)
        );

        CREATE INDEX IF NOT EXISTS idx_inventory_user ON inventory(user_id);",
    )?;

    Ok(())
}

fn map_inventory_row(row: &Row) -> Result<InventoryItem, rusqlite::Error> {
    Ok(InventoryItem {
        id: row.get(0)?,
        user_id: row.get(1)?,
        sku_id: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        quantity: row.get(5)?,
        unit_price: row.get(6)?,
        category: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
