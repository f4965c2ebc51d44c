//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of an income or expense record.
pub type TransactionId = i64;
/// The ID of an inventory item.
pub type InventoryItemId = i64;
/// The ID of the user that owns a record.
///
/// Identity is resolved by an upstream session layer; this crate only scopes
/// queries by it.
pub type UserId = i64;
