//! Database initialization for the application's domain tables.

use rusqlite::Connection;

use crate::{
    inventory::create_inventory_table,
    tag::create_tag_table,
    transaction::{create_sales_tax_table, create_transaction_tables},
};

/// Create the tables for all domain records.
///
/// Safe to call on every startup, existing tables are left untouched.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_tag_table(connection)?;
    create_transaction_tables(connection)?;
    create_inventory_table(connection)?;
    create_sales_tax_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        let count: i64 = connection
            .query_row(
                "SELECT COUNT(name) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('income', 'expense', 'inventory', 'tag', 'sales_tax')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Second initialize failed");
    }
}
