//! Sales tax records linked to income and expense transactions.
//!
//! A transaction that opts into tax tracking gets exactly one auxiliary
//! record, written and removed in the same SQL transaction as the record
//! itself.

use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{Error, UserId, database_id::TransactionId};

/// Whether tax on a transaction was collected from a customer or paid to a
/// supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxDirection {
    /// Tax collected on an income transaction.
    Collected,
    /// Tax paid on an expense transaction.
    Paid,
}

impl TaxDirection {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Collected => "collected",
            Self::Paid => "paid",
        }
    }
}

/// Sales tax tracked against a single transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesTaxRecord {
    pub user_id: UserId,
    pub transaction_id: TransactionId,
    pub direction: TaxDirection,
    /// The tax rate as a percentage.
    pub rate: f64,
    /// The tax amount in dollars.
    pub amount: f64,
}

/// Totals of sales tax collected on income and paid on expenses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxTotals {
    pub collected: f64,
    pub paid: f64,
}

impl TaxTotals {
    /// Net tax owing: collected minus paid.
    pub fn owing(self) -> f64 {
        self.collected - self.paid
    }
}

pub(crate) fn record_sales_tax(
    record: &SalesTaxRecord,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO sales_tax (user_id, transaction_id, direction, rate, amount)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            record.user_id,
            record.transaction_id,
            record.direction.as_str(),
            record.rate,
            record.amount,
        ),
    )?;

    Ok(())
}

/// Remove the sales tax record linked to a transaction, if there is one.
pub(crate) fn delete_sales_tax(
    user_id: UserId,
    transaction_id: TransactionId,
    direction: TaxDirection,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "DELETE FROM sales_tax
         WHERE user_id = ?1 AND transaction_id = ?2 AND direction = ?3",
        (user_id, transaction_id, direction.as_str()),
    )?;

    Ok(())
}

/// Retrieve all of the user's sales tax records.
#[cfg(test)]
pub(crate) fn get_sales_tax(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<SalesTaxRecord>, Error> {
    connection
        .prepare(
            "SELECT user_id, transaction_id, direction, rate, amount FROM sales_tax
             WHERE user_id = ?1",
        )?
        .query_map([user_id], map_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Total the sales tax collected and paid on transactions dated within the
/// inclusive range `start..=end`.
///
/// Used by the dashboard's tax card; dates live on the linked transactions,
/// so each direction joins against its own table.
pub(crate) fn get_tax_totals_in_range(
    user_id: UserId,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<TaxTotals, Error> {
    let collected = connection.query_row(
        "SELECT COALESCE(SUM(s.amount), 0) FROM sales_tax s
         JOIN income i ON s.transaction_id = i.id AND s.user_id = i.user_id
         WHERE s.user_id = ?1 AND s.direction = 'collected'
           AND i.date BETWEEN ?2 AND ?3",
        (user_id, start, end),
        |row| row.get(0),
    )?;

    let paid = connection.query_row(
        "SELECT COALESCE(SUM(s.amount), 0) FROM sales_tax s
         JOIN expense e ON s.transaction_id = e.id AND s.user_id = e.user_id
         WHERE s.user_id = ?1 AND s.direction = 'paid'
           AND e.date BETWEEN ?2 AND ?3",
        (user_id, start, end),
        |row| row.get(0),
    )?;

    Ok(TaxTotals { collected, paid })
}

/// Create the sales tax table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_sales_tax_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS sales_tax (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            transaction_id INTEGER NOT NULL,
            direction TEXT NOT NULL,
            rate REAL NOT NULL,
            amount REAL NOT NULL,
            UNIQUE(user_id, direction, transaction_id)
        );

        CREATE INDEX IF NOT EXISTS idx_sales_tax_user ON sales_tax(user_id);",
    )?;

    Ok(())
}

#[cfg(test)]
fn map_row(row: &rusqlite::Row) -> Result<SalesTaxRecord, rusqlite::Error> {
    let raw_direction: String = row.get(2)?;
    let direction = if raw_direction == "collected" {
        TaxDirection::Collected
    } else {
        TaxDirection::Paid
    };

    Ok(SalesTaxRecord {
        user_id: row.get(0)?,
        transaction_id: row.get(1)?,
        direction,
        rate: row.get(3)?,
        amount: row.get(4)?,
    })
}
