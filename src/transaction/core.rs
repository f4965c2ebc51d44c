//! Defines the core data models and database queries for income and expense records.

use rusqlite::{Connection, Row, types::ValueRef};
use serde::Serialize;
use time::Date;

use crate::{
    Error, UserId,
    database_id::TransactionId,
    endpoints,
    tag::{TagKind, TagName, ensure_tag},
};

use super::tax::{SalesTaxRecord, TaxDirection, delete_sales_tax, record_sales_tax};

// ============================================================================
// MODELS
// ============================================================================

/// The two record kinds money moves through.
///
/// Income and expense records are structurally identical but live in
/// separate tables and are only merged at read time for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub(crate) fn table_name(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    pub(crate) fn plural_label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expenses",
        }
    }

    pub(crate) fn tag_kind(self) -> TagKind {
        match self {
            Self::Income => TagKind::Income,
            Self::Expense => TagKind::Expense,
        }
    }

    pub(crate) fn tax_direction(self) -> TaxDirection {
        match self {
            Self::Income => TaxDirection::Collected,
            Self::Expense => TaxDirection::Paid,
        }
    }

    pub(crate) fn list_endpoint(self) -> &'static str {
        match self {
            Self::Income => endpoints::INCOME_VIEW,
            Self::Expense => endpoints::EXPENSES_VIEW,
        }
    }

    pub(crate) fn new_endpoint(self) -> &'static str {
        match self {
            Self::Income => endpoints::NEW_INCOME_VIEW,
            Self::Expense => endpoints::NEW_EXPENSE_VIEW,
        }
    }

    pub(crate) fn edit_endpoint(self) -> &'static str {
        match self {
            Self::Income => endpoints::EDIT_INCOME_VIEW,
            Self::Expense => endpoints::EDIT_EXPENSE_VIEW,
        }
    }

    pub(crate) fn api_endpoint(self) -> &'static str {
        match self {
            Self::Income => endpoints::INCOME_API,
            Self::Expense => endpoints::EXPENSES_API,
        }
    }

    pub(crate) fn record_endpoint(self) -> &'static str {
        match self {
            Self::Income => endpoints::INCOME_RECORD,
            Self::Expense => endpoints::EXPENSE_RECORD,
        }
    }
}

/// A single movement of money, i.e. a sale recorded as income or a purchase
/// recorded as an expense.
///
/// Amounts are magnitudes, the owning table carries the direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the record within its table.
    #[serde(skip)]
    pub id: TransactionId,
    /// The user that owns the record.
    #[serde(skip)]
    pub user_id: UserId,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The category the transaction belongs to.
    #[serde(rename = "category")]
    pub tag: String,
    /// The sales tax rate as a percentage, if tax tracking was opted into.
    pub tax_rate: Option<f64>,
    /// The sales tax amount, computed from the amount and rate at write time.
    pub tax_amount: Option<f64>,
}

/// The validated fields needed to create or fully replace a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionData {
    pub amount: f64,
    pub date: Date,
    pub description: String,
    pub tag: String,
    pub tax_rate: Option<f64>,
}

impl TransactionData {
    /// Check the data invariants and return the parsed category name.
    ///
    /// # Errors
    /// Returns [Error::NegativeAmount] for negative or non-finite amounts,
    /// [Error::EmptyCategoryName] for a blank category, and
    /// [Error::InvalidTaxRate] for a rate outside 0-100.
    fn validate(&self) -> Result<TagName, Error> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::NegativeAmount(self.amount));
        }

        if let Some(rate) = self.tax_rate
            && !(0.0..=100.0).contains(&rate)
        {
            return Err(Error::InvalidTaxRate(rate.to_string()));
        }

        TagName::new(&self.tag)
    }

    fn tax_amount(&self) -> Option<f64> {
        self.tax_rate.map(|rate| self.amount * rate / 100.0)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction record for `user_id`.
///
/// A novel category name is added to the user's tag vocabulary, and a sales
/// tax record is written when the data opted into tax tracking. All writes
/// happen in a single SQL transaction.
///
/// # Errors
/// This function will return the validation errors from [TransactionData],
/// or [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    kind: TransactionKind,
    user_id: UserId,
    data: TransactionData,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let tag_name = data.validate()?;
    let tax_amount = data.tax_amount();

    let sql_transaction = connection.unchecked_transaction()?;

    ensure_tag(user_id, kind.tag_kind(), &tag_name, &sql_transaction)?;

    let query = format!(
        "INSERT INTO {} (user_id, amount, date, description, tag, tax_rate, tax_amount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         RETURNING id, user_id, amount, date, description, tag, tax_rate, tax_amount",
        kind.table_name()
    );
    let transaction = sql_transaction.prepare(&query)?.query_row(
        (
            user_id,
            data.amount,
            data.date,
            &data.description,
            tag_name.as_ref(),
            data.tax_rate,
            tax_amount,
        ),
        map_transaction_row,
    )?;

    if let (Some(rate), Some(amount)) = (data.tax_rate, tax_amount) {
        record_sales_tax(
            &SalesTaxRecord {
                user_id,
                transaction_id: transaction.id,
                direction: kind.tax_direction(),
                rate,
                amount,
            },
            &sql_transaction,
        )?;
    }

    sql_transaction.commit()?;

    Ok(transaction)
}

/// Retrieve one of the user's transactions by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `(user_id, id)` does not refer to a valid record,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    kind: TransactionKind,
    user_id: UserId,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let query = format!(
        "SELECT id, user_id, amount, date, description, tag, tax_rate, tax_amount
         FROM {} WHERE id = :id AND user_id = :user_id",
        kind.table_name()
    );

    let transaction = connection
        .prepare(&query)?
        .query_row(&[(":id", &id), (":user_id", &user_id)], map_transaction_row)?;

    Ok(transaction)
}

/// Replace every field of one of the user's transactions.
///
/// # Errors
/// This function will return the validation errors from [TransactionData],
/// [Error::UpdateMissingTransaction] if `(user_id, id)` does not refer to a
/// valid record, or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    kind: TransactionKind,
    user_id: UserId,
    id: TransactionId,
    data: TransactionData,
    connection: &Connection,
) -> Result<(), Error> {
    let tag_name = data.validate()?;
    let tax_amount = data.tax_amount();

    let sql_transaction = connection.unchecked_transaction()?;

    ensure_tag(user_id, kind.tag_kind(), &tag_name, &sql_transaction)?;

    let query = format!(
        "UPDATE {} SET amount = ?1, date = ?2, description = ?3, tag = ?4,
         tax_rate = ?5, tax_amount = ?6
         WHERE id = ?7 AND user_id = ?8",
        kind.table_name()
    );
    let rows_affected = sql_transaction.execute(
        &query,
        (
            data.amount,
            data.date,
            &data.description,
            tag_name.as_ref(),
            data.tax_rate,
            tax_amount,
            id,
            user_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    // The linked sales tax record is replaced wholesale, including removal
    // when the update dropped tax tracking.
    delete_sales_tax(user_id, id, kind.tax_direction(), &sql_transaction)?;
    if let (Some(rate), Some(amount)) = (data.tax_rate, tax_amount) {
        record_sales_tax(
            &SalesTaxRecord {
                user_id,
                transaction_id: id,
                direction: kind.tax_direction(),
                rate,
                amount,
            },
            &sql_transaction,
        )?;
    }

    sql_transaction.commit()?;

    Ok(())
}

/// Delete one of the user's transactions and its linked sales tax record.
///
/// # Errors
/// This function will return a [Error::DeleteMissingTransaction] if
/// `(user_id, id)` does not refer to a valid record, or [Error::SqlError] if
/// there is some other SQL error.
pub fn delete_transaction(
    kind: TransactionKind,
    user_id: UserId,
    id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let query = format!("DELETE FROM {} WHERE id = ?1 AND user_id = ?2", kind.table_name());
    let rows_affected = sql_transaction.execute(&query, (id, user_id))?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    delete_sales_tax(user_id, id, kind.tax_direction(), &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(())
}

/// Create the income and expense tables in the database.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn create_transaction_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    for table in ["income", "expense"] {
        connection.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    date TEXT NOT NULL,
                    description TEXT NOT NULL,
                    tag TEXT NOT NULL,
                    tax_rate REAL,
                    tax_amount REAL
                    )"
            ),
            (),
        )?;

        // Composite index used by the dashboard and report date-range queries.
        connection.execute(
            &format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_user_date ON {table}(user_id, date);"
            ),
            (),
        )?;
    }

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Expects columns in the order
/// `id, user_id, amount, date, description, tag, tax_rate, tax_amount`.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: read_lenient_amount(row, 2),
        date: row.get(3)?,
        description: row.get(4)?,
        tag: row.get(5)?,
        tax_rate: row.get(6)?,
        tax_amount: row.get(7)?,
    })
}

/// Read an amount column, coercing dirty values to zero instead of failing.
///
/// SQLite columns are dynamically typed, so an imported or hand-edited
/// database can hold text where a number belongs. A report should never fail
/// on one bad row; the warning keeps the coercion from going unnoticed.
fn read_lenient_amount(row: &Row, index: usize) -> f64 {
    match row.get_ref(index) {
        Ok(ValueRef::Real(value)) => value,
        Ok(ValueRef::Integer(value)) => value as f64,
        Ok(ValueRef::Text(bytes)) => {
            let text = String::from_utf8_lossy(bytes);
            match text.trim().parse() {
                Ok(value) => value,
                Err(_) => {
                    tracing::warn!("treating unparseable amount {text:?} as 0");
                    0.0
                }
            }
        }
        _ => {
            tracing::warn!("treating non-numeric amount column as 0");
            0.0
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
