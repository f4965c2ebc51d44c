//! Shopbooks is a web app for tracking the finances of a small business:
//! income, expenses, inventory and sales tax, with on-demand reports and a
//! charting dashboard.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod inventory;
mod navigation;
mod not_found;
mod report;
mod routing;
mod tag;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use database_id::UserId;
pub use db::initialize as initialize_db;
pub use routing::build_router;

use crate::{
    alert::AlertView,
    internal_server_error::{InternalServerErrorPageTemplate, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A date string on a form could not be parsed as a calendar date.
    ///
    /// Writes with unparseable dates are rejected outright. Callers should
    /// pass in the offending date string.
    #[error("\"{0}\" is not a valid date in the format YYYY-MM-DD")]
    InvalidDate(String),

    /// An amount string on a form could not be parsed as a number.
    ///
    /// Writes are strict: a record is only stored once its amount has been
    /// read as a number. Reads are lenient, see the report aggregation.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// A negative amount was used to create or update a record.
    ///
    /// Income, expense and inventory amounts record magnitudes, the record
    /// kind carries the sign.
    #[error("amounts must not be negative, got {0}")]
    NegativeAmount(f64),

    /// An empty string was used as a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A tax rate outside of zero to one hundred percent.
    #[error("{0} is not a valid tax rate, expected a percentage between 0 and 100")]
    InvalidTaxRate(String),

    /// The SKU used to create or update an inventory item is already taken
    /// by another of the user's items.
    #[error("an inventory item with this SKU already exists")]
    DuplicateSku,

    /// A stock deduction was larger than the quantity on hand.
    #[error("cannot deduct {requested} unit(s), only {on_hand} on hand")]
    InsufficientStock {
        /// The quantity currently on hand.
        on_hand: i64,
        /// The size of the attempted deduction.
        requested: i64,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update an inventory item that does not exist
    #[error("tried to update an inventory item that is not in the database")]
    UpdateMissingItem,

    /// Tried to delete an inventory item that does not exist
    #[error("tried to delete an inventory item that is not in the database")]
    DeleteMissingItem,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while writing a report as CSV.
    #[error("could not export the report as CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("inventory.sku_id") =>
            {
                Error::DuplicateSku
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPageTemplate {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status, alert) = match self {
            Error::InvalidDate(ref date_string) => (
                StatusCode::BAD_REQUEST,
                AlertView::error(
                    "Invalid date",
                    &format!(
                        "\"{date_string}\" could not be read as a calendar date. \
                        Enter the date as YYYY-MM-DD."
                    ),
                ),
            ),
            Error::InvalidAmount(ref amount_string) => (
                StatusCode::BAD_REQUEST,
                AlertView::error(
                    "Invalid amount",
                    &format!("\"{amount_string}\" could not be read as a number."),
                ),
            ),
            Error::NegativeAmount(amount) => (
                StatusCode::BAD_REQUEST,
                AlertView::error(
                    "Invalid amount",
                    &format!("{amount} is negative. Amounts must be zero or more."),
                ),
            ),
            Error::EmptyCategoryName => (
                StatusCode::BAD_REQUEST,
                AlertView::error("Invalid category", "The category name cannot be empty."),
            ),
            Error::InvalidTaxRate(ref rate) => (
                StatusCode::BAD_REQUEST,
                AlertView::error(
                    "Invalid tax rate",
                    &format!("{rate} is not a percentage between 0 and 100."),
                ),
            ),
            Error::DuplicateSku => (
                StatusCode::BAD_REQUEST,
                AlertView::error(
                    "Duplicate SKU",
                    "Another inventory item already uses this SKU. \
                    Choose a different SKU, or edit or delete the existing item.",
                ),
            ),
            Error::InsufficientStock { on_hand, requested } => (
                StatusCode::BAD_REQUEST,
                AlertView::error(
                    "Not enough stock",
                    &format!("Tried to deduct {requested} unit(s) but only {on_hand} on hand."),
                ),
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                AlertView::error(
                    "Could not update transaction",
                    "The transaction could not be found.",
                ),
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                AlertView::error(
                    "Could not delete transaction",
                    "The transaction could not be found. \
                    Try refreshing the page to see if it has already been deleted.",
                ),
            ),
            Error::UpdateMissingItem => (
                StatusCode::NOT_FOUND,
                AlertView::error(
                    "Could not update inventory item",
                    "The inventory item could not be found.",
                ),
            ),
            Error::DeleteMissingItem => (
                StatusCode::NOT_FOUND,
                AlertView::error(
                    "Could not delete inventory item",
                    "The inventory item could not be found. \
                    Try refreshing the page to see if it has already been deleted.",
                ),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    AlertView::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
            }
        };

        (status, alert.into_html()).into_response()
    }
}
