//! Alert fragments for displaying success and error messages to users.
//!
//! Handlers return these as HTMX responses targeting the shared
//! `#alert-container` element in the page layout.

use maud::{Markup, html};

const ERROR_ALERT_STYLE: &str = "p-4 mb-4 rounded-lg bg-red-50 text-red-800 \
    dark:bg-gray-800 dark:text-red-400";

/// An error alert with a summary line and optional details.
#[derive(Debug, Clone)]
pub(crate) struct AlertView {
    message: String,
    details: String,
}

impl AlertView {
    /// Create a new error alert
    pub(crate) fn error(message: &str, details: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    pub(crate) fn into_html(self) -> Markup {
        html! {
            div class=(ERROR_ALERT_STYLE) role="alert"
            {
                span class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    p { (self.details) }
                }
            }
        }
    }
}
