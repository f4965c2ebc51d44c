//! The shared form for creating and editing income and expense records.

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    database_id::TransactionId,
    endpoints::format_endpoint,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    tag::Tag,
};

use super::core::{Transaction, TransactionData, TransactionKind};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Whether the form creates a new record or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FormAction {
    Create,
    Update(TransactionId),
}

/// The raw form fields as submitted by the browser.
///
/// Everything arrives as text; [TransactionFormData::parse] applies the
/// strict write-side validation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TransactionFormData {
    pub date: String,
    pub amount: String,
    #[serde(default)]
    pub description: String,
    pub tag: String,
    #[serde(default)]
    pub tax_rate: String,
}

impl TransactionFormData {
    /// Parse and validate the submitted fields.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] or [Error::InvalidAmount] when a field
    /// cannot be parsed, or [Error::InvalidTaxRate] for an unreadable tax
    /// rate. Range checks happen later in the database layer.
    pub(super) fn parse(&self) -> Result<TransactionData, Error> {
        let date = Date::parse(self.date.trim(), DATE_FORMAT)
            .map_err(|_| Error::InvalidDate(self.date.clone()))?;

        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| Error::InvalidAmount(self.amount.clone()))?;

        let tax_rate = match self.tax_rate.trim() {
            "" => None,
            raw_rate => Some(
                raw_rate
                    .parse()
                    .map_err(|_| Error::InvalidTaxRate(self.tax_rate.clone()))?,
            ),
        };

        Ok(TransactionData {
            amount,
            date,
            description: self.description.trim().to_owned(),
            tag: self.tag.clone(),
            tax_rate,
        })
    }
}

/// Render the transaction form.
///
/// `values` pre-fills the fields when editing; `tags` feeds the category
/// suggestion list.
pub(super) fn transaction_form_view(
    kind: TransactionKind,
    action: FormAction,
    values: Option<&Transaction>,
    tags: &[Tag],
) -> Markup {
    let submit_label = match action {
        FormAction::Create => format!("Record {}", kind.label()),
        FormAction::Update(_) => "Save Changes".to_owned(),
    };

    let date_value = values.map(|transaction| transaction.date.to_string());
    let amount_value = values.map(|transaction| format!("{:.2}", transaction.amount));
    let description_value = values.map(|transaction| transaction.description.clone());
    let tag_value = values.map(|transaction| transaction.tag.clone());
    let tax_rate_value = values
        .and_then(|transaction| transaction.tax_rate)
        .map(|rate| rate.to_string());

    let form_fields = html! {
        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }
            input
                id="date"
                type="date"
                name="date"
                value=[date_value]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
            input
                id="amount"
                type="number"
                name="amount"
                value=[amount_value]
                min="0"
                step="0.01"
                placeholder="0.00"
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }
            input
                id="description"
                type="text"
                name="description"
                value=[description_value]
                placeholder="What was this for?"
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="tag" class=(FORM_LABEL_STYLE) { "Category" }
            input
                id="tag"
                type="text"
                name="tag"
                value=[tag_value]
                list="category-options"
                placeholder="Category"
                required
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id="category-options"
            {
                @for tag in tags {
                    option value=(tag.name) {}
                }
            }
        }

        div
        {
            label for="tax_rate" class=(FORM_LABEL_STYLE) { "Sales tax rate (%)" }
            input
                id="tax_rate"
                type="number"
                name="tax_rate"
                value=[tax_rate_value]
                min="0"
                max="100"
                step="0.01"
                placeholder="Leave blank for no tax"
                class=(FORM_TEXT_INPUT_STYLE);
        }

        button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
    };

    match action {
        FormAction::Create => html! {
            form
                hx-post=(kind.api_endpoint())
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (form_fields)
            }
        },
        FormAction::Update(id) => html! {
            form
                hx-put=(format_endpoint(kind.record_endpoint(), id))
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (form_fields)
            }
        },
    }
}
