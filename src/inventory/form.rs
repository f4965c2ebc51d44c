//! The shared form for creating and editing inventory items.

use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    database_id::InventoryItemId,
    endpoints,
    endpoints::format_endpoint,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    tag::Tag,
};

use super::core::{InventoryItem, InventoryItemData};

/// Whether the form creates a new item or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FormAction {
    Create,
    Update(InventoryItemId),
}

/// The raw form fields as submitted by the browser.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ItemFormData {
    pub sku_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub category: String,
}

impl ItemFormData {
    /// Parse and validate the submitted fields.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] when a numeric field cannot be parsed.
    /// Range checks happen later in the database layer.
    pub(super) fn parse(&self) -> Result<InventoryItemData, Error> {
        let sku_id = self
            .sku_id
            .trim()
            .parse()
            .map_err(|_| Error::InvalidAmount(self.sku_id.clone()))?;

        let quantity = self
            .quantity
            .trim()
            .parse()
            .map_err(|_| Error::InvalidAmount(self.quantity.clone()))?;

        let unit_price = self
            .unit_price
            .trim()
            .parse()
            .map_err(|_| Error::InvalidAmount(self.unit_price.clone()))?;

        Ok(InventoryItemData {
            sku_id,
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
            quantity,
            unit_price,
            category: self.category.clone(),
        })
    }
}

/// Render the inventory item form.
pub(super) fn item_form_view(
    action: FormAction,
    values: Option<&InventoryItem>,
    tags: &[Tag],
) -> Markup {
    let submit_label = match action {
        FormAction::Create => "Add Item",
        FormAction::Update(_) => "Save Changes",
    };

    let sku_value = values.map(|item| item.sku_id.to_string());
    let name_value = values.map(|item| item.name.clone());
    let description_value = values.map(|item| item.description.clone());
    let quantity_value = values.map(|item| item.quantity.to_string());
    let unit_price_value = values.map(|item| format!("{:.2}", item.unit_price));
    let category_value = values.map(|item| item.category.clone());

    let form_fields = html! {
        div
        {
            label for="sku_id" class=(FORM_LABEL_STYLE) { "SKU" }
            input
                id="sku_id"
                type="number"
                name="sku_id"
                value=[sku_value]
                min="0"
                step="1"
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }
            input
                id="name"
                type="text"
                name="name"
                value=[name_value]
                placeholder="Product name"
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
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="quantity" class=(FORM_LABEL_STYLE) { "Quantity on hand" }
            input
                id="quantity"
                type="number"
                name="quantity"
                value=[quantity_value]
                min="0"
                step="1"
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="unit_price" class=(FORM_LABEL_STYLE) { "Unit cost" }
            input
                id="unit_price"
                type="number"
                name="unit_price"
                value=[unit_price_value]
                min="0"
                step="0.01"
                placeholder="0.00"
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }
            input
                id="category"
                type="text"
                name="category"
                value=[category_value]
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

        button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
    };

    match action {
        FormAction::Create => html! {
            form
                hx-post=(endpoints::INVENTORY_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (form_fields)
            }
        },
        FormAction::Update(id) => html! {
            form
                hx-put=(format_endpoint(endpoints::INVENTORY_ITEM, id))
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (form_fields)
            }
        },
    }
}

#[cfg(test)]
mod form_data_tests {
    use crate::Error;

    use super::ItemFormData;

    fn form(sku_id: &str, quantity: &str, unit_price: &str) -> ItemFormData {
        ItemFormData {
            sku_id: sku_id.to_owned(),
            name: "Widget".to_owned(),
            description: String::new(),
            quantity: quantity.to_owned(),
            unit_price: unit_price.to_owned(),
            category: "Parts".to_owned(),
        }
    }

    #[test]
    fn parses_complete_form() {
        let data = form("1001", "5", "30.00").parse().unwrap();

        assert_eq!(data.sku_id, 1001);
        assert_eq!(data.quantity, 5);
        assert_eq!(data.unit_price, 30.0);
    }

    #[test]
    fn rejects_unparseable_sku() {
        let result = form("WID-1001", "5", "30.00").parse();

        assert_eq!(result, Err(Error::InvalidAmount("WID-1001".to_owned())));
    }

    #[test]
    fn rejects_fractional_quantity() {
        let result = form("1001", "2.5", "30.00").parse();

        assert_eq!(result, Err(Error::InvalidAmount("2.5".to_owned())));
    }
}
