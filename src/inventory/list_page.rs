//! The inventory list page, including inline stock adjustments.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, endpoints,
    endpoints::format_endpoint,
    html::{
        BUTTON_DELETE_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TAG_BADGE_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
};

use super::{InventoryState, core::InventoryItem, get_inventory_by_user};

/// Display the user's inventory, ordered by SKU.
pub async fn get_inventory_page(State(state): State<InventoryState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let items = get_inventory_by_user(state.user_id, &connection)?;

    Ok(inventory_view(&items).into_response())
}

fn inventory_view(items: &[InventoryItem]) -> Markup {
    let nav_bar = NavBar::new(endpoints::INVENTORY_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl flex justify-between items-baseline mb-4"
            {
                h1 class="text-2xl font-bold" { "Inventory" }

                a href=(endpoints::NEW_INVENTORY_VIEW) class=(LINK_STYLE) { "Add Item" }
            }

            @if items.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No inventory yet." }
            } @else {
                div class="w-full max-w-5xl relative overflow-x-auto shadow-md sm:rounded-lg"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "SKU" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Quantity" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Unit Cost" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Adjust Stock" }
                                th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                            }
                        }

                        tbody
                        {
                            @for item in items {
                                (inventory_row(item))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Inventory", &[], &content)
}

fn inventory_row(item: &InventoryItem) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (item.sku_id) }
            td class=(TABLE_CELL_STYLE) { (item.name) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(TAG_BADGE_STYLE) { (item.category) }
            }
            td class=(TABLE_CELL_STYLE) { (item.quantity) }
            td class=(TABLE_CELL_STYLE) { (format_currency(item.unit_price)) }
            td class=(TABLE_CELL_STYLE)
            {
                form
                    hx-post=(format_endpoint(endpoints::ADJUST_INVENTORY, item.id))
                    hx-target-error="#alert-container"
                    class="flex gap-2 items-center"
                {
                    input
                        type="number"
                        name="delta"
                        step="1"
                        placeholder="±0"
                        required
                        class=(format!("{FORM_TEXT_INPUT_STYLE} max-w-24"));

                    button type="submit" class=(LINK_STYLE) { "Apply" }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a
                        href=(format_endpoint(endpoints::EDIT_INVENTORY_VIEW, item.id))
                        class=(LINK_STYLE)
                    {
                        "Edit"
                    }

                    button
                        type="button"
                        hx-delete=(format_endpoint(endpoints::INVENTORY_ITEM, item.id))
                        hx-confirm="Delete this inventory item?"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}
