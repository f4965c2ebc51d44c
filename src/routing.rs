//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};

use crate::{
    AppState,
    dashboard::{get_dashboard_chart, get_dashboard_page},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    inventory::{
        adjust_inventory_endpoint, create_inventory_endpoint, delete_inventory_endpoint,
        get_edit_inventory_page, get_inventory_page, get_new_inventory_page,
        update_inventory_endpoint,
    },
    not_found::get_404_not_found,
    report::{get_report_csv, get_report_preview, get_reports_page},
    tag::get_tags_page,
    transaction::{
        create_expense_endpoint, create_income_endpoint, delete_expense_endpoint,
        delete_income_endpoint, get_edit_expense_page, get_edit_income_page, get_expenses_page,
        get_income_page, get_new_expense_page, get_new_income_page, update_expense_endpoint,
        update_income_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::INCOME_VIEW, get(get_income_page))
        .route(endpoints::NEW_INCOME_VIEW, get(get_new_income_page))
        .route(endpoints::EDIT_INCOME_VIEW, get(get_edit_income_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::NEW_EXPENSE_VIEW, get(get_new_expense_page))
        .route(endpoints::EDIT_EXPENSE_VIEW, get(get_edit_expense_page))
        .route(endpoints::INVENTORY_VIEW, get(get_inventory_page))
        .route(endpoints::NEW_INVENTORY_VIEW, get(get_new_inventory_page))
        .route(endpoints::EDIT_INVENTORY_VIEW, get(get_edit_inventory_page))
        .route(endpoints::TAGS_VIEW, get(get_tags_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::DASHBOARD_CHART, get(get_dashboard_chart))
        .route(endpoints::INCOME_API, post(create_income_endpoint))
        .route(
            endpoints::INCOME_RECORD,
            put(update_income_endpoint).delete(delete_income_endpoint),
        )
        .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
        .route(
            endpoints::EXPENSE_RECORD,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(endpoints::INVENTORY_API, post(create_inventory_endpoint))
        .route(
            endpoints::INVENTORY_ITEM,
            put(update_inventory_endpoint).delete(delete_inventory_endpoint),
        )
        .route(endpoints::ADJUST_INVENTORY, post(adjust_inventory_endpoint))
        .route(endpoints::REPORT_PREVIEW, get(get_report_preview))
        .route(endpoints::REPORT_CSV, get(get_report_csv));

    page_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}
