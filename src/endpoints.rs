//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/income/{transaction_id}/edit',
//! use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with summary cards and the income/expense chart.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for re-rendering the dashboard for a different time window.
pub const DASHBOARD_CHART: &str = "/api/dashboard/chart";
/// The page for displaying the user's income records.
pub const INCOME_VIEW: &str = "/income";
/// The page for recording a new income.
pub const NEW_INCOME_VIEW: &str = "/income/new";
/// The page for editing an existing income record.
pub const EDIT_INCOME_VIEW: &str = "/income/{transaction_id}/edit";
/// The page for displaying the user's expense records.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for recording a new expense.
pub const NEW_EXPENSE_VIEW: &str = "/expenses/new";
/// The page for editing an existing expense record.
pub const EDIT_EXPENSE_VIEW: &str = "/expenses/{transaction_id}/edit";
/// The page for displaying the user's inventory.
pub const INVENTORY_VIEW: &str = "/inventory";
/// The page for adding a new inventory item.
pub const NEW_INVENTORY_VIEW: &str = "/inventory/new";
/// The page for editing an existing inventory item.
pub const EDIT_INVENTORY_VIEW: &str = "/inventory/{item_id}/edit";
/// The page for listing the user's category vocabulary.
pub const TAGS_VIEW: &str = "/tags";
/// The page for building and previewing reports.
pub const REPORTS_VIEW: &str = "/reports";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to create an income record.
pub const INCOME_API: &str = "/api/income";
/// The route to update or delete a single income record.
pub const INCOME_RECORD: &str = "/api/income/{transaction_id}";
/// The route to create an expense record.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to update or delete a single expense record.
pub const EXPENSE_RECORD: &str = "/api/expenses/{transaction_id}";
/// The route to create an inventory item.
pub const INVENTORY_API: &str = "/api/inventory";
/// The route to update or delete a single inventory item.
pub const INVENTORY_ITEM: &str = "/api/inventory/{item_id}";
/// The route to adjust the quantity on hand of an inventory item.
pub const ADJUST_INVENTORY: &str = "/api/inventory/{item_id}/adjust";
/// The route that renders a report preview fragment.
pub const REPORT_PREVIEW: &str = "/api/reports/preview";
/// The route that downloads a report as a CSV file.
pub const REPORT_CSV: &str = "/api/reports/csv";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/income/{transaction_id}/edit',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };
    let Some(param_end) = endpoint_path[param_start..].find('}') else {
        return endpoint_path.to_owned();
    };

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_start + param_end + 1..]
    )
}

#[cfg(test)]
mod format_endpoint_tests {
    use super::{EDIT_INCOME_VIEW, INVENTORY_ITEM, ROOT, format_endpoint};

    #[test]
    fn replaces_parameter_with_id() {
        assert_eq!(format_endpoint(EDIT_INCOME_VIEW, 42), "/income/42/edit");
        assert_eq!(format_endpoint(INVENTORY_ITEM, 7), "/api/inventory/7");
    }

    #[test]
    fn returns_path_unchanged_when_no_parameter() {
        assert_eq!(format_endpoint(ROOT, 1), "/");
    }
}
