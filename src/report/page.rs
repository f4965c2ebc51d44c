//! The reports page: a request form, a live preview fragment and a CSV
//! download.

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error, UserId, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    tag::{TagKind, get_tags_by_kind},
    timezone::local_today,
    transaction::tax::{TaxTotals, get_tax_totals_in_range},
};

use super::{
    builder::{
        IncomeStatement, InventorySummary, Report, ReportDateRange, ReportRequest, ReportType,
        SortBy, TransactionSummary, generate_report,
    },
    csv::report_to_csv,
};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The state needed for building reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
    pub user_id: UserId,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            user_id: state.user_id,
        }
    }
}

/// The raw report query string as submitted by the report form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQueryParams {
    pub report_type: Option<ReportType>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub sort_by: Option<SortBy>,
}

impl ReportQueryParams {
    /// Parse the raw query into a [ReportRequest].
    ///
    /// The date filter only applies when both endpoints are given; the
    /// category values `""` and `"all"` disable the category filter.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] when a non-empty date cannot be parsed.
    fn parse(&self) -> Result<ReportRequest, Error> {
        let start = parse_optional_date(self.start.as_deref())?;
        let end = parse_optional_date(self.end.as_deref())?;
        let date_range = match (start, end) {
            (Some(start), Some(end)) => Some(ReportDateRange { start, end }),
            _ => None,
        };

        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty() && *category != "all")
            .map(str::to_owned);

        Ok(ReportRequest {
            report_type: self.report_type.unwrap_or(ReportType::IncomeStatement),
            date_range,
            category,
            sort_by: self.sort_by.unwrap_or_default(),
        })
    }
}

fn parse_optional_date(raw: Option<&str>) -> Result<Option<Date>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Date::parse(text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| Error::InvalidDate(text.to_owned())),
    }
}

/// Display the reports page.
pub async fn get_reports_page(State(state): State<ReportState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = all_category_names(state.user_id, &connection)?;

    Ok(reports_view(&categories).into_response())
}

/// Render a report preview fragment for the submitted query.
pub async fn get_report_preview(
    State(state): State<ReportState>,
    Query(params): Query<ReportQueryParams>,
) -> Response {
    let request = match params.parse() {
        Ok(request) => request,
        Err(error) => return error.into_alert_response(),
    };

    let Some(today) = local_today(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone.clone()).into_alert_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let report = match generate_report(&request, state.user_id, today, &connection) {
        Ok(report) => report,
        Err(error) => {
            tracing::error!("could not generate report: {error}");
            return error.into_alert_response();
        }
    };

    // Tax context is shown alongside the statement but is not part of the
    // report envelope.
    let tax_totals = match &report {
        Report::IncomeStatement(statement) => {
            match get_tax_totals_in_range(
                state.user_id,
                statement.date_range.start,
                statement.date_range.end,
                &connection,
            ) {
                Ok(totals) => Some(totals),
                Err(error) => {
                    tracing::error!("could not total sales tax: {error}");
                    return error.into_alert_response();
                }
            }
        }
        _ => None,
    };

    report_preview_view(&report, tax_totals).into_response()
}

/// Generate a report and download it as a CSV file.
pub async fn get_report_csv(
    State(state): State<ReportState>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Response, Error> {
    let request = params.parse()?;

    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let report = generate_report(&request, state.user_id, today, &connection)?;
    let csv = report_to_csv(&report)?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}.csv\"",
                request.report_type.as_query_value()
            ),
        ),
    ];

    Ok((headers, csv).into_response())
}

/// The union of the user's category names across all record kinds, sorted
/// and deduplicated for the filter dropdown.
fn all_category_names(user_id: UserId, connection: &Connection) -> Result<Vec<String>, Error> {
    let mut names = BTreeSet::new();

    for kind in [TagKind::Income, TagKind::Expense, TagKind::Inventory] {
        for tag in get_tags_by_kind(user_id, kind, connection)? {
            names.insert(tag.name.to_string());
        }
    }

    Ok(names.into_iter().collect())
}

fn reports_view(categories: &[String]) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Reports" }

            form
                action=(endpoints::REPORT_CSV)
                method="get"
                class="w-full max-w-2xl grid grid-cols-1 md:grid-cols-2 gap-4 mb-8"
            {
                div
                {
                    label for="report_type" class=(FORM_LABEL_STYLE) { "Report" }
                    select id="report_type" name="report_type" class=(FORM_SELECT_STYLE)
                    {
                        @for report_type in [
                            ReportType::IncomeStatement,
                            ReportType::IncomeSummary,
                            ReportType::ExpenseSummary,
                            ReportType::InventorySummary,
                        ] {
                            option value=(report_type.as_query_value()) { (report_type.label()) }
                        }
                    }
                }

                div
                {
                    label for="sort_by" class=(FORM_LABEL_STYLE) { "Sort by" }
                    select id="sort_by" name="sort_by" class=(FORM_SELECT_STYLE)
                    {
                        @for sort_by in SortBy::all() {
                            option value=(sort_by.as_query_value()) { (sort_by.label()) }
                        }
                    }
                }

                div
                {
                    label for="start" class=(FORM_LABEL_STYLE) { "From" }
                    input id="start" type="date" name="start" class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="end" class=(FORM_LABEL_STYLE) { "To" }
                    input id="end" type="date" name="end" class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="md:col-span-2"
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    select id="category" name="category" class=(FORM_SELECT_STYLE)
                    {
                        option value="all" { "All categories" }

                        @for category in categories {
                            option value=(category) { (category) }
                        }
                    }
                }

                div class="md:col-span-2 flex gap-4"
                {
                    // Rapid re-previews replace any in-flight request, so a
                    // stale response can never overwrite a newer preview.
                    button
                        type="button"
                        hx-get=(endpoints::REPORT_PREVIEW)
                        hx-include="closest form"
                        hx-target="#report-preview"
                        hx-sync="this:replace"
                        hx-target-error="#alert-container"
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Preview Report"
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Download CSV" }
                }
            }

            div id="report-preview" class="w-full max-w-4xl" {}
        }
    };

    base("Reports", &[], &content)
}

fn report_preview_view(report: &Report, tax_totals: Option<TaxTotals>) -> Markup {
    match report {
        Report::IncomeStatement(statement) => income_statement_view(statement, tax_totals),
        Report::TransactionSummary(summary) => transaction_summary_view(summary),
        Report::InventorySummary(summary) => inventory_summary_view(summary),
    }
}

fn date_range_caption(date_range: &ReportDateRange) -> Markup {
    html! {
        p class="text-sm text-gray-600 dark:text-gray-400 mb-4"
        {
            (date_range.start) " to " (date_range.end)
        }
    }
}

fn income_statement_view(statement: &IncomeStatement, tax_totals: Option<TaxTotals>) -> Markup {
    html! {
        section
        {
            h2 class="text-xl font-semibold mb-1" { "Income Statement" }
            (date_range_caption(&statement.date_range))

            dl class="max-w-md divide-y divide-gray-200 dark:divide-gray-700"
            {
                (statement_line("Total Income", statement.total_income))
                (statement_line("Total Expenses", statement.total_expenses))
                (statement_line("Net Income", statement.net_income))

                @if let Some(totals) = tax_totals {
                    (statement_line("Sales Tax Collected", totals.collected))
                    (statement_line("Sales Tax Paid", totals.paid))
                }
            }
        }
    }
}

fn statement_line(label: &str, amount: f64) -> Markup {
    html! {
        div class="flex justify-between py-2"
        {
            dt class="font-medium" { (label) }
            dd { (format_currency(amount)) }
        }
    }
}

fn transaction_summary_view(summary: &TransactionSummary) -> Markup {
    // HashMap iteration order is unspecified; sort for stable display.
    let mut categories: Vec<_> = summary.category_summary.iter().collect();
    categories.sort_by(|a, b| a.0.cmp(b.0));

    html! {
        section
        {
            h2 class="text-xl font-semibold mb-1" { (summary.report_type.label()) }
            (date_range_caption(&summary.date_range))

            @if summary.transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400 mb-4" { "No transactions in this range." }
            } @else {
                div class="relative overflow-x-auto shadow-md sm:rounded-lg mb-6"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Tax" }
                            }
                        }

                        tbody
                        {
                            @for transaction in &summary.transactions {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE) { (transaction.date) }
                                    td class=(TABLE_CELL_STYLE) { (transaction.tag) }
                                    td class=(TABLE_CELL_STYLE) { (transaction.description) }
                                    td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        @match transaction.tax_amount {
                                            Some(tax_amount) => { (format_currency(tax_amount)) }
                                            None => { "—" }
                                        }
                                    }
                                }
                            }
                        }

                        tfoot
                        {
                            tr class="font-semibold text-gray-900 dark:text-white"
                            {
                                th scope="row" class=(TABLE_CELL_STYLE) colspan="3" { "Total" }
                                td class=(TABLE_CELL_STYLE) { (format_currency(summary.total)) }
                                td class=(TABLE_CELL_STYLE) {}
                            }
                        }
                    }
                }

                h3 class="text-lg font-semibold mb-2" { "By Category" }
                dl class="max-w-md divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for (category, amount) in categories {
                        div class="flex justify-between py-2"
                        {
                            dt { (category) }
                            dd { (format_currency(*amount)) }
                        }
                    }
                }
            }
        }
    }
}

fn inventory_summary_view(summary: &InventorySummary) -> Markup {
    html! {
        section
        {
            h2 class="text-xl font-semibold mb-4" { "Inventory Summary" }

            @if summary.inventory.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No inventory to value." }
            } @else {
                div class="relative overflow-x-auto shadow-md sm:rounded-lg"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Item Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "SKU" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Quantity" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Unit Cost" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Total Value" }
                            }
                        }

                        tbody
                        {
                            @for line in &summary.inventory {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE) { (line.name) }
                                    td class=(TABLE_CELL_STYLE) { (line.sku_id) }
                                    td class=(TABLE_CELL_STYLE) { (line.quantity) }
                                    td class=(TABLE_CELL_STYLE) { (format_currency(line.unit_price)) }
                                    td class=(TABLE_CELL_STYLE) { (format_currency(line.total_value)) }
                                }
                            }
                        }

                        tfoot
                        {
                            tr class="font-semibold text-gray-900 dark:text-white"
                            {
                                th scope="row" class=(TABLE_CELL_STYLE) colspan="4" { "Total" }
                                td class=(TABLE_CELL_STYLE) { (format_currency(summary.total)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod report_query_tests {
    use time::macros::date;

    use crate::{Error, report::builder::ReportType};

    use super::ReportQueryParams;

    #[test]
    fn empty_query_defaults_to_income_statement() {
        let request = ReportQueryParams::default().parse().unwrap();

        assert_eq!(request.report_type, ReportType::IncomeStatement);
        assert_eq!(request.date_range, None);
        assert_eq!(request.category, None);
    }

    #[test]
    fn all_category_disables_the_filter() {
        let params = ReportQueryParams {
            category: Some("all".to_owned()),
            ..Default::default()
        };

        assert_eq!(params.parse().unwrap().category, None);
    }

    #[test]
    fn date_range_requires_both_endpoints() {
        let params = ReportQueryParams {
            start: Some("2025-01-01".to_owned()),
            ..Default::default()
        };

        assert_eq!(params.parse().unwrap().date_range, None);
    }

    #[test]
    fn parses_complete_date_range() {
        let params = ReportQueryParams {
            start: Some("2025-01-01".to_owned()),
            end: Some("2025-03-31".to_owned()),
            ..Default::default()
        };

        let range = params.parse().unwrap().date_range.unwrap();
        assert_eq!(range.start, date!(2025 - 01 - 01));
        assert_eq!(range.end, date!(2025 - 03 - 31));
    }

    #[test]
    fn rejects_unparseable_date() {
        let params = ReportQueryParams {
            start: Some("Jan 1".to_owned()),
            end: Some("2025-03-31".to_owned()),
            ..Default::default()
        };

        assert_eq!(params.parse(), Err(Error::InvalidDate("Jan 1".to_owned())));
    }
}

#[cfg(test)]
mod report_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document, parse_html_fragment},
        transaction::{TransactionData, TransactionKind, create_transaction},
    };

    use super::{ReportQueryParams, ReportState, get_report_csv, get_report_preview, get_reports_page};

    fn get_test_state() -> ReportState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        ReportState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "America/Toronto".to_owned(),
            user_id: 1,
        }
    }

    fn seed_records(state: &ReportState) {
        let connection = state.db_connection.lock().unwrap();
        for (kind, amount, tag) in [
            (TransactionKind::Income, 150.50, "Sales"),
            (TransactionKind::Income, 300.75, "Consulting"),
            (TransactionKind::Expense, 50.00, "Rent"),
        ] {
            create_transaction(
                kind,
                1,
                TransactionData {
                    amount,
                    date: date!(2025 - 05 - 01),
                    description: String::new(),
                    tag: tag.to_owned(),
                    tax_rate: None,
                },
                &connection,
            )
            .unwrap();
        }
    }

    #[tokio::test]
    async fn reports_page_renders_request_form() {
        let response = get_reports_page(State(get_test_state())).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.html();
        assert!(text.contains("Income Statement"));
        assert!(text.contains("Download CSV"));
    }

    #[tokio::test]
    async fn preview_renders_income_statement_totals() {
        let state = get_test_state();
        seed_records(&state);

        let response =
            get_report_preview(State(state), Query(ReportQueryParams::default())).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let text = html.html();
        assert!(text.contains("$451.25"));
        assert!(text.contains("$50.00"));
        assert!(text.contains("$401.25"));
    }

    #[tokio::test]
    async fn preview_rejects_unparseable_date() {
        let state = get_test_state();

        let params = ReportQueryParams {
            start: Some("first of May".to_owned()),
            end: Some("2025-05-31".to_owned()),
            ..Default::default()
        };
        let response = get_report_preview(State(state), Query(params)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn csv_download_sets_attachment_headers() {
        let state = get_test_state();
        seed_records(&state);

        let response = get_report_csv(State(state), Query(ReportQueryParams::default()))
            .await
            .unwrap();

        assert_status_ok(&response);
        let content_disposition = response
            .headers()
            .get("content-disposition")
            .expect("content-disposition header missing")
            .to_str()
            .unwrap();
        assert!(content_disposition.contains("income-statement.csv"));
    }
}
