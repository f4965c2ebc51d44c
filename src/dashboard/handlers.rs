//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, UserId, endpoints,
    html::{
        BUTTON_FILTER_ACTIVE_STYLE, BUTTON_FILTER_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    report::{sum_amounts, tax_totals},
    timezone::local_today,
    transaction::{SortOrder, TransactionFilter, TransactionKind, get_transactions},
};

use super::{
    cards::summary_cards_view,
    charts::{chart_view, income_expense_chart},
    series::build_series,
    window::Window,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
    pub user_id: UserId,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            user_id: state.user_id,
        }
    }
}

/// Query string for the dashboard chart partial.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    /// The selected time window. Defaults to month-to-date.
    pub window: Option<Window>,
}

/// Display a page with an overview of the user's finances.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let window = Window::default();
    let content = build_dashboard_content(&state, window)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let echarts = HeadElement::ScriptLink(
        "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js".to_owned(),
    );

    let page = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div id="dashboard-content" class="w-full max-w-5xl"
            {
                (content)
            }
        }
    };

    Ok(base("Dashboard", &[echarts], &page).into_response())
}

/// Re-render the dashboard content for a different time window.
pub async fn get_dashboard_chart(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let window = query.window.unwrap_or_default();

    match build_dashboard_content(&state, window) {
        Ok(content) => content.into_response(),
        Err(error) => {
            tracing::error!("could not build dashboard: {error}");

            error.into_alert_response()
        }
    }
}

/// Fetch the window's transactions and render the cards and chart.
///
/// Every window change runs this from scratch; there is no incremental
/// adjustment of a previous series.
fn build_dashboard_content(state: &DashboardState, window: Window) -> Result<Markup, Error> {
    let today = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    // Fetch from the first bucket's start so a partial leading bucket (e.g.
    // a week bucket straddling the window edge) is complete.
    let window_start = window.bucket().truncate(window.start_date(today));
    let filter = TransactionFilter {
        date_range: Some(window_start..=today),
        category: None,
    };

    let incomes = get_transactions(
        TransactionKind::Income,
        state.user_id,
        &filter,
        SortOrder::Ascending,
        &connection,
    )?;
    let expenses = get_transactions(
        TransactionKind::Expense,
        state.user_id,
        &filter,
        SortOrder::Ascending,
        &connection,
    )?;

    let points = build_series(&incomes, &expenses, window, today);
    let chart = income_expense_chart(&points, window)?;

    let cards = summary_cards_view(
        window.label(),
        sum_amounts(&incomes),
        sum_amounts(&expenses),
        tax_totals(&incomes, &expenses),
    );

    Ok(html! {
        (window_buttons_view(window))
        (cards)
        (chart_view(&chart))
    })
}

/// Renders the window filter buttons with the active window highlighted.
///
/// Rapid clicks replace any in-flight request, so a stale response can never
/// overwrite a newer selection.
fn window_buttons_view(active_window: Window) -> Markup {
    html! {
        div
            id="window-buttons"
            hx-sync="this:replace"
            class="flex flex-wrap gap-2 mb-4"
        {
            @for window in Window::all() {
                button
                    type="button"
                    hx-get=(format!(
                        "{}?window={}",
                        endpoints::DASHBOARD_CHART,
                        window.as_query_value()
                    ))
                    hx-target="#dashboard-content"
                    hx-target-error="#alert-container"
                    class=(if window == active_window {
                        BUTTON_FILTER_ACTIVE_STYLE
                    } else {
                        BUTTON_FILTER_STYLE
                    })
                {
                    (window.label())
                }
            }
        }
    }
}
