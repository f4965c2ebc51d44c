//! The dashboard: summary cards and an income/expense chart over a
//! user-selected time window.

mod cards;
mod charts;
mod handlers;
mod series;
mod window;

pub use handlers::{DashboardState, get_dashboard_chart, get_dashboard_page};
pub use window::Window;
