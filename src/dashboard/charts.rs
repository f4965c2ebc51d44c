//! Chart generation for the dashboard.
//!
//! The income/expense series is rendered as an ECharts line chart. The chart
//! configuration is generated as JSON and mounted by a small inline script,
//! so it survives HTMX swaps when the window selection changes.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Line,
};
use maud::{Markup, PreEscaped, html};

use crate::Error;

use super::{series::SeriesPoint, window::Window};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the income vs expenses line chart for the selected window.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if the chart configuration cannot
/// be serialized.
pub(super) fn income_expense_chart(
    points: &[SeriesPoint],
    window: Window,
) -> Result<DashboardChart, Error> {
    let labels: Vec<String> = points.iter().map(|point| point.label.clone()).collect();
    let income_values: Vec<f64> = points.iter().map(|point| point.income_total).collect();
    let expense_values: Vec<f64> = points.iter().map(|point| point.expense_total).collect();

    let chart = Chart::new()
        .title(
            Title::new()
                .text("Income vs Expenses")
                .subtext(window.label()),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Income").data(income_values))
        .series(Line::new().name("Expenses").data(expense_values));

    let options = serde_json::to_string(&chart)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(DashboardChart {
        id: "income-expense-chart",
        options,
    })
}

/// Renders the chart container and the script that mounts it.
pub(super) fn chart_view(chart: &DashboardChart) -> Markup {
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{}");
            const chart = echarts.init(chartDom);
            chart.setOption({});

            window.addEventListener('resize', chart.resize);
        }})();"#,
        chart.id, chart.options
    );

    html! {
        section class="w-full mx-auto mb-4"
        {
            div id=(chart.id) class="min-h-[380px] rounded bg-white dark:bg-gray-100" {}

            script { (PreEscaped(script)) }
        }
    }
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-CA', {
              style: 'currency',
              currency: 'CAD',
              currencyDisplay: 'narrowSymbol'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
