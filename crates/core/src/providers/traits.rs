use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::ChartError;
use crate::models::overlay::{SummaryRow, TradeTable};
use crate::models::query::ChartQuery;
use crate::models::response::RawResponse;

/// Where chart data comes from (the `/chart-data` endpoint in production).
///
/// Returns the status and JSON body untouched; interpreting them is the
/// controller's job. Transport and JSON parse failures are errors.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ChartDataSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    async fn fetch_chart_data(&self, query: &ChartQuery) -> Result<RawResponse, ChartError>;
}

/// The page: a chart container plus the operation-summary and trade-table
/// regions. Each region is replaced or cleared independently.
///
/// Methods take `&self` because overlapping submissions share one page.
pub trait ChartRenderer: Send + Sync {
    /// Replace the chart container with a loading indicator.
    fn show_loading(&self);

    /// Replace the chart container with a single error message.
    fn show_error(&self, message: &str);

    /// Inline message next to the form; no region is touched.
    fn show_validation_message(&self, message: &str);

    /// Purge any chart instance from the container.
    fn clear(&self);

    /// Draw a new chart. Always preceded by [`clear`](Self::clear).
    fn draw(&self, data: &[Value], layout: &Map<String, Value>);

    fn render_summary(&self, rows: &[SummaryRow]);

    fn clear_summary(&self);

    fn render_trade_table(&self, table: &TradeTable);

    fn clear_trade_table(&self);
}
