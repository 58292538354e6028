pub mod errors;
pub mod logging;
pub mod models;
pub mod providers;
pub mod services;

use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use errors::ChartError;
use models::{
    overlay::{SummaryRow, TradeTable},
    query::{ChartForm, ChartQuery},
    response::{ChartResponse, ResponseShape},
    settings::ClientSettings,
};
use providers::{
    http::HttpChartSource,
    traits::{ChartDataSource, ChartRenderer},
};
use services::{
    annotation_service::SignalAnnotationBuilder,
    cumulative_return_service::CumulativeReturnDeriver,
    layout_service::LayoutService,
    shape_service::OperationRangeShapeBuilder,
    table_service::TradeTableProjector,
};

/// What happened to one submission.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Chart (and, for the rich shape, overlays and tables) drawn.
    Rendered(ResponseShape),
    /// The form was incomplete; no request was sent.
    Invalid(ChartError),
    /// The request failed; the chart region shows the error.
    Failed(ChartError),
    /// A newer submission was issued while this one was in flight;
    /// its response was dropped without touching the page.
    Superseded,
}

/// Everything needed to update the page, computed before any region is touched
/// so a failure never leaves a half-rendered result.
struct PreparedChart {
    shape: ResponseShape,
    data: Vec<Value>,
    layout: Map<String, Value>,
    summary: Option<Vec<SummaryRow>>,
    trades: Option<TradeTable>,
}

/// Main entry point: turns a submitted chart form into page updates.
///
/// Each submission is an independent transaction: validate, show the loading
/// indicator, fetch, interpret, derive overlays and tables, render.
/// Submissions are numbered; when `discard_stale_responses` is set only the
/// latest one may render, otherwise the last response to arrive wins.
#[must_use]
pub struct ChartRequestController<R: ChartRenderer> {
    source: Box<dyn ChartDataSource>,
    renderer: R,
    settings: ClientSettings,
    annotation_builder: SignalAnnotationBuilder,
    shape_builder: OperationRangeShapeBuilder,
    table_projector: TradeTableProjector,
    cumulative_deriver: CumulativeReturnDeriver,
    layout_service: LayoutService,
    /// Sequence number of the most recent submission that passed validation.
    latest_request: AtomicU64,
}

impl<R: ChartRenderer> std::fmt::Debug for ChartRequestController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartRequestController")
            .field("source", &self.source.name())
            .field("settings", &self.settings)
            .field("latest_request", &self.latest_request.load(Ordering::SeqCst))
            .finish()
    }
}

impl<R: ChartRenderer> ChartRequestController<R> {
    pub fn new(source: Box<dyn ChartDataSource>, renderer: R, settings: ClientSettings) -> Self {
        Self {
            source,
            renderer,
            annotation_builder: SignalAnnotationBuilder::new(),
            shape_builder: OperationRangeShapeBuilder::new(),
            table_projector: TradeTableProjector::new(),
            cumulative_deriver: CumulativeReturnDeriver::new(),
            layout_service: LayoutService::new(settings.margin_top),
            settings,
            latest_request: AtomicU64::new(0),
        }
    }

    /// Controller backed by the HTTP chart endpoint described by `settings`.
    pub fn with_http(settings: ClientSettings, renderer: R) -> Result<Self, ChartError> {
        settings.validate()?;
        let source = HttpChartSource::new(&settings)?;
        Ok(Self::new(Box::new(source), renderer, settings))
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Handle one user-initiated chart request.
    ///
    /// Safe to call again while a previous call is still awaiting its response.
    pub async fn handle_submit(&self, form: &ChartForm) -> SubmitOutcome {
        let query = match ChartQuery::from_form(form) {
            Ok(query) => query,
            Err(e) => {
                debug!(error = %e, "chart form rejected");
                self.renderer.show_validation_message(&e.user_message());
                return SubmitOutcome::Invalid(e);
            }
        };

        let request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.renderer.show_loading();
        info!(
            request,
            instruments = ?query.instruments,
            chart_type = %query.chart_type,
            "submitting chart request"
        );

        let fetched = self.source.fetch_chart_data(&query).await;

        if self.is_stale(request) {
            debug!(request, "dropping response from superseded request");
            return SubmitOutcome::Superseded;
        }

        let prepared = fetched
            .and_then(ChartResponse::interpret)
            .and_then(|response| self.prepare(&query, response));

        match prepared {
            Ok(chart) => {
                let shape = chart.shape;
                self.present(chart);
                info!(request, ?shape, "chart rendered");
                SubmitOutcome::Rendered(shape)
            }
            Err(e) => {
                warn!(request, error = %e, "chart request failed");
                self.show_failure(&e);
                SubmitOutcome::Failed(e)
            }
        }
    }

    fn is_stale(&self, request: u64) -> bool {
        self.settings.discard_stale_responses
            && self.latest_request.load(Ordering::SeqCst) != request
    }

    // ── Interpretation ──────────────────────────────────────────────

    fn prepare(
        &self,
        query: &ChartQuery,
        response: ChartResponse,
    ) -> Result<PreparedChart, ChartError> {
        match response {
            ChartResponse::Simple(figure) => {
                let mut layout = figure.layout;
                self.layout_service
                    .apply_base_layout(&mut layout, query.chart_type);
                Ok(PreparedChart {
                    shape: ResponseShape::Simple,
                    data: figure.data,
                    layout,
                    summary: None,
                    trades: None,
                })
            }
            ChartResponse::Rich(rich) => {
                let annotations = self.annotation_builder.build(&rich.suggestions);
                let shapes = self.shape_builder.build(rich.default_operation.as_ref());

                let mut layout = rich.plotly_figure.layout;
                self.layout_service
                    .apply_base_layout(&mut layout, query.chart_type);
                self.layout_service
                    .merge_overlays(&mut layout, &annotations, &shapes)?;

                let summary = rich
                    .default_operation
                    .as_ref()
                    .filter(|op| !op.is_empty())
                    .map(|op| self.table_projector.summarize(op));

                let trades = if rich.trade_table.is_empty() {
                    None
                } else {
                    let mut records = rich.trade_table;
                    self.cumulative_deriver.derive(
                        &mut records,
                        &self.settings.cumulative_source_field,
                        &self.settings.cumulative_target_field,
                    );
                    Some(self.table_projector.project(&records))
                };

                debug!(
                    annotations = annotations.len(),
                    shapes = shapes.len(),
                    trades = trades.as_ref().map_or(0, |t| t.rows.len()),
                    "overlays prepared"
                );

                Ok(PreparedChart {
                    shape: ResponseShape::Rich,
                    data: rich.plotly_figure.data,
                    layout,
                    summary,
                    trades,
                })
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn present(&self, chart: PreparedChart) {
        self.renderer.clear();
        self.renderer.draw(&chart.data, &chart.layout);

        match &chart.summary {
            Some(rows) => self.renderer.render_summary(rows),
            None => self.renderer.clear_summary(),
        }
        match &chart.trades {
            Some(table) => self.renderer.render_trade_table(table),
            None => self.renderer.clear_trade_table(),
        }
    }

    /// Error in the chart region; both table regions are cleared with it.
    fn show_failure(&self, error: &ChartError) {
        self.renderer.show_error(&error.user_message());
        self.renderer.clear_summary();
        self.renderer.clear_trade_table();
    }
}
