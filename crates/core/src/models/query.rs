use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::ChartError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How the server should draw the price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Closing prices as a line per instrument
    Line,
    /// OHLC candles per instrument
    Candlestick,
}

impl ChartType {
    /// Wire value used in the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Candlestick => "candlestick",
        }
    }

    /// Only candlestick charts get a range slider under the x axis.
    pub fn shows_range_slider(&self) -> bool {
        matches!(self, ChartType::Candlestick)
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(ChartType::Line),
            "candlestick" => Ok(ChartType::Candlestick),
            "" => Err(ChartError::Validation("select a chart type".into())),
            other => Err(ChartError::Validation(format!("unknown chart type: {other}"))),
        }
    }
}

/// Raw state of the chart form, exactly as the page collected it.
///
/// Nothing here is trusted; [`ChartQuery::from_form`] validates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartForm {
    /// Selected instrument symbols, in selection order
    pub instruments: Vec<String>,
    pub chart_type: String,
    pub start_date: String,
    pub end_date: String,
    /// Moving-average window in days; empty when the field was left blank
    pub moving_average_window: String,
    /// "Include current day" checkbox
    pub include_current_period: bool,
}

/// Moving-average overlay request. Only exists when a window was supplied,
/// so the include flag can never be sent on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovingAverage {
    pub window: u32,
    pub include_current_period: bool,
}

/// A validated chart request, ready to be serialized into a query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartQuery {
    /// Unique, upper-cased symbols in selection order (never empty)
    pub instruments: Vec<String>,
    pub chart_type: ChartType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub moving_average: Option<MovingAverage>,
}

impl ChartQuery {
    /// Validate the raw form and build a query from it.
    ///
    /// Instruments are trimmed, upper-cased and de-duplicated (first occurrence wins).
    /// Both dates are required and must be in order.
    pub fn from_form(form: &ChartForm) -> Result<Self, ChartError> {
        let mut instruments: Vec<String> = Vec::new();
        for raw in &form.instruments {
            let symbol = raw.trim().to_uppercase();
            if !symbol.is_empty() && !instruments.contains(&symbol) {
                instruments.push(symbol);
            }
        }
        if instruments.is_empty() {
            return Err(ChartError::Validation("select at least one stock".into()));
        }

        let chart_type: ChartType = form.chart_type.parse()?;

        let start_date = parse_date("start date", &form.start_date)?;
        let end_date = parse_date("end date", &form.end_date)?;
        if start_date > end_date {
            return Err(ChartError::Validation(format!(
                "start date ({start_date}) must not be after end date ({end_date})"
            )));
        }

        let window = form.moving_average_window.trim();
        let moving_average = if window.is_empty() {
            None
        } else {
            let window = window
                .parse::<u32>()
                .ok()
                .filter(|w| *w > 0)
                .ok_or_else(|| {
                    ChartError::Validation(format!(
                        "moving average window must be a positive whole number, got '{window}'"
                    ))
                })?;
            Some(MovingAverage {
                window,
                include_current_period: form.include_current_period,
            })
        };

        Ok(Self {
            instruments,
            chart_type,
            start_date,
            end_date,
            moving_average,
        })
    }

    /// Query parameters in wire order. `avg`/`include` appear only together,
    /// and only when a moving-average window was requested.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("stock", self.instruments.join(",")),
            ("type", self.chart_type.as_str().to_string()),
            ("start", self.start_date.format(DATE_FORMAT).to_string()),
            ("end", self.end_date.format(DATE_FORMAT).to_string()),
        ];
        if let Some(ma) = &self.moving_average {
            pairs.push(("avg", ma.window.to_string()));
            let include = if ma.include_current_period { "1" } else { "0" };
            pairs.push(("include", include.to_string()));
        }
        pairs
    }

    /// URL-encoded query string (without the leading `?`).
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ChartError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ChartError::Validation(format!("{field} is required")));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ChartError::Validation(format!("{field} '{raw}' is not a YYYY-MM-DD date")))
}
