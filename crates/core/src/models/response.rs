use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::{ChartError, GENERIC_SERVER_ERROR};

use super::record::{OperationSummary, TradeRecord};
use super::signal::SignalEvent;

/// Status and JSON body of one `/chart-data` call, before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Chart-library-native series and layout. Passed through untouched except
/// for the layout keys the page owns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Value>,
    #[serde(default)]
    pub layout: Map<String, Value>,
}

/// The richer response: figure plus signals, highlighted operation and trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichChartResponse {
    pub plotly_figure: Figure,

    #[serde(default, deserialize_with = "lenient_list")]
    pub suggestions: Vec<SignalEvent>,

    #[serde(default)]
    pub default_operation: Option<OperationSummary>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub trade_table: Vec<TradeRecord>,
}

/// Which of the two response layouts the server used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{data, layout}`
    Simple,
    /// `{plotly_figure, suggestions, default_operation, trade_table}`
    Rich,
}

/// A successful, interpreted chart response.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartResponse {
    Simple(Figure),
    Rich(RichChartResponse),
}

impl ChartResponse {
    pub fn shape(&self) -> ResponseShape {
        match self {
            ChartResponse::Simple(_) => ResponseShape::Simple,
            ChartResponse::Rich(_) => ResponseShape::Rich,
        }
    }

    /// Interpret a raw response.
    ///
    /// Failures, in order: non-2xx status, an `error` field in a 2xx body,
    /// an explicitly null `plotly_figure`, and bodies matching neither shape.
    pub fn interpret(raw: RawResponse) -> Result<Self, ChartError> {
        let error_message = raw.body.get("error").and_then(error_text);

        if !raw.is_success() {
            return Err(ChartError::Server {
                status: raw.status,
                message: error_message.unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string()),
            });
        }
        if let Some(message) = error_message {
            return Err(ChartError::Server {
                status: raw.status,
                message,
            });
        }

        let Value::Object(map) = raw.body else {
            return Err(ChartError::DataShape("expected a JSON object".into()));
        };

        if let Some(figure) = map.get("plotly_figure") {
            if figure.is_null() {
                return Err(ChartError::DataShape("response carries no chart figure".into()));
            }
            let rich: RichChartResponse = serde_json::from_value(Value::Object(map))
                .map_err(|e| ChartError::DataShape(e.to_string()))?;
            return Ok(ChartResponse::Rich(rich));
        }

        if map.contains_key("data") {
            let figure: Figure = serde_json::from_value(Value::Object(map))
                .map_err(|e| ChartError::DataShape(e.to_string()))?;
            return Ok(ChartResponse::Simple(figure));
        }

        Err(ChartError::DataShape(
            "response carries neither `plotly_figure` nor `data`".into(),
        ))
    }
}

fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A list field that may be missing, null, or not a list at all. Anything
/// other than an array is logged and read as empty so the chart still renders.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        items @ Value::Array(_) => serde_json::from_value(items).map_err(D::Error::custom),
        other => {
            warn!(found = %json_kind(&other), "expected a list in chart response; treating as empty");
            Ok(Vec::new())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
