use serde::{Deserialize, Serialize};

use crate::errors::ChartError;

/// Client configuration for the chart page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Origin of the chart server (e.g., "http://localhost:5000").
    pub base_url: String,

    /// Path of the chart data endpoint.
    pub chart_data_path: String,

    /// Request timeout in seconds. Native targets only; the browser has its own.
    pub timeout_secs: u64,

    /// Top margin forced onto every layout, in pixels.
    pub margin_top: u32,

    /// Drop responses that arrive after a newer submission was issued.
    /// When false, whichever response resolves last is rendered.
    pub discard_stale_responses: bool,

    /// Trade field holding the per-trade return in percent (e.g., 3.25 or "3.25%").
    /// `pnl_percentage` is not suitable: the server writes it as exit/entry
    /// (a +10% trade is "110.0%").
    pub cumulative_source_field: String,

    /// Trade field the compounded return is written to.
    pub cumulative_target_field: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            chart_data_path: "/chart-data".to_string(),
            timeout_secs: 30,
            margin_top: 50,
            discard_stale_responses: true,
            cumulative_source_field: "pnl_pct".to_string(),
            cumulative_target_field: "cumulative_return".to_string(),
        }
    }
}

impl ClientSettings {
    /// Defaults overridden by `CHART_BASE_URL` and `CHART_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ChartError> {
        let mut settings = Self::default();
        if let Ok(url) = std::env::var("CHART_BASE_URL") {
            settings.base_url = url;
        }
        if let Ok(raw) = std::env::var("CHART_TIMEOUT_SECS") {
            settings.timeout_secs = raw.parse().map_err(|_| {
                ChartError::Config(format!("CHART_TIMEOUT_SECS must be a number, got '{raw}'"))
            })?;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.base_url.trim().is_empty() {
            return Err(ChartError::Config("base_url must not be empty".into()));
        }
        if self.cumulative_target_field.trim().is_empty() {
            return Err(ChartError::Config(
                "cumulative_target_field must not be empty".into(),
            ));
        }
        Ok(())
    }
}
