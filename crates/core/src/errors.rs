use thiserror::Error;

/// Message shown when the server reports a failure without an `error` field.
pub const GENERIC_SERVER_ERROR: &str = "Failed to load chart data.";

/// Unified error type for the entire trade-chart-core library.
/// Every public function returns `Result<T, ChartError>`.
#[derive(Debug, Error)]
pub enum ChartError {
    // ── User input ──────────────────────────────────────────────────
    #[error("Incomplete selection: {0}")]
    Validation(String),

    // ── Server / Network ────────────────────────────────────────────
    /// The server answered but reported a failure. Displays the message verbatim.
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Response interpretation ─────────────────────────────────────
    #[error("Unexpected response shape: {0}")]
    DataShape(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ChartError {
    /// Text placed in the chart region when a request fails.
    pub fn user_message(&self) -> String {
        match self {
            ChartError::Server { message, .. } => message.clone(),
            ChartError::Validation(msg) => msg.clone(),
            ChartError::Network(_) | ChartError::Deserialization(_) => {
                format!("Chart load failed: {self}")
            }
            ChartError::DataShape(_) | ChartError::Config(_) => self.to_string(),
        }
    }

    /// True for errors detected before any request is issued.
    pub fn is_validation(&self) -> bool {
        matches!(self, ChartError::Validation(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for ChartError {
    fn from(e: serde_json::Error) -> Self {
        ChartError::Deserialization(e.to_string())
    }
}

impl From<url::ParseError> for ChartError {
    fn from(e: url::ParseError) -> Self {
        ChartError::Config(format!("bad endpoint URL: {e}"))
    }
}

impl From<reqwest::Error> for ChartError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; keep the selection out of logs and UI.
        let sanitized = redact_query(&e.to_string());
        if e.is_decode() {
            ChartError::Deserialization(sanitized)
        } else {
            ChartError::Network(sanitized)
        }
    }
}

/// Replace the query part of any URL in `msg`, keeping the text that follows it
/// (reqwest wraps the URL in parentheses).
fn redact_query(msg: &str) -> String {
    let Some(start) = msg.find('?') else {
        return msg.to_string();
    };
    let rest = &msg[start..];
    let tail = rest
        .find(|c: char| c == ')' || c.is_whitespace())
        .map_or("", |end| &rest[end..]);
    format!("{}?<query redacted>{}", &msg[..start], tail)
}
