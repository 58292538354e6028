//! Console logging for native hosts (CLI tools, integration harnesses).
//! In the browser the host page decides where `tracing` output goes.

use crate::errors::ChartError;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. "info" or "trade_chart_core=debug"
    pub log_level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Install a global fmt subscriber. Fails if one is already installed.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(config: &LoggingConfig) -> Result<(), ChartError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_level)
        .map_err(|e| ChartError::Config(format!("bad log filter '{}': {e}", config.log_level)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| ChartError::Config(e.to_string()))?;

    tracing::info!(level = %config.log_level, "console logging initialized");
    Ok(())
}
