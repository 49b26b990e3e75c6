//! Observability configuration for logging.

use serde::{Deserialize, Serialize};

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ObservabilityConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level directive (overridden by `RUST_LOG`).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: `json`, `pretty` or `compact`.
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Include the event target (module path).
    #[serde(default = "default_true")]
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            include_target: true,
        }
    }
}

/// Accepted values of [`LoggingConfig::format`].
pub const LOG_FORMATS: [&str; 3] = ["json", "pretty", "compact"];

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

const fn default_true() -> bool {
    true
}
