//! Logging Setup
//!
//! Installs a `tracing-subscriber` fmt subscriber for hosts that embed the
//! engine. The library itself only emits events; it never installs a
//! subscriber on its own.
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides `observability.logging.level` when set
//! - `observability.logging.format`: `json`, `pretty` or `compact`
//!
//! # Usage
//!
//! ```rust,ignore
//! use pressure_engine::config::load_config;
//! use pressure_engine::telemetry::init_tracing;
//!
//! let config = load_config(None)?;
//! init_tracing(&config.observability.logging)?;
//! ```

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// Offending directive.
        directive: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Build the filter: `RUST_LOG` if set, else the configured level.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` when the configured level cannot be
/// parsed.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| TelemetryError::InvalidFilter {
        directive: config.level.clone(),
        message: e.to_string(),
    })
}

/// Install the global fmt subscriber described by `config`.
///
/// # Errors
///
/// Returns `TelemetryError::Install` when a subscriber is already installed,
/// or `InvalidFilter` for a bad level directive.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.include_target);

    let result = match config.format.as_str() {
        "pretty" => builder.pretty().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.json().try_init(),
    };
    result.map_err(|e| TelemetryError::Install(e.to_string()))?;

    tracing::debug!(
        level = %config.level,
        format = %config.format,
        "Tracing subscriber installed"
    );
    Ok(())
}
