//! Market Data Port (Driven Port)
//!
//! Interface for the market context that accompanies a chain snapshot.

use async_trait::async_trait;

use crate::domain::shared::Symbol;

/// Market data error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarketDataError {
    /// Connection error.
    #[error("Market data connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Data unavailable.
    #[error("Market data unavailable: {message}")]
    DataUnavailable {
        /// Error details.
        message: String,
    },
}

/// Port for the volatility context of an underlying.
///
/// A missing value is not an error: `Ok(None)` means the provider has no
/// reading and the engine lowers confidence accordingly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Current volatility index level (VIX or equivalent) for `symbol`.
    async fn volatility_index(&self, symbol: &Symbol) -> Result<Option<f64>, MarketDataError>;

    /// Volatility of implied volatility, when the provider tracks it.
    async fn vol_of_vol(&self, _symbol: &Symbol) -> Result<Option<f64>, MarketDataError> {
        Ok(None)
    }
}
