//! Chain Source Port (Driven Port)
//!
//! Interface for loading option chain snapshots.

use async_trait::async_trait;

use crate::domain::chain::ChainSnapshot;
use crate::domain::shared::Symbol;

/// Chain source error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainSourceError {
    /// No snapshot exists for the symbol.
    #[error("No option chain for symbol: {symbol}")]
    NotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// The snapshot could not be read.
    #[error("Chain source unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// The snapshot was read but could not be decoded.
    #[error("Malformed chain snapshot for {symbol}: {message}")]
    Malformed {
        /// Symbol being decoded.
        symbol: String,
        /// Decoder message.
        message: String,
    },
}

/// Port for loading the latest option chain for an underlying.
///
/// Implementations return raw rows; validation happens in the engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainSourcePort: Send + Sync {
    /// Fetch the latest snapshot for `symbol`.
    async fn fetch_chain(&self, symbol: &Symbol) -> Result<ChainSnapshot, ChainSourceError>;
}
