//! Fixed market context per symbol.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::domain::chain::MarketContext;
use crate::domain::shared::Symbol;

/// `MarketDataPort` backed by values set by the host.
///
/// Symbols without an entry fall back to the default context.
#[derive(Debug, Default)]
pub struct StaticMarketData {
    contexts: RwLock<HashMap<Symbol, MarketContext>>,
    fallback: MarketContext,
}

impl StaticMarketData {
    /// Create a source with no readings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source that answers `fallback` for every symbol.
    #[must_use]
    pub fn with_fallback(fallback: MarketContext) -> Self {
        Self {
            contexts: RwLock::default(),
            fallback,
        }
    }

    /// Set the context for `symbol`.
    pub fn set(&self, symbol: Symbol, context: MarketContext) {
        let mut contexts = self.contexts.write().unwrap_or_else(PoisonError::into_inner);
        contexts.insert(symbol, context);
    }

    fn context(&self, symbol: &Symbol) -> MarketContext {
        let contexts = self.contexts.read().unwrap_or_else(PoisonError::into_inner);
        contexts.get(symbol).copied().unwrap_or(self.fallback)
    }
}

#[async_trait]
impl MarketDataPort for StaticMarketData {
    async fn volatility_index(&self, symbol: &Symbol) -> Result<Option<f64>, MarketDataError> {
        Ok(self.context(symbol).volatility_index())
    }

    async fn vol_of_vol(&self, symbol: &Symbol) -> Result<Option<f64>, MarketDataError> {
        Ok(self.context(symbol).vol_of_vol())
    }
}
