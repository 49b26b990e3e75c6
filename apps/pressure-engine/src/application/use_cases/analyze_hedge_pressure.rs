//! Analyze Hedge Pressure Use Case

use std::sync::Arc;

use crate::application::ports::{ChainSourceError, ChainSourcePort, MarketDataPort};
use crate::domain::chain::{ChainSnapshot, MarketContext};
use crate::domain::engine::{EngineOutput, HedgePressureEngine};
use crate::domain::kernel::KernelCache;
use crate::domain::shared::Symbol;
use crate::error::EngineError;

/// Errors from the analyze use case.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// The chain could not be loaded.
    #[error(transparent)]
    ChainSource(#[from] ChainSourceError),

    /// The engine rejected or failed on the snapshot.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The blocking compute task did not complete.
    #[error("Analysis task failed: {0}")]
    TaskFailed(String),
}

/// Use case: fetch a chain and its market context, then run the engine.
///
/// Market data is best effort. A failing provider is logged and the
/// snapshot is analyzed without it.
pub struct AnalyzeHedgePressureUseCase<C, M>
where
    C: ChainSourcePort,
    M: MarketDataPort,
{
    chain_source: Arc<C>,
    market_data: Arc<M>,
    engine: Arc<HedgePressureEngine>,
    kernel_cache: Option<Arc<KernelCache>>,
}

impl<C, M> AnalyzeHedgePressureUseCase<C, M>
where
    C: ChainSourcePort,
    M: MarketDataPort,
{
    /// Create a new AnalyzeHedgePressureUseCase.
    pub fn new(chain_source: Arc<C>, market_data: Arc<M>, engine: Arc<HedgePressureEngine>) -> Self {
        Self {
            chain_source,
            market_data,
            engine,
            kernel_cache: None,
        }
    }

    /// Reuse kernels from a pre-warmed cache.
    #[must_use]
    pub fn with_kernel_cache(mut self, cache: Arc<KernelCache>) -> Self {
        self.kernel_cache = Some(cache);
        self
    }

    /// Analyze the latest chain for `symbol`.
    pub async fn execute(&self, symbol: &Symbol) -> Result<EngineOutput, AnalyzeError> {
        // 1. Load the chain
        let snapshot = self.chain_source.fetch_chain(symbol).await?;

        // 2. Market context (best effort)
        let market = self.market_context(symbol).await;

        // 3. Compute off the async runtime
        let engine = Arc::clone(&self.engine);
        let cache = self.kernel_cache.clone();
        tokio::task::spawn_blocking(move || match cache {
            Some(cache) => engine.analyze_with_cache(&snapshot, &market, &cache),
            None => engine.analyze(&snapshot, &market),
        })
        .await
        .map_err(|e| AnalyzeError::TaskFailed(e.to_string()))?
        .map_err(AnalyzeError::from)
    }

    /// Analyze several symbols.
    ///
    /// Chains are fetched in order and computed together in parallel. Each
    /// symbol carries its own result.
    pub async fn execute_many(&self, symbols: &[Symbol]) -> Vec<(Symbol, Result<EngineOutput, AnalyzeError>)> {
        let mut results: Vec<(Symbol, Option<Result<EngineOutput, AnalyzeError>>)> = Vec::with_capacity(symbols.len());
        let mut jobs: Vec<(ChainSnapshot, MarketContext)> = Vec::new();

        for symbol in symbols {
            match self.chain_source.fetch_chain(symbol).await {
                Ok(snapshot) => {
                    let market = self.market_context(symbol).await;
                    jobs.push((snapshot, market));
                    results.push((symbol.clone(), None));
                }
                Err(e) => results.push((symbol.clone(), Some(Err(e.into())))),
            }
        }

        let engine = Arc::clone(&self.engine);
        let cache = self.kernel_cache.clone();
        let computed = tokio::task::spawn_blocking(move || match cache {
            Some(cache) => engine.analyze_batch_with_cache(&jobs, &cache),
            None => engine.analyze_batch(&jobs),
        })
        .await;

        let mut computed = match computed {
            Ok(outputs) => outputs.into_iter(),
            Err(e) => {
                let message = e.to_string();
                return results
                    .into_iter()
                    .map(|(symbol, slot)| {
                        let result = slot.unwrap_or_else(|| Err(AnalyzeError::TaskFailed(message.clone())));
                        (symbol, result)
                    })
                    .collect();
            }
        };

        results
            .into_iter()
            .map(|(symbol, slot)| {
                let result = slot.unwrap_or_else(|| match computed.next() {
                    Some(output) => output.map_err(AnalyzeError::from),
                    None => Err(AnalyzeError::TaskFailed("missing batch result".to_string())),
                });
                (symbol, result)
            })
            .collect()
    }

    async fn market_context(&self, symbol: &Symbol) -> MarketContext {
        let volatility_index = match self.market_data.volatility_index(symbol).await {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Volatility index unavailable");
                None
            }
        };
        let vol_of_vol = match self.market_data.vol_of_vol(symbol).await {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Vol-of-vol unavailable");
                None
            }
        };
        MarketContext {
            volatility_index,
            vol_of_vol,
        }
    }
}
