// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Pressure Engine - Rust Core Library
//!
//! Dealer hedge-pressure field engine for the Cream trading system.
//!
//! Turns an option chain snapshot into a pressure field over standardized
//! log-moneyness, then reads directional elasticity, movement energy and
//! regime labels off that field.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure, synchronous computation
//!   - `chain`: raw rows, validation, normalization
//!   - `dealer_sign`: dealer position heuristics
//!   - `field`: moneyness grid and binned dollar exposures
//!   - `kernel`: liquidity profile, Green's kernel, kernel cache
//!   - `potential`: FFT convolution and shape diagnostics
//!   - `elasticity`: directional resistance and movement energy
//!   - `regime`: five-dimension regime classification
//!   - `engine`: orchestration and the output record
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: `ChainSourcePort`, `MarketDataPort`
//!   - `use_cases`: `AnalyzeHedgePressure`
//!
//! - **Infrastructure**: Adapters
//!   - `chain_source`: in-memory and JSON-file sources
//!   - `market_data`: host-supplied market context
//!
//! # Example
//!
//! ```rust,ignore
//! use pressure_engine::{EngineConfig, HedgePressureEngine, MarketContext};
//!
//! let engine = HedgePressureEngine::new(EngineConfig::default())?;
//! let output = engine.analyze(&snapshot, &MarketContext::with_volatility_index(18.0))?;
//! println!("{} {:.2}", output.regime, output.confidence);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core computation with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Engine error taxonomy.
pub mod error;

/// Metrics instrumentation.
pub mod observability;

/// Logging setup for embedding hosts.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::chain::{ChainSnapshot, MarketContext, OptionType, RawChainRow};
pub use domain::dealer_sign::{DealerSign, DealerSignConvention};
pub use domain::engine::{EngineOutput, FEATURE_KEYS, HedgePressureEngine};
pub use domain::kernel::KernelCache;
pub use domain::regime::{
    CharmRegime, GammaRegime, JumpRiskRegime, PotentialShape, RegimeLabel, VannaRegime,
};
pub use domain::shared::{Symbol, Timestamp};

// Application re-exports
pub use application::ports::{ChainSourceError, ChainSourcePort, MarketDataError, MarketDataPort};
pub use application::use_cases::{AnalyzeError, AnalyzeHedgePressureUseCase};

// Infrastructure re-exports
pub use infrastructure::{InMemoryChainSource, JsonFileChainSource, StaticMarketData};

// Cross-cutting re-exports
pub use config::{ConfigError, EngineConfig, load_config, load_config_from_string};
pub use error::{EngineError, ErrorCode, ErrorKind};
pub use telemetry::{TelemetryError, init_tracing};
