//! Market Data Adapters
//!
//! Implementations of `MarketDataPort`.

pub mod static_source;

pub use static_source::StaticMarketData;
