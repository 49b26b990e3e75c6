//! Application Ports (Driven)
//!
//! Ports define how the application reaches external systems. The engine
//! itself never performs I/O; use cases fetch through these traits and hand
//! plain values to the domain.

mod chain_source_port;
mod market_data_port;

pub use chain_source_port::{ChainSourceError, ChainSourcePort};
pub use market_data_port::{MarketDataError, MarketDataPort};

#[cfg(test)]
pub use chain_source_port::MockChainSourcePort;
#[cfg(test)]
pub use market_data_port::MockMarketDataPort;
