//! Infrastructure Layer
//!
//! Adapters implementing the ports defined in the application layer:
//!
//! - `chain_source/`: in-memory and JSON-file option chain sources
//! - `market_data/`: host-supplied market context
//!
//! Live vendor feeds are left to the host; anything implementing the ports
//! plugs into the use case.

pub mod chain_source;
pub mod market_data;

pub use chain_source::{InMemoryChainSource, JsonFileChainSource};
pub use market_data::StaticMarketData;
