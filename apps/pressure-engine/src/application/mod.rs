//! Application Layer
//!
//! The application layer feeds the engine from external systems.
//! It defines:
//!
//! - **Ports**: Interfaces for chain and market data sources
//! - **Use Cases**: Fetch, analyze and report

pub mod ports;
pub mod use_cases;

pub use ports::*;
pub use use_cases::*;
