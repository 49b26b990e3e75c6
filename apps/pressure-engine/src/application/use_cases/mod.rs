//! Application Use Cases
//!
//! Use cases orchestrate ports and the engine to fulfill application requirements.

mod analyze_hedge_pressure;

pub use analyze_hedge_pressure::{AnalyzeError, AnalyzeHedgePressureUseCase};
