//! Engine
//!
//! Orchestrates one snapshot through the full pipeline and assembles the
//! output record.

mod output;
mod service;

pub use output::{DEGRADED_KEY, DEGRADED_MISSING_GREEKS, EngineOutput, FEATURE_KEYS, OUTPUT_KIND};
pub use service::HedgePressureEngine;
