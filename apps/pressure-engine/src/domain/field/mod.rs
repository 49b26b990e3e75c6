//! Greek Field Aggregation
//!
//! Dollar exposures of gamma, vanna and charm placed on a normalized
//! log-moneyness grid `m = ln(K/S) / (σ√τ)`.

mod aggregator;
mod exposure;
mod grid;

pub use aggregator::{AggregatedFields, FieldAggregator};
pub use exposure::{DollarExposure, dollar_exposure};
pub use grid::{FieldVector, SpatialGrid};
