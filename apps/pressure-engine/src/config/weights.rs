//! Field aggregation weights.

use serde::{Deserialize, Serialize};

/// Scalar weights `{α_gamma, α_vanna, α_charm}` for combining the Greek fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregationWeights {
    /// Gamma field weight.
    #[serde(default = "default_weight")]
    pub gamma: f64,
    /// Vanna field weight.
    #[serde(default = "default_weight")]
    pub vanna: f64,
    /// Charm field weight.
    #[serde(default = "default_weight")]
    pub charm: f64,
}

impl Default for AggregationWeights {
    fn default() -> Self {
        Self {
            gamma: default_weight(),
            vanna: default_weight(),
            charm: default_weight(),
        }
    }
}

const fn default_weight() -> f64 {
    1.0
}
