//! Hedge-multiplier coefficients for the elasticity model.

use serde::{Deserialize, Serialize};

/// Coefficients `{k₁, k₂, ε}` of the hedge multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElasticityConfig {
    /// k₁: stiffening per unit |Ψ| when dealers are long gamma.
    #[serde(default = "default_k_long")]
    pub k_long: f64,
    /// k₂: softening per unit |Ψ| when dealers are short gamma.
    #[serde(default = "default_k_short")]
    pub k_short: f64,
    /// ε: positive floor of the short-gamma multiplier.
    #[serde(default = "default_floor")]
    pub floor: f64,
}

impl Default for ElasticityConfig {
    fn default() -> Self {
        Self {
            k_long: default_k_long(),
            k_short: default_k_short(),
            floor: default_floor(),
        }
    }
}

const fn default_k_long() -> f64 {
    1.0
}

const fn default_k_short() -> f64 {
    0.8
}

const fn default_floor() -> f64 {
    0.05
}
