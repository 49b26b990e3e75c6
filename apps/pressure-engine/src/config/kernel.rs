//! Green's kernel and liquidity profile configuration.

use serde::{Deserialize, Serialize};

use crate::domain::kernel::LiquidityProfileKind;

/// Kernel solve configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Impact-screening parameter κ (dimensionless, > 0).
    #[serde(default = "default_kappa")]
    pub kappa: f64,
    /// Relative tolerance under which a liquidity profile counts as uniform.
    #[serde(default = "default_uniform_tolerance")]
    pub uniform_tolerance: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            kappa: default_kappa(),
            uniform_tolerance: default_uniform_tolerance(),
        }
    }
}

/// Liquidity profile configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityConfig {
    /// How λ(x) is derived.
    #[serde(default)]
    pub profile: LiquidityProfileKind,
    /// Reference liquidity level λ₀.
    #[serde(default = "default_base_lambda")]
    pub base_lambda: f64,
    /// Minimum fraction of λ₀ any bin keeps in the volume-weighted profile.
    #[serde(default = "default_floor_ratio")]
    pub floor_ratio: f64,
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            profile: LiquidityProfileKind::default(),
            base_lambda: default_base_lambda(),
            floor_ratio: default_floor_ratio(),
        }
    }
}

const fn default_kappa() -> f64 {
    1.0
}

const fn default_uniform_tolerance() -> f64 {
    1e-9
}

const fn default_base_lambda() -> f64 {
    1.0
}

const fn default_floor_ratio() -> f64 {
    0.1
}
