//! Liquidity profile λ(x) over the grid.

use serde::{Deserialize, Serialize};

use crate::config::LiquidityConfig;
use crate::domain::field::FieldVector;
use crate::error::EngineError;

/// How the liquidity profile is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityProfileKind {
    /// Constant `base_lambda` everywhere.
    #[default]
    Uniform,
    /// Scaled by option volume binned on the grid.
    VolumeWeighted,
}

impl LiquidityProfileKind {
    /// Stable name recorded in output metadata.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::VolumeWeighted => "volume_weighted",
        }
    }
}

/// Strictly positive, finite liquidity per grid point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LiquidityProfile(Vec<f64>);

impl LiquidityProfile {
    /// Validate and wrap explicit values.
    ///
    /// # Errors
    ///
    /// `InvalidLiquidityProfile` when empty or any value is non-positive or
    /// non-finite.
    pub fn new(values: Vec<f64>) -> Result<Self, EngineError> {
        if values.is_empty() {
            return Err(EngineError::InvalidLiquidityProfile {
                message: "profile is empty".to_string(),
            });
        }
        if let Some((i, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(EngineError::InvalidLiquidityProfile {
                message: format!("λ[{i}] = {v} must be finite and positive"),
            });
        }
        Ok(Self(values))
    }

    /// Constant profile.
    ///
    /// # Errors
    ///
    /// `InvalidLiquidityProfile` when `len == 0` or `lambda` is not positive.
    pub fn uniform(len: usize, lambda: f64) -> Result<Self, EngineError> {
        Self::new(vec![lambda; len])
    }

    /// Profile for `config`, using `volume` binned on the grid when the
    /// profile is volume weighted.
    ///
    /// `λᵢ = base × (floor + (1 − floor) × vᵢ / max v)`; falls back to uniform
    /// when no volume was binned.
    ///
    /// # Errors
    ///
    /// `InvalidLiquidityProfile` when the resulting values are invalid.
    pub fn from_config(config: &LiquidityConfig, volume: &FieldVector) -> Result<Self, EngineError> {
        let base = config.base_lambda;
        match config.profile {
            LiquidityProfileKind::Uniform => Self::uniform(volume.len(), base),
            LiquidityProfileKind::VolumeWeighted => {
                let max_volume = volume.iter().fold(0.0_f64, |acc, v| acc.max(*v));
                if max_volume <= 0.0 {
                    return Self::uniform(volume.len(), base);
                }
                let floor = config.floor_ratio;
                Self::new(
                    volume
                        .iter()
                        .map(|v| base * (floor + (1.0 - floor) * v.max(0.0) / max_volume))
                        .collect(),
                )
            }
        }
    }

    /// Values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed profile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether all values agree within relative tolerance `tol`.
    #[must_use]
    pub fn is_uniform(&self, tol: f64) -> bool {
        let (lo, hi) = self
            .0
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        hi - lo <= tol * hi.abs()
    }

    /// Mean λ over `range` of grid indices (0 for an empty range).
    #[must_use]
    pub fn mean_over(&self, range: std::ops::Range<usize>) -> f64 {
        let slice = self.0.get(range).unwrap_or(&[]);
        if slice.is_empty() {
            0.0
        } else {
            slice.iter().sum::<f64>() / slice.len() as f64
        }
    }

    /// Exact bit patterns of the values, used as a cache key.
    #[must_use]
    pub fn bit_pattern(&self) -> Vec<u64> {
        self.0.iter().map(|v| v.to_bits()).collect()
    }
}
