//! Regime classification thresholds.
//!
//! Dollar thresholds are in the same units as the aggregated pressures
//! (gamma: `$·S²`, vanna: `$·S`, charm: `$·S` per minute).

use serde::{Deserialize, Serialize};

/// All regime thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeConfig {
    /// Gamma dimension.
    #[serde(default)]
    pub gamma: GammaThresholds,
    /// Vanna dimension.
    #[serde(default)]
    pub vanna: VannaThresholds,
    /// Charm dimension.
    #[serde(default)]
    pub charm: CharmThresholds,
    /// Jump-risk dimension.
    #[serde(default)]
    pub jump: JumpRiskThresholds,
    /// Potential-shape dimension.
    #[serde(default)]
    pub shape: ShapeThresholds,
    /// Confidence multiplier for dimensions whose external input is missing.
    #[serde(default = "default_missing_input_penalty")]
    pub missing_input_penalty: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            gamma: GammaThresholds::default(),
            vanna: VannaThresholds::default(),
            charm: CharmThresholds::default(),
            jump: JumpRiskThresholds::default(),
            shape: ShapeThresholds::default(),
            missing_input_penalty: default_missing_input_penalty(),
        }
    }
}

/// Gamma regime thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GammaThresholds {
    /// |gamma_pressure| at or above which the regime is squeeze/compression.
    #[serde(default = "default_gamma_high")]
    pub high_magnitude: f64,
    /// |gamma_pressure| below which gamma is treated as neutral.
    #[serde(default = "default_gamma_band")]
    pub neutral_band: f64,
}

impl Default for GammaThresholds {
    fn default() -> Self {
        Self {
            high_magnitude: default_gamma_high(),
            neutral_band: default_gamma_band(),
        }
    }
}

/// Vanna regime thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VannaThresholds {
    /// |vanna_pressure| at or above which vanna is a driver.
    #[serde(default = "default_vanna_magnitude")]
    pub magnitude: f64,
    /// Volatility index level at or above which vol is high.
    #[serde(default = "default_vanna_vix_high")]
    pub vix_high: f64,
    /// Volatility index level at or below which vol is low.
    #[serde(default = "default_vanna_vix_low")]
    pub vix_low: f64,
}

impl Default for VannaThresholds {
    fn default() -> Self {
        Self {
            magnitude: default_vanna_magnitude(),
            vix_high: default_vanna_vix_high(),
            vix_low: default_vanna_vix_low(),
        }
    }
}

/// Charm regime thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharmThresholds {
    /// |charm_pressure| at or above which charm is a driver.
    #[serde(default = "default_charm_magnitude")]
    pub magnitude: f64,
    /// Open-interest weighted days to expiry at or below which decay accelerates.
    #[serde(default = "default_acceleration_dte")]
    pub acceleration_dte: f64,
}

impl Default for CharmThresholds {
    fn default() -> Self {
        Self {
            magnitude: default_charm_magnitude(),
            acceleration_dte: default_acceleration_dte(),
        }
    }
}

/// Jump-risk thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpRiskThresholds {
    /// Vol-of-vol level that saturates its score component.
    #[serde(default = "default_vol_of_vol_high")]
    pub vol_of_vol_high: f64,
    /// Volatility index level that saturates its score component.
    #[serde(default = "default_jump_vix_high")]
    pub vix_high: f64,
    /// Normalized |Φ‴| at spot that saturates its score component.
    #[serde(default = "default_curvature_acceleration_high")]
    pub curvature_acceleration_high: f64,
    /// Score at or above which jump risk is high.
    #[serde(default = "default_high_score")]
    pub high_score: f64,
    /// Score at or above which jump risk is moderate.
    #[serde(default = "default_moderate_score")]
    pub moderate_score: f64,
}

impl Default for JumpRiskThresholds {
    fn default() -> Self {
        Self {
            vol_of_vol_high: default_vol_of_vol_high(),
            vix_high: default_jump_vix_high(),
            curvature_acceleration_high: default_curvature_acceleration_high(),
            high_score: default_high_score(),
            moderate_score: default_moderate_score(),
        }
    }
}

/// Potential-shape thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeThresholds {
    /// |gamma_pressure| counted as extreme.
    #[serde(default = "default_gamma_extreme")]
    pub gamma_extreme: f64,
    /// |vanna_pressure| counted as extreme.
    #[serde(default = "default_vanna_extreme")]
    pub vanna_extreme: f64,
    /// Up/down gamma asymmetry ratio at or above which the shape is cubic.
    #[serde(default = "default_asymmetry")]
    pub asymmetry: f64,
}

impl Default for ShapeThresholds {
    fn default() -> Self {
        Self {
            gamma_extreme: default_gamma_extreme(),
            vanna_extreme: default_vanna_extreme(),
            asymmetry: default_asymmetry(),
        }
    }
}

const fn default_missing_input_penalty() -> f64 {
    0.5
}

const fn default_gamma_high() -> f64 {
    1e10
}

const fn default_gamma_band() -> f64 {
    1e7
}

const fn default_vanna_magnitude() -> f64 {
    5e8
}

const fn default_vanna_vix_high() -> f64 {
    25.0
}

const fn default_vanna_vix_low() -> f64 {
    15.0
}

const fn default_charm_magnitude() -> f64 {
    1e5
}

const fn default_acceleration_dte() -> f64 {
    2.0
}

const fn default_vol_of_vol_high() -> f64 {
    0.5
}

const fn default_jump_vix_high() -> f64 {
    35.0
}

const fn default_curvature_acceleration_high() -> f64 {
    5.0
}

const fn default_high_score() -> f64 {
    0.75
}

const fn default_moderate_score() -> f64 {
    0.4
}

const fn default_gamma_extreme() -> f64 {
    1e11
}

const fn default_vanna_extreme() -> f64 {
    1e10
}

const fn default_asymmetry() -> f64 {
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_empty_yaml() {
        let parsed: RegimeConfig = serde_yaml_bw::from_str("{}").unwrap();
        assert_eq!(RegimeConfig::default(), parsed);
        assert!((RegimeConfig::default().missing_input_penalty - 0.5).abs() < f64::EPSILON);
    }
}
