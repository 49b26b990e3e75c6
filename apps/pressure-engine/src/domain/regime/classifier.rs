//! Threshold-based regime classification.
//!
//! Every dimension is decided independently from scalar outputs. Confidence
//! grows with the relative distance to the nearest decision boundary:
//! `0.5 + 0.5·min(1, |x − b| / b)`, scaled by data quality and, when a
//! needed external input is missing, by the configured penalty.

use serde::Serialize;

use super::labels::{
    CharmRegime, Classified, GammaRegime, JumpRiskRegime, PotentialShape, RegimeLabel, VannaRegime,
};
use crate::config::RegimeConfig;

/// Scalar outputs the classifier reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RegimeInputs {
    /// Σ gamma dollar exposure.
    pub gamma_pressure: f64,
    /// Σ vanna dollar exposure.
    pub vanna_pressure: f64,
    /// Σ charm dollar exposure (per minute).
    pub charm_pressure: f64,
    /// Gamma exposure above spot.
    pub gamma_up: f64,
    /// Gamma exposure below spot.
    pub gamma_down: f64,
    /// Open-interest weighted days to expiry.
    pub weighted_dte: f64,
    /// Vol-of-vol estimate.
    pub vol_of_vol: f64,
    /// External volatility index, when available.
    pub volatility_index: Option<f64>,
    /// Normalized |Φ‴| at spot.
    pub curvature_acceleration: f64,
    /// Kept rows / total rows.
    pub data_quality: f64,
}

impl RegimeInputs {
    /// `|Γ_up − Γ_down| / (|Γ_up| + |Γ_down|)`, 0 without gamma.
    #[must_use]
    pub fn gamma_asymmetry(&self) -> f64 {
        let gross = self.gamma_up.abs() + self.gamma_down.abs();
        if gross > 0.0 {
            (self.gamma_up - self.gamma_down).abs() / gross
        } else {
            0.0
        }
    }
}

/// Classifies every regime dimension.
#[derive(Debug, Clone)]
pub struct RegimeClassifier {
    config: RegimeConfig,
}

/// `0.5 + 0.5·min(1, d)` for the smallest relative distance `d` of any
/// `(value, boundary)` pair; 1 when no positive boundary applies.
fn margin_confidence(pairs: &[(f64, f64)]) -> f64 {
    let nearest = pairs
        .iter()
        .filter(|(_, boundary)| *boundary > 0.0)
        .map(|(value, boundary)| (value - boundary).abs() / boundary)
        .fold(f64::INFINITY, f64::min);
    if nearest.is_finite() {
        0.5 + 0.5 * nearest.min(1.0)
    } else {
        1.0
    }
}

fn scaled<L>(classified: Classified<L>, quality: f64) -> Classified<L> {
    Classified::new(classified.label, classified.confidence * quality)
}

impl RegimeClassifier {
    /// Create a classifier.
    #[must_use]
    pub const fn new(config: RegimeConfig) -> Self {
        Self { config }
    }

    /// Classify every dimension.
    #[must_use]
    pub fn classify(&self, inputs: &RegimeInputs) -> RegimeLabel {
        let quality = inputs.data_quality.clamp(0.0, 1.0);

        RegimeLabel {
            gamma: scaled(self.gamma(inputs), quality),
            vanna: scaled(self.vanna(inputs), quality),
            charm: scaled(self.charm(inputs), quality),
            jump_risk: scaled(self.jump_risk(inputs), quality),
            potential_shape: scaled(self.potential_shape(inputs), quality),
        }
    }

    /// Gamma regime.
    #[must_use]
    pub fn gamma(&self, inputs: &RegimeInputs) -> Classified<GammaRegime> {
        let t = &self.config.gamma;
        let g = inputs.gamma_pressure;
        let magnitude = g.abs();

        let label = if magnitude >= t.high_magnitude {
            if g < 0.0 {
                GammaRegime::ShortSqueeze
            } else {
                GammaRegime::LongCompression
            }
        } else if g < 0.0 && magnitude >= t.neutral_band {
            GammaRegime::LowExpansion
        } else {
            GammaRegime::Neutral
        };

        let confidence = if g < 0.0 {
            margin_confidence(&[(magnitude, t.high_magnitude), (magnitude, t.neutral_band)])
        } else {
            margin_confidence(&[(magnitude, t.high_magnitude)])
        };
        Classified::new(label, confidence)
    }

    /// Vanna regime.
    #[must_use]
    pub fn vanna(&self, inputs: &RegimeInputs) -> Classified<VannaRegime> {
        let t = &self.config.vanna;
        let magnitude = inputs.vanna_pressure.abs();
        let magnitude_confidence = margin_confidence(&[(magnitude, t.magnitude)]);

        if magnitude < t.magnitude {
            return Classified::new(VannaRegime::Neutral, magnitude_confidence);
        }

        match inputs.volatility_index {
            Some(vix) => {
                let label = if vix >= t.vix_high {
                    VannaRegime::HighVol
                } else if vix <= t.vix_low {
                    VannaRegime::LowVol
                } else {
                    VannaRegime::Flow
                };
                let vix_confidence = margin_confidence(&[(vix, t.vix_high), (vix, t.vix_low)]);
                Classified::new(label, magnitude_confidence.min(vix_confidence))
            }
            None => Classified::new(
                VannaRegime::Flow,
                magnitude_confidence * self.config.missing_input_penalty,
            ),
        }
    }

    /// Charm regime.
    #[must_use]
    pub fn charm(&self, inputs: &RegimeInputs) -> Classified<CharmRegime> {
        let t = &self.config.charm;
        let magnitude = inputs.charm_pressure.abs();
        let magnitude_confidence = margin_confidence(&[(magnitude, t.magnitude)]);

        if magnitude < t.magnitude {
            return Classified::new(CharmRegime::Neutral, magnitude_confidence);
        }

        let label = if inputs.weighted_dte <= t.acceleration_dte {
            CharmRegime::DecayAcceleration
        } else {
            CharmRegime::DecayDominant
        };
        let dte_confidence = margin_confidence(&[(inputs.weighted_dte, t.acceleration_dte)]);
        Classified::new(label, magnitude_confidence.min(dte_confidence))
    }

    /// Mean of the available saturated components.
    #[must_use]
    pub fn jump_score(&self, inputs: &RegimeInputs) -> f64 {
        let t = &self.config.jump;
        let saturate = |value: f64, high: f64| (value.max(0.0) / high).min(1.0);

        let mut components = vec![
            saturate(inputs.vol_of_vol, t.vol_of_vol_high),
            saturate(inputs.curvature_acceleration, t.curvature_acceleration_high),
        ];
        if let Some(vix) = inputs.volatility_index {
            components.push(saturate(vix, t.vix_high));
        }
        components.iter().sum::<f64>() / components.len() as f64
    }

    /// Jump-risk regime.
    #[must_use]
    pub fn jump_risk(&self, inputs: &RegimeInputs) -> Classified<JumpRiskRegime> {
        let t = &self.config.jump;
        let score = self.jump_score(inputs);

        let label = if score >= t.high_score {
            JumpRiskRegime::High
        } else if score >= t.moderate_score {
            JumpRiskRegime::Moderate
        } else {
            JumpRiskRegime::Continuous
        };

        let mut confidence = margin_confidence(&[(score, t.high_score), (score, t.moderate_score)]);
        if inputs.volatility_index.is_none() {
            confidence *= self.config.missing_input_penalty;
        }
        Classified::new(label, confidence)
    }

    /// Potential shape. Rules are checked from most to least structured.
    #[must_use]
    pub fn potential_shape(&self, inputs: &RegimeInputs) -> Classified<PotentialShape> {
        let shape = &self.config.shape;
        let band = self.config.gamma.neutral_band;
        let vanna_magnitude = self.config.vanna.magnitude;

        let g = inputs.gamma_pressure;
        let gamma = g.abs();
        let vanna = inputs.vanna_pressure.abs();
        let asymmetry = inputs.gamma_asymmetry();

        let (label, pairs) =
            if gamma >= shape.gamma_extreme && vanna >= shape.vanna_extreme {
                (
                    PotentialShape::Quartic,
                    [(gamma, shape.gamma_extreme), (vanna, shape.vanna_extreme)],
                )
            } else if vanna >= vanna_magnitude && g < 0.0 && gamma >= band {
                (
                    PotentialShape::DoubleWell,
                    [(vanna, vanna_magnitude), (gamma, band)],
                )
            } else if gamma >= band && asymmetry >= shape.asymmetry {
                (
                    PotentialShape::Cubic,
                    [(gamma, band), (asymmetry, shape.asymmetry)],
                )
            } else {
                (
                    PotentialShape::Quadratic,
                    [(gamma, band), (asymmetry, shape.asymmetry)],
                )
            };

        Classified::new(label, margin_confidence(&pairs))
    }
}
