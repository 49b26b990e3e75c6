//! Engine output model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::regime::{GammaRegime, RegimeLabel};
use crate::domain::shared::{Symbol, Timestamp};

/// Output kind tag.
pub const OUTPUT_KIND: &str = "dealer_hedge_pressure";

/// Metadata key flagging a degraded snapshot.
pub const DEGRADED_KEY: &str = "degraded";

/// Reason recorded when no row survived normalization.
pub const DEGRADED_MISSING_GREEKS: &str = "missing_greeks";

/// Every feature key, present in every output.
pub const FEATURE_KEYS: [&str; 26] = [
    "gamma_pressure",
    "vanna_pressure",
    "charm_pressure",
    "dealer_gamma_sign",
    "pressure_up",
    "pressure_down",
    "net_pressure",
    "elasticity_up",
    "elasticity_down",
    "movement_energy_up",
    "movement_energy_down",
    "energy_asymmetry",
    "psi_up",
    "psi_down",
    "potential_at_spot",
    "potential_slope",
    "potential_curvature",
    "curvature_acceleration",
    "vol_of_vol",
    "weighted_dte",
    "gamma_flip_moneyness",
    "gamma_peak_moneyness",
    "gamma_trough_moneyness",
    "rows_total",
    "rows_used",
    "rows_binned",
];

/// Result of one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    /// Always [`OUTPUT_KIND`].
    pub kind: String,
    /// Underlying symbol.
    pub symbol: Symbol,
    /// Snapshot time.
    pub timestamp: Timestamp,
    /// Named scalar features.
    pub features: BTreeMap<String, f64>,
    /// Minimum per-dimension confidence.
    pub confidence: f64,
    /// Top-level regime (the gamma dimension).
    pub regime: GammaRegime,
    /// Every regime dimension with its confidence.
    pub regimes: RegimeLabel,
    /// String annotations: convention, kernel branch, per-dimension labels.
    pub metadata: BTreeMap<String, String>,
}

impl EngineOutput {
    /// Output for a snapshot with no usable rows.
    ///
    /// Identical for every symbol and time apart from those two fields.
    #[must_use]
    pub fn degraded(symbol: Symbol, timestamp: Timestamp, reason: &str) -> Self {
        let features = FEATURE_KEYS.iter().map(|k| ((*k).to_string(), 0.0)).collect();
        let regimes = RegimeLabel::degraded();

        let mut metadata = BTreeMap::new();
        metadata.insert(DEGRADED_KEY.to_string(), reason.to_string());
        insert_regime_metadata(&mut metadata, &regimes);

        Self {
            kind: OUTPUT_KIND.to_string(),
            symbol,
            timestamp,
            features,
            confidence: 0.0,
            regime: regimes.gamma.label,
            regimes,
            metadata,
        }
    }

    /// Whether this output is degraded.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.metadata.contains_key(DEGRADED_KEY)
    }

    /// Feature value by key.
    #[must_use]
    pub fn feature(&self, key: &str) -> Option<f64> {
        self.features.get(key).copied()
    }
}

/// Record `regime.<dim>` and `confidence.<dim>` for every dimension.
pub(crate) fn insert_regime_metadata(metadata: &mut BTreeMap<String, String>, regimes: &RegimeLabel) {
    for (dimension, label, confidence) in regimes.dimensions() {
        metadata.insert(format!("regime.{dimension}"), label.to_string());
        metadata.insert(format!("confidence.{dimension}"), format!("{confidence:.4}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_output_has_every_feature_at_zero() {
        let out = EngineOutput::degraded(
            Symbol::new("SPY"),
            Timestamp::parse("2026-01-21T15:00:00Z").unwrap(),
            DEGRADED_MISSING_GREEKS,
        );
        assert_eq!(out.kind, OUTPUT_KIND);
        assert_eq!(out.confidence, 0.0);
        assert_eq!(out.regime, GammaRegime::Neutral);
        assert!(out.is_degraded());
        assert_eq!(out.metadata[DEGRADED_KEY], "missing_greeks");
        assert_eq!(out.features.len(), FEATURE_KEYS.len());
        assert!(out.features.values().all(|v| *v == 0.0));
        assert_eq!(out.metadata["regime.jump_risk_regime"], "continuous");
    }

    #[test]
    fn output_serializes_to_json() {
        let out = EngineOutput::degraded(Symbol::new("QQQ"), Timestamp::now(), DEGRADED_MISSING_GREEKS);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["kind"], "dealer_hedge_pressure");
        assert_eq!(json["regime"], "neutral");
        assert_eq!(json["metadata"]["degraded"], "missing_greeks");
        assert_eq!(json["features"]["net_pressure"], 0.0);

        let back: EngineOutput = serde_json::from_value(json).unwrap();
        assert_eq!(back, out);
    }
}
