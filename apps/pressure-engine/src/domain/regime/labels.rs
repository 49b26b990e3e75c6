//! Regime vocabularies.

use serde::{Deserialize, Serialize};

macro_rules! regime_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[doc = concat!("`", $text, "`")]
                $variant,
            )+
        }

        impl $name {
            /// Stable label.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Baseline label used for degraded output.
            #[must_use]
            pub const fn baseline() -> Self {
                Self::$default
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

regime_enum! {
    /// Dealer gamma regime.
    GammaRegime, default = Neutral {
        ShortSqueeze => "short_squeeze",
        LongCompression => "long_compression",
        LowExpansion => "low_expansion",
        Neutral => "neutral",
    }
}

regime_enum! {
    /// Vanna regime.
    VannaRegime, default = Neutral {
        HighVol => "high_vol",
        LowVol => "low_vol",
        Flow => "flow",
        Neutral => "neutral",
    }
}

regime_enum! {
    /// Charm regime.
    CharmRegime, default = Neutral {
        DecayAcceleration => "decay_acceleration",
        DecayDominant => "decay_dominant",
        Neutral => "neutral",
    }
}

regime_enum! {
    /// Jump-risk regime.
    JumpRiskRegime, default = Continuous {
        High => "high",
        Moderate => "moderate",
        Continuous => "continuous",
    }
}

regime_enum! {
    /// Shape of the potential around spot.
    PotentialShape, default = Quadratic {
        Quadratic => "quadratic",
        Cubic => "cubic",
        DoubleWell => "double_well",
        Quartic => "quartic",
    }
}

/// A label with its confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classified<L> {
    /// Label.
    pub label: L,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

impl<L> Classified<L> {
    /// Pair a label with a confidence clamped to `[0, 1]`.
    pub fn new(label: L, confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { label, confidence }
    }
}

/// Every regime dimension for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeLabel {
    /// Gamma dimension.
    pub gamma: Classified<GammaRegime>,
    /// Vanna dimension.
    pub vanna: Classified<VannaRegime>,
    /// Charm dimension.
    pub charm: Classified<CharmRegime>,
    /// Jump-risk dimension.
    pub jump_risk: Classified<JumpRiskRegime>,
    /// Potential-shape dimension.
    pub potential_shape: Classified<PotentialShape>,
}

impl RegimeLabel {
    /// Baseline labels, zero confidence everywhere.
    #[must_use]
    pub fn degraded() -> Self {
        Self {
            gamma: Classified::new(GammaRegime::baseline(), 0.0),
            vanna: Classified::new(VannaRegime::baseline(), 0.0),
            charm: Classified::new(CharmRegime::baseline(), 0.0),
            jump_risk: Classified::new(JumpRiskRegime::baseline(), 0.0),
            potential_shape: Classified::new(PotentialShape::baseline(), 0.0),
        }
    }

    /// `(dimension, label, confidence)` for every dimension.
    #[must_use]
    pub fn dimensions(&self) -> [(&'static str, &'static str, f64); 5] {
        [
            ("gamma_regime", self.gamma.label.as_str(), self.gamma.confidence),
            ("vanna_regime", self.vanna.label.as_str(), self.vanna.confidence),
            ("charm_regime", self.charm.label.as_str(), self.charm.confidence),
            (
                "jump_risk_regime",
                self.jump_risk.label.as_str(),
                self.jump_risk.confidence,
            ),
            (
                "potential_shape",
                self.potential_shape.label.as_str(),
                self.potential_shape.confidence,
            ),
        ]
    }

    /// Lowest per-dimension confidence.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.dimensions()
            .iter()
            .map(|(_, _, c)| *c)
            .fold(1.0, f64::min)
    }
}
