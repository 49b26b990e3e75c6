//! Dealer-Sign Estimation
//!
//! Infers, per contract, whether dealers are net long or short. Rows that
//! already carry a sign keep it; the rest are assigned by a configurable
//! [`DealerSignConvention`]. Every convention is a heuristic about who sits on
//! the other side of customer flow, not an observed market fact, which is why
//! the convention in use is always reported alongside the output.

mod estimator;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub use estimator::{DealerSignEstimator, DealerSignStats};

/// Dealer position direction on a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum DealerSign {
    /// Dealers are net short (−1).
    Short,
    /// No dealer view (0).
    Flat,
    /// Dealers are net long (+1).
    Long,
}

impl DealerSign {
    /// Numeric value (−1, 0, +1).
    #[must_use]
    pub const fn as_i8(self) -> i8 {
        match self {
            Self::Short => -1,
            Self::Flat => 0,
            Self::Long => 1,
        }
    }

    /// Numeric value as a float multiplier.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Short => -1.0,
            Self::Flat => 0.0,
            Self::Long => 1.0,
        }
    }

    /// Sign of a float, with zero (and NaN) mapping to `Flat`.
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Long
        } else if value < 0.0 {
            Self::Short
        } else {
            Self::Flat
        }
    }
}

impl TryFrom<i8> for DealerSign {
    type Error = EngineError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Short),
            0 => Ok(Self::Flat),
            1 => Ok(Self::Long),
            other => Err(EngineError::invalid_contract(
                "dealer_sign",
                format!("must be -1, 0 or 1, got {other}"),
            )),
        }
    }
}

impl From<DealerSign> for i8 {
    fn from(sign: DealerSign) -> Self {
        sign.as_i8()
    }
}

/// Heuristic used for rows without an explicit dealer sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealerSignConvention {
    /// Dealers short OTM calls (strike ≥ spot) and OTM puts (strike ≤ spot),
    /// long the in-the-money side. Dealers as convexity providers to retail.
    #[default]
    ShortOtm,
    /// Dealers long every call, short every put.
    LongCallsShortPuts,
    /// Dealers short every contract.
    AllShort,
    /// Dealers long every contract.
    AllLong,
    /// Dealers short wherever customer open interest concentrates: contracts
    /// at or above their option type's mean open interest.
    OpenInterestConcentration,
}

impl DealerSignConvention {
    /// Stable name recorded in output metadata.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShortOtm => "short_otm",
            Self::LongCallsShortPuts => "long_calls_short_puts",
            Self::AllShort => "all_short",
            Self::AllLong => "all_long",
            Self::OpenInterestConcentration => "open_interest_concentration",
        }
    }
}

impl std::fmt::Display for DealerSignConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dealer_sign_try_from() {
        assert_eq!(DealerSign::try_from(-1).unwrap(), DealerSign::Short);
        assert_eq!(DealerSign::try_from(0).unwrap(), DealerSign::Flat);
        assert_eq!(DealerSign::try_from(1).unwrap(), DealerSign::Long);
        assert!(DealerSign::try_from(2).is_err());
    }

    #[test]
    fn dealer_sign_of_float() {
        assert_eq!(DealerSign::of(-3.5), DealerSign::Short);
        assert_eq!(DealerSign::of(0.0), DealerSign::Flat);
        assert_eq!(DealerSign::of(f64::NAN), DealerSign::Flat);
        assert_eq!(DealerSign::of(1e-12), DealerSign::Long);
    }

    #[test]
    fn dealer_sign_serde_as_integer() {
        let json = serde_json::to_string(&DealerSign::Short).unwrap();
        assert_eq!(json, "-1");
        let parsed: DealerSign = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, DealerSign::Long);
        assert!(serde_json::from_str::<DealerSign>("5").is_err());
    }

    #[test]
    fn convention_serde_snake_case() {
        let parsed: DealerSignConvention =
            serde_json::from_str("\"open_interest_concentration\"").unwrap();
        assert_eq!(parsed, DealerSignConvention::OpenInterestConcentration);
        assert_eq!(DealerSignConvention::default().as_str(), "short_otm");
    }
}
