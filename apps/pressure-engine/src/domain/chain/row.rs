//! Option chain rows: the adapter-facing raw row and the validated contract row.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::dealer_sign::DealerSign;
use crate::error::EngineError;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Call option.
    #[serde(alias = "C", alias = "CALL")]
    Call,
    /// Put option.
    #[serde(alias = "P", alias = "PUT")]
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// One row of an options-chain snapshot as delivered by a chain adapter.
///
/// Greeks are optional because vendors omit them; prices use `Decimal` as
/// they arrive from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChainRow {
    /// Option or underlying symbol as reported by the vendor.
    #[serde(default)]
    pub symbol: String,
    /// Underlying spot price.
    pub underlying_price: Decimal,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Vendor-reported days to expiry.
    #[serde(default)]
    pub dte: Option<f64>,
    /// Strike price.
    pub strike: Decimal,
    /// Call or put.
    #[serde(rename = "type")]
    pub option_type: OptionType,
    /// Mid price.
    #[serde(default)]
    pub mid_price: Option<Decimal>,
    /// Best bid.
    #[serde(default)]
    pub bid: Option<Decimal>,
    /// Best ask.
    #[serde(default)]
    pub ask: Option<Decimal>,
    /// Session volume in contracts.
    #[serde(default)]
    pub volume: i64,
    /// Open interest in contracts.
    #[serde(default)]
    pub open_interest: i64,
    /// Delta.
    #[serde(default)]
    pub delta: Option<f64>,
    /// Gamma.
    #[serde(default)]
    pub gamma: Option<f64>,
    /// Vega.
    #[serde(default)]
    pub vega: Option<f64>,
    /// Theta.
    #[serde(default)]
    pub theta: Option<f64>,
    /// Vanna (∂Δ/∂σ).
    #[serde(default)]
    pub vanna: Option<f64>,
    /// Charm (∂Δ/∂t), annualized.
    #[serde(default)]
    pub charm: Option<f64>,
    /// Implied volatility (annualized, 0.20 = 20%).
    #[serde(default)]
    pub implied_vol: Option<f64>,
    /// Contract multiplier.
    #[serde(default)]
    pub multiplier: Option<f64>,
    /// Explicit dealer sign (−1, 0, +1) when the vendor classifies trades.
    #[serde(default)]
    pub dealer_sign: Option<i8>,
}

/// Field values for constructing a [`ChainRow`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRowInput {
    /// Strike price.
    pub strike: f64,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Call or put.
    pub option_type: OptionType,
    /// Underlying spot price.
    pub underlying_price: f64,
    /// Implied volatility (0 when unknown).
    pub implied_vol: f64,
    /// Open interest in contracts.
    pub open_interest: f64,
    /// Session volume in contracts.
    pub volume: f64,
    /// Contract multiplier.
    pub multiplier: f64,
    /// Gamma.
    pub gamma: f64,
    /// Vanna.
    pub vanna: f64,
    /// Charm, annualized.
    pub charm: f64,
    /// Time to expiry in years.
    pub time_to_expiry: f64,
    /// Explicit dealer sign.
    pub dealer_sign: Option<DealerSign>,
}

/// A validated option contract row.
///
/// Construction enforces: strike, underlying and multiplier strictly
/// positive; open interest, volume, implied vol and time to expiry
/// non-negative; every numeric field finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainRow {
    strike: f64,
    expiry: NaiveDate,
    option_type: OptionType,
    underlying_price: f64,
    implied_vol: f64,
    open_interest: f64,
    volume: f64,
    multiplier: f64,
    gamma: f64,
    vanna: f64,
    charm: f64,
    time_to_expiry: f64,
    dealer_sign: Option<DealerSign>,
}

fn check_finite(value: f64, field: &str) -> Result<f64, EngineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::invalid_contract(field, "must be finite"))
    }
}

fn check_positive(value: f64, field: &str) -> Result<f64, EngineError> {
    if check_finite(value, field)? > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::invalid_contract(field, "must be positive"))
    }
}

fn check_non_negative(value: f64, field: &str) -> Result<f64, EngineError> {
    if check_finite(value, field)? >= 0.0 {
        Ok(value)
    } else {
        Err(EngineError::invalid_contract(field, "must be non-negative"))
    }
}

impl ChainRow {
    /// Create a validated row.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidContract` naming the first invalid field.
    pub fn new(input: ChainRowInput) -> Result<Self, EngineError> {
        Ok(Self {
            strike: check_positive(input.strike, "strike")?,
            expiry: input.expiry,
            option_type: input.option_type,
            underlying_price: check_positive(input.underlying_price, "underlying_price")?,
            implied_vol: check_non_negative(input.implied_vol, "implied_vol")?,
            open_interest: check_non_negative(input.open_interest, "open_interest")?,
            volume: check_non_negative(input.volume, "volume")?,
            multiplier: check_positive(input.multiplier, "multiplier")?,
            gamma: check_finite(input.gamma, "gamma")?,
            vanna: check_finite(input.vanna, "vanna")?,
            charm: check_finite(input.charm, "charm")?,
            time_to_expiry: check_non_negative(input.time_to_expiry, "time_to_expiry")?,
            dealer_sign: input.dealer_sign,
        })
    }

    /// Return a copy carrying the given dealer sign.
    #[must_use]
    pub fn with_dealer_sign(mut self, sign: DealerSign) -> Self {
        self.dealer_sign = Some(sign);
        self
    }

    /// Strike price.
    #[must_use]
    pub const fn strike(&self) -> f64 {
        self.strike
    }

    /// Expiration date.
    #[must_use]
    pub const fn expiry(&self) -> NaiveDate {
        self.expiry
    }

    /// Call or put.
    #[must_use]
    pub const fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Underlying spot price.
    #[must_use]
    pub const fn underlying_price(&self) -> f64 {
        self.underlying_price
    }

    /// Implied volatility.
    #[must_use]
    pub const fn implied_vol(&self) -> f64 {
        self.implied_vol
    }

    /// Open interest.
    #[must_use]
    pub const fn open_interest(&self) -> f64 {
        self.open_interest
    }

    /// Session volume.
    #[must_use]
    pub const fn volume(&self) -> f64 {
        self.volume
    }

    /// Contract multiplier.
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Gamma.
    #[must_use]
    pub const fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Vanna.
    #[must_use]
    pub const fn vanna(&self) -> f64 {
        self.vanna
    }

    /// Charm (annualized).
    #[must_use]
    pub const fn charm(&self) -> f64 {
        self.charm
    }

    /// Time to expiry in years.
    #[must_use]
    pub const fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    /// Dealer sign, once known.
    #[must_use]
    pub const fn dealer_sign(&self) -> Option<DealerSign> {
        self.dealer_sign
    }

    /// Whether the contract is out of the money relative to `spot`.
    ///
    /// At-the-money strikes count as OTM on both sides.
    #[must_use]
    pub fn is_otm(&self, spot: f64) -> bool {
        match self.option_type {
            OptionType::Call => self.strike >= spot,
            OptionType::Put => self.strike <= spot,
        }
    }

    /// Normalized log-moneyness `ln(K/S) / (σ√τ)`.
    ///
    /// Undefined (`None`) when `σ = 0` or `τ = 0`.
    #[must_use]
    pub fn standardized_moneyness(&self, spot: f64) -> Option<f64> {
        let scale = self.implied_vol * self.time_to_expiry.sqrt();
        if scale <= 0.0 || spot <= 0.0 {
            return None;
        }
        let m = (self.strike / spot).ln() / scale;
        m.is_finite().then_some(m)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A valid input for a 30-day SPY-like contract.
    pub fn input(option_type: OptionType, strike: f64) -> ChainRowInput {
        ChainRowInput {
            strike,
            expiry: NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
            option_type,
            underlying_price: 450.0,
            implied_vol: 0.2,
            open_interest: 1_000.0,
            volume: 100.0,
            multiplier: 100.0,
            gamma: 0.01,
            vanna: 0.05,
            charm: -0.5,
            time_to_expiry: 30.0 / 365.0,
            dealer_sign: None,
        }
    }

    pub fn row(option_type: OptionType, strike: f64) -> ChainRow {
        ChainRow::new(input(option_type, strike)).unwrap()
    }
}
