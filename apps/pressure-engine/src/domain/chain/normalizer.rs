//! Chain normalization: raw vendor rows to validated contracts.
//!
//! A row is dropped, and counted by reason, when it cannot contribute to the
//! fields. Dropping is never an error; an empty result becomes the engine's
//! degraded output.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use super::row::{ChainRow, ChainRowInput, RawChainRow};
use crate::config::ExposureConfig;
use crate::domain::dealer_sign::DealerSign;
use crate::domain::shared::Timestamp;

/// Why a raw row was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Underlying price missing, zero or negative.
    NonPositiveUnderlying,
    /// Contract already expired at snapshot time.
    NonPositiveExpiry,
    /// Gamma, vanna or charm absent or non-finite.
    MissingGreeks,
    /// Row failed contract validation.
    InvalidContract,
}

impl DropReason {
    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NonPositiveUnderlying => "non_positive_underlying",
            Self::NonPositiveExpiry => "non_positive_expiry",
            Self::MissingGreeks => "missing_greeks",
            Self::InvalidContract => "invalid_contract",
        }
    }
}

/// Row counts from one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationStats {
    /// Raw rows seen.
    pub total: usize,
    /// Rows kept.
    pub kept: usize,
    /// Dropped: non-positive underlying.
    pub non_positive_underlying: usize,
    /// Dropped: expired.
    pub non_positive_expiry: usize,
    /// Dropped: missing Greeks.
    pub missing_greeks: usize,
    /// Dropped: invalid contract.
    pub invalid_contract: usize,
}

impl NormalizationStats {
    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::NonPositiveUnderlying => self.non_positive_underlying += 1,
            DropReason::NonPositiveExpiry => self.non_positive_expiry += 1,
            DropReason::MissingGreeks => self.missing_greeks += 1,
            DropReason::InvalidContract => self.invalid_contract += 1,
        }
    }

    /// Total rows dropped.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.total - self.kept
    }

    /// Drop counts by reason.
    #[must_use]
    pub const fn drops(&self) -> [(DropReason, usize); 4] {
        [
            (DropReason::NonPositiveUnderlying, self.non_positive_underlying),
            (DropReason::NonPositiveExpiry, self.non_positive_expiry),
            (DropReason::MissingGreeks, self.missing_greeks),
            (DropReason::InvalidContract, self.invalid_contract),
        ]
    }

    /// Fraction of rows kept, in `[0, 1]` (0 for an empty chain).
    #[must_use]
    pub fn data_quality(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.kept as f64 / self.total as f64
        }
    }
}

/// Validated rows plus the counts that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedChain {
    /// Kept rows.
    pub rows: Vec<ChainRow>,
    /// Counts.
    pub stats: NormalizationStats,
}

impl NormalizedChain {
    /// Whether nothing survived normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Spot price: median underlying price over kept rows.
    #[must_use]
    pub fn spot(&self) -> Option<f64> {
        let mut prices: Vec<f64> = self.rows.iter().map(ChainRow::underlying_price).collect();
        if prices.is_empty() {
            return None;
        }
        prices.sort_by(f64::total_cmp);
        let mid = prices.len() / 2;
        Some(if prices.len() % 2 == 0 {
            0.5 * (prices[mid - 1] + prices[mid])
        } else {
            prices[mid]
        })
    }
}

/// Converts raw rows into validated [`ChainRow`]s.
#[derive(Debug, Clone, Copy)]
pub struct ChainNormalizer {
    default_multiplier: f64,
    expiry_hour_utc: u32,
}

impl ChainNormalizer {
    /// Create a normalizer from exposure units.
    #[must_use]
    pub fn new(config: &ExposureConfig) -> Self {
        Self {
            default_multiplier: config.default_multiplier,
            expiry_hour_utc: config.expiry_hour_utc,
        }
    }

    /// Normalize `rows` as of `now`.
    #[must_use]
    pub fn normalize(&self, rows: &[RawChainRow], now: Timestamp) -> NormalizedChain {
        let mut stats = NormalizationStats {
            total: rows.len(),
            ..NormalizationStats::default()
        };
        let mut kept = Vec::with_capacity(rows.len());

        for raw in rows {
            match self.normalize_row(raw, now) {
                Ok(row) => kept.push(row),
                Err(reason) => {
                    tracing::trace!(
                        symbol = %raw.symbol,
                        strike = %raw.strike,
                        reason = reason.as_str(),
                        "Dropped chain row"
                    );
                    stats.record_drop(reason);
                }
            }
        }

        stats.kept = kept.len();
        NormalizedChain { rows: kept, stats }
    }

    /// Years from `now` to the expiry close.
    #[must_use]
    pub fn time_to_expiry(&self, expiry: chrono::NaiveDate, now: Timestamp) -> f64 {
        now.years_until(Timestamp::market_close(expiry, self.expiry_hour_utc))
    }

    fn normalize_row(&self, raw: &RawChainRow, now: Timestamp) -> Result<ChainRow, DropReason> {
        let underlying = decimal(raw.underlying_price);
        if underlying.is_nan() || underlying <= 0.0 {
            return Err(DropReason::NonPositiveUnderlying);
        }

        let tau = self.time_to_expiry(raw.expiry, now);
        if tau.is_nan() || tau <= 0.0 {
            return Err(DropReason::NonPositiveExpiry);
        }

        let (Some(gamma), Some(vanna), Some(charm)) = (
            finite(raw.gamma),
            finite(raw.vanna),
            finite(raw.charm),
        ) else {
            return Err(DropReason::MissingGreeks);
        };

        let dealer_sign = match raw.dealer_sign {
            Some(value) => Some(DealerSign::try_from(value).map_err(|_| DropReason::InvalidContract)?),
            None => None,
        };

        ChainRow::new(ChainRowInput {
            strike: decimal(raw.strike),
            expiry: raw.expiry,
            option_type: raw.option_type,
            underlying_price: underlying,
            implied_vol: raw.implied_vol.unwrap_or(0.0),
            open_interest: raw.open_interest as f64,
            volume: raw.volume as f64,
            multiplier: raw.multiplier.unwrap_or(self.default_multiplier),
            gamma,
            vanna,
            charm,
            time_to_expiry: tau,
            dealer_sign,
        })
        .map_err(|_| DropReason::InvalidContract)
    }
}

fn decimal(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
