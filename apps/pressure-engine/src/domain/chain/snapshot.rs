//! Chain snapshots and the optional market context that accompanies them.

use serde::{Deserialize, Serialize};

use super::row::RawChainRow;
use crate::domain::shared::{Symbol, Timestamp};

/// A point-in-time option chain for one underlying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Underlying symbol.
    pub symbol: Symbol,
    /// Snapshot time; also the `now` used for time to expiry.
    pub as_of: Timestamp,
    /// Raw rows as delivered by the chain source.
    #[serde(default)]
    pub rows: Vec<RawChainRow>,
}

impl ChainSnapshot {
    /// Create a snapshot.
    #[must_use]
    pub const fn new(symbol: Symbol, as_of: Timestamp, rows: Vec<RawChainRow>) -> Self {
        Self {
            symbol,
            as_of,
            rows,
        }
    }

    /// Whether the snapshot carries no rows at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Optional external inputs. Absent values lower confidence, never fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    /// VIX-like volatility index level.
    #[serde(default)]
    pub volatility_index: Option<f64>,
    /// Vol-of-vol override; replaces the chain's IV-dispersion estimate.
    #[serde(default)]
    pub vol_of_vol: Option<f64>,
}

impl MarketContext {
    /// Context with a volatility index.
    #[must_use]
    pub const fn with_volatility_index(level: f64) -> Self {
        Self {
            volatility_index: Some(level),
            vol_of_vol: None,
        }
    }

    /// Volatility index, if present and finite.
    #[must_use]
    pub fn volatility_index(&self) -> Option<f64> {
        self.volatility_index.filter(|v| v.is_finite())
    }

    /// Vol-of-vol override, if present and finite.
    #[must_use]
    pub fn vol_of_vol(&self) -> Option<f64> {
        self.vol_of_vol.filter(|v| v.is_finite())
    }
}
