//! Dollar-exposure unit conventions.

use serde::{Deserialize, Serialize};

/// Units used when converting Greeks into dollar exposure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Trading days per year used to de-annualize charm.
    #[serde(default = "default_trading_days")]
    pub trading_days_per_year: f64,
    /// Trading minutes per day used to de-annualize charm.
    #[serde(default = "default_minutes_per_day")]
    pub minutes_per_day: f64,
    /// Contract multiplier applied when the chain omits one.
    #[serde(default = "default_multiplier")]
    pub default_multiplier: f64,
    /// Hour (UTC) at which an expiry date stops trading.
    #[serde(default = "default_expiry_hour_utc")]
    pub expiry_hour_utc: u32,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            trading_days_per_year: default_trading_days(),
            minutes_per_day: default_minutes_per_day(),
            default_multiplier: default_multiplier(),
            expiry_hour_utc: default_expiry_hour_utc(),
        }
    }
}

impl ExposureConfig {
    /// Trading minutes per year (charm de-annualization divisor).
    #[must_use]
    pub fn minutes_per_year(&self) -> f64 {
        self.trading_days_per_year * self.minutes_per_day
    }
}

const fn default_trading_days() -> f64 {
    252.0
}

const fn default_minutes_per_day() -> f64 {
    390.0
}

const fn default_multiplier() -> f64 {
    100.0
}

const fn default_expiry_hour_utc() -> u32 {
    20
}
