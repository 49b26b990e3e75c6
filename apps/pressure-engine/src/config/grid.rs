//! Spatial grid configuration.

use serde::{Deserialize, Serialize};

/// Log-moneyness grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of grid points. Must be odd so the midpoint sits exactly on spot.
    #[serde(default = "default_bin_count")]
    pub bin_count: usize,
    /// Half-width of the grid in standard deviations of normalized log-moneyness.
    #[serde(default = "default_range_std")]
    pub range_std: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            bin_count: default_bin_count(),
            range_std: default_range_std(),
        }
    }
}

const fn default_bin_count() -> usize {
    101
}

const fn default_range_std() -> f64 {
    4.0
}
