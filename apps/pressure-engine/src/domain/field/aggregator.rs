//! Greek field aggregation.
//!
//! Places each contract's signed dollar exposure on the nearest grid point of
//! its normalized log-moneyness. Scalar totals cover every row, placed or not.

use super::exposure::dollar_exposure;
use super::grid::{FieldVector, SpatialGrid};
use crate::config::ExposureConfig;
use crate::domain::chain::ChainRow;
use crate::domain::dealer_sign::DealerSign;

const DAYS_PER_YEAR: f64 = 365.0;

/// Output of one aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedFields {
    /// Gamma exposure per grid point.
    pub gamma: FieldVector,
    /// Vanna exposure per grid point.
    pub vanna: FieldVector,
    /// Charm exposure per grid point.
    pub charm: FieldVector,
    /// Option volume per grid point (liquidity input).
    pub volume: FieldVector,
    /// Σ gamma exposure over all rows.
    pub gamma_total: f64,
    /// Σ vanna exposure over all rows.
    pub vanna_total: f64,
    /// Σ charm exposure over all rows.
    pub charm_total: f64,
    /// Open-interest weighted days to expiry.
    pub weighted_dte: f64,
    /// Open-interest weighted dispersion of implied vol.
    pub vol_of_vol: f64,
    /// Rows placed on the grid.
    pub rows_binned: usize,
    /// Rows whose moneyness fell outside the grid.
    pub rows_outside_grid: usize,
    /// Rows with undefined moneyness (zero vol or time).
    pub rows_unplaced: usize,
}

impl AggregatedFields {
    /// Net dealer gamma direction.
    #[must_use]
    pub fn dealer_gamma_sign(&self) -> DealerSign {
        DealerSign::of(self.gamma_total)
    }
}

/// Aggregates rows onto a grid.
#[derive(Debug, Clone, Copy)]
pub struct FieldAggregator<'a> {
    grid: &'a SpatialGrid,
    units: &'a ExposureConfig,
}

impl<'a> FieldAggregator<'a> {
    /// Create an aggregator for `grid`.
    #[must_use]
    pub const fn new(grid: &'a SpatialGrid, units: &'a ExposureConfig) -> Self {
        Self { grid, units }
    }

    /// Aggregate signed rows around `spot`.
    #[must_use]
    pub fn aggregate(&self, rows: &[ChainRow], spot: f64) -> AggregatedFields {
        let mut out = AggregatedFields {
            gamma: self.grid.zeros(),
            vanna: self.grid.zeros(),
            charm: self.grid.zeros(),
            volume: self.grid.zeros(),
            gamma_total: 0.0,
            vanna_total: 0.0,
            charm_total: 0.0,
            weighted_dte: 0.0,
            vol_of_vol: 0.0,
            rows_binned: 0,
            rows_outside_grid: 0,
            rows_unplaced: 0,
        };

        let mut oi_sum = 0.0;
        let mut dte_sum = 0.0;

        for row in rows {
            let exposure = dollar_exposure(row, self.units);
            out.gamma_total += exposure.gamma;
            out.vanna_total += exposure.vanna;
            out.charm_total += exposure.charm;

            oi_sum += row.open_interest();
            dte_sum += row.open_interest() * row.time_to_expiry() * DAYS_PER_YEAR;

            let Some(m) = row.standardized_moneyness(spot) else {
                out.rows_unplaced += 1;
                continue;
            };
            let Some(index) = self.grid.nearest_index(m) else {
                out.rows_outside_grid += 1;
                continue;
            };

            out.gamma.add(index, exposure.gamma);
            out.vanna.add(index, exposure.vanna);
            out.charm.add(index, exposure.charm);
            out.volume.add(index, row.volume());
            out.rows_binned += 1;
        }

        if oi_sum > 0.0 {
            out.weighted_dte = dte_sum / oi_sum;
        }
        out.vol_of_vol = implied_vol_dispersion(rows);

        tracing::debug!(
            rows = rows.len(),
            binned = out.rows_binned,
            outside_grid = out.rows_outside_grid,
            unplaced = out.rows_unplaced,
            gamma_total = out.gamma_total,
            "Aggregated Greek fields"
        );

        out
    }

    /// Moneyness of the gamma zero crossing nearest spot.
    ///
    /// Linear interpolation between consecutive non-zero bins of opposite
    /// sign; `None` when gamma never changes sign on the grid.
    #[must_use]
    pub fn gamma_flip(&self, gamma: &FieldVector) -> Option<f64> {
        let points = self.grid.points();
        let occupied: Vec<(f64, f64)> = gamma
            .iter()
            .zip(points)
            .filter(|(g, _)| **g != 0.0)
            .map(|(g, x)| (*x, *g))
            .collect();

        occupied
            .windows(2)
            .filter(|pair| pair[0].1.signum() != pair[1].1.signum())
            .map(|pair| {
                let ((x0, g0), (x1, g1)) = (pair[0], pair[1]);
                x0 - g0 * (x1 - x0) / (g1 - g0)
            })
            .min_by(|a, b| a.abs().total_cmp(&b.abs()))
    }

    /// Moneyness of the largest positive and most negative gamma bins.
    #[must_use]
    pub fn gamma_extremes(&self, gamma: &FieldVector) -> (Option<f64>, Option<f64>) {
        let points = self.grid.points();
        let mut peak: Option<(f64, f64)> = None;
        let mut trough: Option<(f64, f64)> = None;
        for (&g, &x) in gamma.iter().zip(points) {
            if g > 0.0 && peak.is_none_or(|(_, best)| g > best) {
                peak = Some((x, g));
            }
            if g < 0.0 && trough.is_none_or(|(_, best)| g < best) {
                trough = Some((x, g));
            }
        }
        (peak.map(|(x, _)| x), trough.map(|(x, _)| x))
    }
}

/// Open-interest weighted standard deviation of implied vol over rows with a
/// known vol. A single-tenor proxy for vol-of-vol.
fn implied_vol_dispersion(rows: &[ChainRow]) -> f64 {
    let quoted = rows
        .iter()
        .filter(|r| r.implied_vol() > 0.0 && r.open_interest() > 0.0);

    let (mut w, mut sum, mut sum_sq) = (0.0, 0.0, 0.0);
    for r in quoted {
        let oi = r.open_interest();
        w += oi;
        sum += oi * r.implied_vol();
        sum_sq += oi * r.implied_vol() * r.implied_vol();
    }
    if w <= 0.0 {
        return 0.0;
    }
    let mean = sum / w;
    (sum_sq / w - mean * mean).max(0.0).sqrt()
}
