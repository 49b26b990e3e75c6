//! Normalized log-moneyness grid and per-point field values.

use serde::Serialize;

use crate::config::GridConfig;
use crate::error::EngineError;

/// Evenly spaced grid of normalized log-moneyness, symmetric around spot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialGrid {
    points: Vec<f64>,
    spacing: f64,
    range: f64,
}

impl SpatialGrid {
    /// Build the grid `[-range_std, +range_std]` with `bin_count` points.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when `bin_count` is even or below 3, or the range is
    /// not finite and positive.
    pub fn new(config: &GridConfig) -> Result<Self, EngineError> {
        let n = config.bin_count;
        if n < 3 || n % 2 == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "grid bin count must be odd and at least 3, got {n}"
            )));
        }
        let range = config.range_std;
        if !(range.is_finite() && range > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "grid range must be finite and positive, got {range}"
            )));
        }

        let spacing = 2.0 * range / (n - 1) as f64;
        let center = (n / 2) as f64;
        // Built outward from the center so the grid is exactly symmetric.
        let points = (0..n).map(|i| (i as f64 - center) * spacing).collect();

        Ok(Self {
            points,
            spacing,
            range,
        })
    }

    /// Grid coordinates.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a grid has at least three points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Spacing `dx`.
    #[must_use]
    pub const fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Half-width.
    #[must_use]
    pub const fn range(&self) -> f64 {
        self.range
    }

    /// Index of the spot point (0 moneyness).
    #[must_use]
    pub fn center_index(&self) -> usize {
        self.points.len() / 2
    }

    /// Nearest grid index for moneyness `m`, or `None` outside the grid.
    #[must_use]
    pub fn nearest_index(&self, m: f64) -> Option<usize> {
        if !m.is_finite() || m.abs() > self.range {
            return None;
        }
        let offset = (m / self.spacing).round() as i64;
        let index = self.center_index() as i64 + offset;
        usize::try_from(index).ok().filter(|&i| i < self.len())
    }

    /// A zero field shaped like this grid.
    #[must_use]
    pub fn zeros(&self) -> FieldVector {
        FieldVector::zeros(self.len())
    }
}

/// Scalar values, one per grid point.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldVector(Vec<f64>);

impl FieldVector {
    /// All-zero field.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the field has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `index` (0 out of range).
    #[must_use]
    pub fn get(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    /// Add `value` at `index`.
    pub fn add(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot += value;
        }
    }

    /// Iterate values.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    /// Sum of values.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Sum of absolute values.
    #[must_use]
    pub fn abs_sum(&self) -> f64 {
        self.0.iter().map(|v| v.abs()).sum()
    }

    /// Largest absolute value (0 when empty).
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.0.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }

    /// Whether every value is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// `Σ wₖ·fₖ` element-wise over fields of equal length.
    ///
    /// # Errors
    ///
    /// `GridMismatch` when lengths differ.
    pub fn weighted_sum(terms: &[(f64, &Self)]) -> Result<Self, EngineError> {
        let len = terms.first().map_or(0, |(_, f)| f.len());
        let mut out = Self::zeros(len);
        for (weight, field) in terms {
            if field.len() != len {
                return Err(EngineError::GridMismatch {
                    expected: len,
                    actual: field.len(),
                });
            }
            for (o, v) in out.0.iter_mut().zip(field.iter()) {
                *o += weight * v;
            }
        }
        Ok(out)
    }

    /// Split around `center`: `(below, above)`, each including half of the
    /// center value.
    #[must_use]
    pub fn side_sums(&self, center: usize) -> (f64, f64) {
        let mid = self.get(center);
        let below: f64 = self.0.iter().take(center).sum();
        let above: f64 = self.0.iter().skip(center + 1).sum();
        (below + 0.5 * mid, above + 0.5 * mid)
    }
}

impl From<Vec<f64>> for FieldVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<FieldVector> for Vec<f64> {
    fn from(field: FieldVector) -> Self {
        field.0
    }
}

impl<'a> IntoIterator for &'a FieldVector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
