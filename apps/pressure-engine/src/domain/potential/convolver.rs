//! FFT convolution of the combined source field with the Green's kernel.

use rustfft::FftPlanner;
use rustfft::num_complex::Complex;
use serde::Serialize;

use crate::config::AggregationWeights;
use crate::domain::field::{AggregatedFields, FieldVector};
use crate::domain::kernel::KernelGrid;
use crate::error::EngineError;

/// Potential Φ = K ∗ S and its gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PotentialField {
    values: FieldVector,
    gradient: FieldVector,
    spacing: f64,
}

/// Potential shape at spot, each derivative divided by `max |Φ|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ShapeDiagnostics {
    /// Φ at spot (unnormalized).
    pub potential_at_spot: f64,
    /// Φ′ at spot.
    pub slope: f64,
    /// Φ″ at spot.
    pub curvature: f64,
    /// |Φ‴| at spot.
    pub curvature_acceleration: f64,
}

impl PotentialField {
    /// Potential values.
    #[must_use]
    pub const fn values(&self) -> &FieldVector {
        &self.values
    }

    /// Discrete gradient.
    #[must_use]
    pub const fn gradient(&self) -> &FieldVector {
        &self.gradient
    }

    /// Shape diagnostics at grid index `center`.
    #[must_use]
    pub fn shape_at(&self, center: usize) -> ShapeDiagnostics {
        let phi = self.values.values();
        let n = phi.len();
        if center == 0 || center + 1 >= n {
            return ShapeDiagnostics::default();
        }

        let dx = self.spacing;
        let at_spot = phi[center];
        let scale = self.values.max_abs();
        if scale == 0.0 {
            return ShapeDiagnostics {
                potential_at_spot: at_spot,
                ..ShapeDiagnostics::default()
            };
        }

        let slope = self.gradient.get(center);
        let curvature = (phi[center + 1] - 2.0 * phi[center] + phi[center - 1]) / (dx * dx);
        let third = if center >= 2 && center + 2 < n {
            (phi[center + 2] - 2.0 * phi[center + 1] + 2.0 * phi[center - 1] - phi[center - 2])
                / (2.0 * dx * dx * dx)
        } else {
            0.0
        };

        ShapeDiagnostics {
            potential_at_spot: at_spot,
            slope: slope / scale,
            curvature: curvature / scale,
            curvature_acceleration: third.abs() / scale,
        }
    }
}

/// Combines weighted Greek fields and convolves them with a kernel.
#[derive(Debug, Clone, Copy)]
pub struct PotentialConvolver {
    weights: AggregationWeights,
}

impl PotentialConvolver {
    /// Create a convolver with the given field weights.
    #[must_use]
    pub const fn new(weights: AggregationWeights) -> Self {
        Self { weights }
    }

    /// `S = α_gamma·Γ + α_vanna·V + α_charm·C`.
    ///
    /// # Errors
    ///
    /// `GridMismatch` when the fields differ in length.
    pub fn source(&self, fields: &AggregatedFields) -> Result<FieldVector, EngineError> {
        FieldVector::weighted_sum(&[
            (self.weights.gamma, &fields.gamma),
            (self.weights.vanna, &fields.vanna),
            (self.weights.charm, &fields.charm),
        ])
    }

    /// Convolve `source` with `kernel` ("same" mode) and differentiate.
    ///
    /// # Errors
    ///
    /// `GridMismatch` on length disagreement, `NonFiniteField` when the
    /// transform produces NaN or infinity.
    pub fn convolve(&self, source: &FieldVector, kernel: &KernelGrid) -> Result<PotentialField, EngineError> {
        if source.len() != kernel.len() {
            return Err(EngineError::GridMismatch {
                expected: kernel.len(),
                actual: source.len(),
            });
        }

        let values = FieldVector::from(convolve_same(source.values(), kernel.values().values()));
        if !values.is_finite() {
            return Err(EngineError::NonFiniteField { stage: "potential" });
        }
        let gradient = FieldVector::from(gradient(values.values(), kernel.spacing()));

        Ok(PotentialField {
            values,
            gradient,
            spacing: kernel.spacing(),
        })
    }
}

/// Centered slice of the full linear convolution, same length as `signal`.
fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let m = kernel.len();
    if n == 0 || m == 0 {
        return vec![0.0; n];
    }

    let full_len = n + m - 1;
    let size = full_len.next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(size);
    let inverse = planner.plan_fft_inverse(size);

    let pad = |values: &[f64]| {
        let mut buf: Vec<Complex<f64>> = values.iter().map(|v| Complex::new(*v, 0.0)).collect();
        buf.resize(size, Complex::new(0.0, 0.0));
        buf
    };

    let mut a = pad(signal);
    let mut b = pad(kernel);
    forward.process(&mut a);
    forward.process(&mut b);
    for (x, y) in a.iter_mut().zip(&b) {
        *x *= *y;
    }
    inverse.process(&mut a);

    let scale = 1.0 / size as f64;
    let start = (m - 1) / 2;
    a[start..start + n].iter().map(|c| c.re * scale).collect()
}

/// Central differences inside, one-sided at the edges.
fn gradient(values: &[f64], dx: f64) -> Vec<f64> {
    let n = values.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n)
            .map(|i| {
                if i == 0 {
                    (values[1] - values[0]) / dx
                } else if i == n - 1 {
                    (values[n - 1] - values[n - 2]) / dx
                } else {
                    (values[i + 1] - values[i - 1]) / (2.0 * dx)
                }
            })
            .collect(),
    }
}
