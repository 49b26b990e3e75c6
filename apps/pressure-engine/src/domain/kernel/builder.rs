//! Green's kernel of `(−∂ₓ λ⁻¹ ∂ₓ + κ²) K = δ(x)` on the grid.

use serde::Serialize;

use super::liquidity::LiquidityProfile;
use super::tridiagonal::TridiagonalSystem;
use crate::config::KernelConfig;
use crate::domain::field::{FieldVector, SpatialGrid};
use crate::error::EngineError;

/// Which solve produced a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelBranch {
    /// Closed form for constant liquidity.
    Analytic,
    /// Tridiagonal solve for variable liquidity.
    Tridiagonal,
}

impl KernelBranch {
    /// Stable name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Analytic => "analytic",
            Self::Tridiagonal => "tridiagonal",
        }
    }
}

/// Unit-mass kernel centered on the grid midpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KernelGrid {
    values: FieldVector,
    spacing: f64,
    branch: KernelBranch,
}

impl KernelGrid {
    /// Kernel values.
    #[must_use]
    pub const fn values(&self) -> &FieldVector {
        &self.values
    }

    /// Grid spacing the kernel was built on.
    #[must_use]
    pub const fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Branch that built it.
    #[must_use]
    pub const fn branch(&self) -> KernelBranch {
        self.branch
    }

    /// Discrete integral `Σ Kᵢ·dx`.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.values.sum() * self.spacing
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the kernel has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builds Green's kernels for a fixed κ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelBuilder {
    kappa: f64,
    uniform_tolerance: f64,
}

impl KernelBuilder {
    /// Create a builder.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when κ is not finite and positive.
    pub fn new(config: &KernelConfig) -> Result<Self, EngineError> {
        if !(config.kappa.is_finite() && config.kappa > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "kernel kappa must be finite and positive, got {}",
                config.kappa
            )));
        }
        Ok(Self {
            kappa: config.kappa,
            uniform_tolerance: config.uniform_tolerance.max(0.0),
        })
    }

    /// κ.
    #[must_use]
    pub const fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Relative spread under which a profile takes the analytic branch.
    #[must_use]
    pub const fn uniform_tolerance(&self) -> f64 {
        self.uniform_tolerance
    }

    /// Build the kernel for `profile` on `grid`.
    ///
    /// # Errors
    ///
    /// `GridMismatch` when the profile does not cover the grid,
    /// `SingularKernel` when the tridiagonal solve fails and
    /// `DegenerateKernelMass` / `NonFiniteField` when the result cannot be
    /// normalized.
    pub fn build(&self, grid: &SpatialGrid, profile: &LiquidityProfile) -> Result<KernelGrid, EngineError> {
        if profile.len() != grid.len() {
            return Err(EngineError::GridMismatch {
                expected: grid.len(),
                actual: profile.len(),
            });
        }

        let (raw, branch) = if profile.is_uniform(self.uniform_tolerance) {
            let lambda = profile.values().first().copied().unwrap_or(1.0);
            (self.analytic(grid, lambda), KernelBranch::Analytic)
        } else {
            (self.tridiagonal(grid, profile)?, KernelBranch::Tridiagonal)
        };

        let kernel = normalize(raw, grid.spacing(), branch)?;
        tracing::debug!(
            branch = branch.as_str(),
            bins = grid.len(),
            kappa = self.kappa,
            "Built Green's kernel"
        );
        Ok(kernel)
    }

    /// `K(x) = (λκ/2)·exp(−κ|x|)`.
    fn analytic(&self, grid: &SpatialGrid, lambda: f64) -> Vec<f64> {
        let amplitude = 0.5 * lambda * self.kappa;
        grid.points()
            .iter()
            .map(|x| amplitude * (-self.kappa * x.abs()).exp())
            .collect()
    }

    fn tridiagonal(&self, grid: &SpatialGrid, profile: &LiquidityProfile) -> Result<Vec<f64>, EngineError> {
        let n = grid.len();
        let dx = grid.spacing();
        let dx2 = dx * dx;
        let kappa2 = self.kappa * self.kappa;
        let lambda = profile.values();

        // Inverse liquidity at the half points i+1/2 (harmonic-style average).
        let half: Vec<f64> = lambda.windows(2).map(|w| 2.0 / (w[0] + w[1])).collect();

        let mut lower = vec![0.0; n];
        let mut diag = vec![0.0; n];
        let mut upper = vec![0.0; n];

        for i in 1..n - 1 {
            let w_minus = half[i - 1];
            let w_plus = half[i];
            lower[i] = -w_minus / dx2;
            upper[i] = -w_plus / dx2;
            diag[i] = (w_minus + w_plus) / dx2 + kappa2;
        }

        // Neumann edges.
        diag[0] = diag[1];
        upper[0] = -half[0] / dx2;
        diag[n - 1] = diag[n - 2];
        lower[n - 1] = -half[n - 2] / dx2;

        let mut rhs = vec![0.0; n];
        rhs[grid.center_index()] = 1.0 / dx;

        TridiagonalSystem { lower, diag, upper }.solve(&rhs)
    }
}

fn normalize(raw: Vec<f64>, spacing: f64, branch: KernelBranch) -> Result<KernelGrid, EngineError> {
    let values = FieldVector::from(raw);
    if !values.is_finite() {
        return Err(EngineError::NonFiniteField { stage: "kernel" });
    }
    let mass = values.sum() * spacing;
    if !(mass.is_finite() && mass > 0.0) {
        return Err(EngineError::DegenerateKernelMass { mass });
    }
    let scaled: Vec<f64> = values.iter().map(|v| v / mass).collect();
    Ok(KernelGrid {
        values: FieldVector::from(scaled),
        spacing,
        branch,
    })
}
