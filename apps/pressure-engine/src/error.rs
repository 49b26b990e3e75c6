//! Error taxonomy for the pressure engine.
//!
//! Three families of failure exist and are kept apart so monitoring can tell
//! "the market had no usable data" from "the solver broke":
//!
//! | Kind | Examples | Handling |
//! |------|----------|----------|
//! | `Input` | empty chain, missing Greeks, invalid contract row | recovered locally (row dropped or degraded output) |
//! | `Numeric` | singular kernel matrix, non-positive elasticity | surfaced to the caller, never clamped or retried |
//! | `Configuration` | `κ ≤ 0`, even bin count, bad thresholds | rejected at load / engine construction |
//!
//! Missing optional inputs (e.g. no volatility index) are not errors at all:
//! they only lower the confidence of the regime dimensions that need them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain for pressure engine errors.
pub const ERROR_DOMAIN: &str = "cream.pressure";

/// Broad classification of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Bad or incomplete market input.
    Input,
    /// Numerical invariant violated inside the engine.
    Numeric,
    /// Invalid configuration.
    Configuration,
}

/// Error codes for the pressure engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Input errors
    /// A contract row violates a construction invariant.
    InvalidContract,
    /// A field vector does not match the grid it is used with.
    GridMismatch,

    // Configuration errors
    /// Engine configuration rejected.
    InvalidConfig,
    /// Liquidity profile is empty, non-positive or non-finite.
    InvalidLiquidityProfile,

    // Numeric defects
    /// Tridiagonal kernel system has a zero or non-finite pivot.
    SingularKernel,
    /// Kernel integral is zero, negative or non-finite.
    DegenerateKernelMass,
    /// Elasticity came out zero, negative or non-finite.
    NonPositiveElasticity,
    /// A NaN or infinity escaped a computation stage.
    NonFiniteField,
}

impl ErrorCode {
    /// Get the kind of this error code.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidContract | Self::GridMismatch => ErrorKind::Input,
            Self::InvalidConfig | Self::InvalidLiquidityProfile => ErrorKind::Configuration,
            Self::SingularKernel
            | Self::DegenerateKernelMass
            | Self::NonPositiveElasticity
            | Self::NonFiniteField => ErrorKind::Numeric,
        }
    }

    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidContract => "INVALID_CONTRACT",
            Self::GridMismatch => "GRID_MISMATCH",
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::InvalidLiquidityProfile => "INVALID_LIQUIDITY_PROFILE",
            Self::SingularKernel => "SINGULAR_KERNEL",
            Self::DegenerateKernelMass => "DEGENERATE_KERNEL_MASS",
            Self::NonPositiveElasticity => "NON_POSITIVE_ELASTICITY",
            Self::NonFiniteField => "NON_FINITE_FIELD",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors raised by the engine and its components.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A contract row failed validation.
    #[error("Invalid contract field '{field}': {message}")]
    InvalidContract {
        /// Offending field.
        field: String,
        /// What was wrong.
        message: String,
    },

    /// Field and grid lengths disagree.
    #[error("Field of length {actual} does not match grid of {expected} bins")]
    GridMismatch {
        /// Grid bin count.
        expected: usize,
        /// Field length.
        actual: usize,
    },

    /// Engine configuration rejected.
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Liquidity profile rejected.
    #[error("Invalid liquidity profile: {message}")]
    InvalidLiquidityProfile {
        /// What was wrong.
        message: String,
    },

    /// The kernel operator could not be factorized.
    #[error("Kernel matrix is singular at row {row} (pivot {pivot:e})")]
    SingularKernel {
        /// Row where elimination failed.
        row: usize,
        /// Offending pivot.
        pivot: f64,
    },

    /// The kernel integral cannot be renormalized to unit mass.
    #[error("Kernel mass {mass} cannot be normalized to 1")]
    DegenerateKernelMass {
        /// Discrete integral before renormalization.
        mass: f64,
    },

    /// Elasticity violated the positive-definite invariant.
    #[error("Elasticity {direction} is {value}; must be finite and strictly positive")]
    NonPositiveElasticity {
        /// "up" or "down".
        direction: &'static str,
        /// Computed value.
        value: f64,
    },

    /// NaN or infinity produced by a stage.
    #[error("Non-finite value produced by {stage}")]
    NonFiniteField {
        /// Stage name.
        stage: &'static str,
    },
}

impl EngineError {
    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidContract { .. } => ErrorCode::InvalidContract,
            Self::GridMismatch { .. } => ErrorCode::GridMismatch,
            Self::InvalidConfig(_) => ErrorCode::InvalidConfig,
            Self::InvalidLiquidityProfile { .. } => ErrorCode::InvalidLiquidityProfile,
            Self::SingularKernel { .. } => ErrorCode::SingularKernel,
            Self::DegenerateKernelMass { .. } => ErrorCode::DegenerateKernelMass,
            Self::NonPositiveElasticity { .. } => ErrorCode::NonPositiveElasticity,
            Self::NonFiniteField { .. } => ErrorCode::NonFiniteField,
        }
    }

    /// Get the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code().kind()
    }

    /// Whether this error is a numeric defect (solver or invariant failure).
    #[must_use]
    pub const fn is_numeric_defect(&self) -> bool {
        matches!(self.kind(), ErrorKind::Numeric)
    }

    /// Create an invalid contract error.
    #[must_use]
    pub fn invalid_contract(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidContract {
            field: field.into(),
            message: message.into(),
        }
    }
}
