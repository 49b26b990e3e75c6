//! Potential Convolver
//!
//! Φ = K ∗ (α_gamma·Γ + α_vanna·V + α_charm·C), computed by zero-padded FFT.

mod convolver;

pub use convolver::{PotentialConvolver, PotentialField, ShapeDiagnostics};
