//! Green's Kernel
//!
//! Impulse response of the liquidity-weighted screened-diffusion operator
//! `(−∂ₓ λ⁻¹ ∂ₓ + κ²) K = δ(x)`. Constant liquidity has a closed form; any
//! other profile is solved as a tridiagonal system. Either way the kernel is
//! renormalized to unit mass.

mod builder;
mod cache;
mod liquidity;
mod tridiagonal;

pub use builder::{KernelBranch, KernelBuilder, KernelGrid};
pub use cache::{KernelCache, KernelCacheKey};
pub use liquidity::{LiquidityProfile, LiquidityProfileKind};
pub use tridiagonal::TridiagonalSystem;
