//! Caller-owned kernel cache.
//!
//! The engine only reads it. Callers warm it ahead of time and hand it to
//! `HedgePressureEngine::analyze_with_cache`; there is no process-wide cache.

use std::collections::HashMap;
use std::sync::Arc;

use super::builder::{KernelBuilder, KernelGrid};
use super::liquidity::LiquidityProfile;
use crate::domain::field::SpatialGrid;
use crate::error::EngineError;

/// Identifies a kernel: exact liquidity values, κ, branch tolerance and grid
/// geometry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KernelCacheKey {
    profile_bits: Vec<u64>,
    kappa_bits: u64,
    tolerance_bits: u64,
    bin_count: usize,
    range_bits: u64,
}

impl KernelCacheKey {
    /// Key for a kernel built by `builder` for `profile` on `grid`.
    #[must_use]
    pub fn new(builder: &KernelBuilder, grid: &SpatialGrid, profile: &LiquidityProfile) -> Self {
        Self {
            profile_bits: profile.bit_pattern(),
            kappa_bits: builder.kappa().to_bits(),
            tolerance_bits: builder.uniform_tolerance().to_bits(),
            bin_count: grid.len(),
            range_bits: grid.range().to_bits(),
        }
    }
}

/// Prebuilt kernels keyed by [`KernelCacheKey`].
#[derive(Debug, Clone, Default)]
pub struct KernelCache {
    entries: HashMap<KernelCacheKey, Arc<KernelGrid>>,
}

impl KernelCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and store the kernel for `profile` unless already present.
    ///
    /// # Errors
    ///
    /// Propagates kernel build failures.
    pub fn warm(
        &mut self,
        builder: &KernelBuilder,
        grid: &SpatialGrid,
        profile: &LiquidityProfile,
    ) -> Result<Arc<KernelGrid>, EngineError> {
        let key = KernelCacheKey::new(builder, grid, profile);
        if let Some(kernel) = self.entries.get(&key) {
            return Ok(Arc::clone(kernel));
        }
        let kernel = Arc::new(builder.build(grid, profile)?);
        self.entries.insert(key, Arc::clone(&kernel));
        Ok(kernel)
    }

    /// Cached kernel, if any.
    #[must_use]
    pub fn get(&self, key: &KernelCacheKey) -> Option<Arc<KernelGrid>> {
        self.entries.get(key).cloned()
    }

    /// Number of cached kernels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
