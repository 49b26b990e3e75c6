//! Domain Layer
//!
//! Pure computation with no I/O. Every component is a stateless value that
//! can be shared across threads.
//!
//! # Pipeline
//!
//! - [`chain`]: raw rows, validation and normalization
//! - [`dealer_sign`]: dealer position sign heuristics
//! - [`field`]: dollar exposures binned on the moneyness grid
//! - [`kernel`]: liquidity profile and Green's kernel
//! - [`potential`]: convolution and shape diagnostics
//! - [`elasticity`]: directional resistance and movement energy
//! - [`regime`]: multi-dimension regime labels
//! - [`engine`]: orchestration and the output record

pub mod chain;
pub mod dealer_sign;
pub mod elasticity;
pub mod engine;
pub mod field;
pub mod kernel;
pub mod potential;
pub mod regime;
pub mod shared;
