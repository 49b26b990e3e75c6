//! Shared Domain Types
//!
//! Value objects shared across the engine's components.

pub mod value_objects;

pub use value_objects::{Symbol, Timestamp};
