//! Shared Value Objects
//!
//! Immutable domain types compared by value, not identity.

mod symbol;
mod timestamp;

pub use symbol::Symbol;
pub use timestamp::Timestamp;
