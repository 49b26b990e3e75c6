//! Chain Source Adapters
//!
//! Implementations of `ChainSourcePort`.

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryChainSource;
pub use json_file::JsonFileChainSource;
