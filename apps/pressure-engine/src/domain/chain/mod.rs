//! Option Chain
//!
//! Raw chain rows as adapters deliver them, the validated contract row the
//! engine computes on, and the normalizer between the two.

pub mod normalizer;
pub mod row;
mod snapshot;

pub use normalizer::{ChainNormalizer, DropReason, NormalizationStats, NormalizedChain};
pub use row::{ChainRow, ChainRowInput, OptionType, RawChainRow};
pub use snapshot::{ChainSnapshot, MarketContext};
