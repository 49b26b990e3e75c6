//! In-memory chain source for tests and embedding hosts.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{ChainSourceError, ChainSourcePort};
use crate::domain::chain::ChainSnapshot;
use crate::domain::shared::Symbol;

/// In-memory implementation of `ChainSourcePort`.
///
/// Holds the latest snapshot per symbol; inserting replaces the previous one.
#[derive(Debug, Default)]
pub struct InMemoryChainSource {
    snapshots: RwLock<HashMap<Symbol, ChainSnapshot>>,
}

impl InMemoryChainSource {
    /// Create a new empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `snapshot` as the latest for its symbol.
    pub fn insert(&self, snapshot: ChainSnapshot) {
        let mut snapshots = self.snapshots.write().unwrap_or_else(PoisonError::into_inner);
        snapshots.insert(snapshot.symbol.clone(), snapshot);
    }

    /// Number of symbols held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no symbol is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ChainSourcePort for InMemoryChainSource {
    async fn fetch_chain(&self, symbol: &Symbol) -> Result<ChainSnapshot, ChainSourceError> {
        let snapshots = self.snapshots.read().unwrap_or_else(PoisonError::into_inner);
        snapshots
            .get(symbol)
            .cloned()
            .ok_or_else(|| ChainSourceError::NotFound {
                symbol: symbol.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Timestamp;

    #[tokio::test]
    async fn returns_latest_snapshot() {
        let source = InMemoryChainSource::new();
        let symbol = Symbol::new("SPY");
        source.insert(ChainSnapshot::new(symbol.clone(), Timestamp::parse("2026-01-20T15:00:00Z").unwrap(), vec![]));
        let latest = Timestamp::parse("2026-01-21T15:00:00Z").unwrap();
        source.insert(ChainSnapshot::new(symbol.clone(), latest, vec![]));

        assert_eq!(source.len(), 1);
        assert_eq!(source.fetch_chain(&symbol).await.unwrap().as_of, latest);
    }

    #[tokio::test]
    async fn unknown_symbol_is_not_found() {
        let source = InMemoryChainSource::new();
        assert!(source.is_empty());
        let err = source.fetch_chain(&Symbol::new("XYZ")).await.unwrap_err();
        assert!(matches!(err, ChainSourceError::NotFound { symbol } if symbol == "XYZ"));
    }
}
