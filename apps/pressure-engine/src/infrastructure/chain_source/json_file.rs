//! JSON file chain source.
//!
//! Reads `<dir>/<SYMBOL>.json`, each file holding one serialized
//! [`ChainSnapshot`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::ports::{ChainSourceError, ChainSourcePort};
use crate::domain::chain::ChainSnapshot;
use crate::domain::shared::Symbol;

/// Directory-backed implementation of `ChainSourcePort`.
#[derive(Debug, Clone)]
pub struct JsonFileChainSource {
    dir: PathBuf,
}

impl JsonFileChainSource {
    /// Read snapshots from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory being read.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for `symbol`.
    #[must_use]
    pub fn path_for(&self, symbol: &Symbol) -> PathBuf {
        self.dir.join(format!("{}.json", symbol.as_str()))
    }
}

#[async_trait]
impl ChainSourcePort for JsonFileChainSource {
    async fn fetch_chain(&self, symbol: &Symbol) -> Result<ChainSnapshot, ChainSourceError> {
        let path = self.path_for(symbol);
        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ChainSourceError::NotFound {
                    symbol: symbol.to_string(),
                }
            } else {
                ChainSourceError::Unavailable {
                    message: format!("{}: {e}", path.display()),
                }
            }
        })?;

        let snapshot: ChainSnapshot = serde_json::from_str(&contents).map_err(|e| ChainSourceError::Malformed {
            symbol: symbol.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!(
            symbol = %symbol,
            rows = snapshot.rows.len(),
            path = %path.display(),
            "Loaded chain snapshot"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"{
        "symbol": "SPY",
        "as_of": "2026-01-21T15:00:00Z",
        "rows": [
            {
                "symbol": "SPY",
                "underlying_price": "450.00",
                "expiry": "2026-02-20",
                "strike": "460",
                "type": "C",
                "volume": 120,
                "open_interest": 5000,
                "gamma": 0.01,
                "vanna": 0.02,
                "charm": -0.1,
                "implied_vol": 0.2
            }
        ]
    }"#;

    #[tokio::test]
    async fn reads_snapshot_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("SPY.json"), SNAPSHOT).unwrap();

        let source = JsonFileChainSource::new(dir.path());
        let snapshot = source.fetch_chain(&Symbol::new("spy")).await.unwrap();

        assert_eq!(snapshot.symbol, Symbol::new("SPY"));
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.rows[0].open_interest, 5000);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let source = JsonFileChainSource::new(dir.path());
        let err = source.fetch_chain(&Symbol::new("QQQ")).await.unwrap_err();
        assert!(matches!(err, ChainSourceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("SPY.json"), "{not json").unwrap();
        let source = JsonFileChainSource::new(dir.path());
        let err = source.fetch_chain(&Symbol::new("SPY")).await.unwrap_err();
        assert!(matches!(err, ChainSourceError::Malformed { .. }));
    }
}
