//! Dealer positioning heuristic selection.

use serde::{Deserialize, Serialize};

use crate::domain::dealer_sign::DealerSignConvention;

/// Dealer-sign estimator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DealerSignConfig {
    /// Convention applied to rows without an explicit dealer sign.
    #[serde(default)]
    pub convention: DealerSignConvention,
}
