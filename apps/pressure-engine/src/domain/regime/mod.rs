//! Regime Classification
//!
//! Five independent dimensions: gamma, vanna, charm, jump risk and potential
//! shape. Thresholds come from configuration.

mod classifier;
mod labels;

pub use classifier::{RegimeClassifier, RegimeInputs};
pub use labels::{
    CharmRegime, Classified, GammaRegime, JumpRiskRegime, PotentialShape, RegimeLabel, VannaRegime,
};
