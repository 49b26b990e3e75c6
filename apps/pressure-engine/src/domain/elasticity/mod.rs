//! Elasticity and Movement Energy
//!
//! Elasticity is the modeled resistance of price to movement on each side of
//! spot: base liquidity resistance scaled by a hedge multiplier that stiffens
//! when dealers are long gamma and softens, down to a positive floor, when
//! they are short. Movement energy is net pressure per unit elasticity.

mod calculator;

pub use calculator::{
    Direction, ElasticityCalculator, ElasticityInputs, ElasticityOutput, ElasticityReport,
    MovementEnergyOutput, SideState,
};
