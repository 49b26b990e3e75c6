use serde::Serialize;

use crate::config::{AggregationWeights, ElasticityConfig};
use crate::domain::dealer_sign::DealerSign;
use crate::domain::field::FieldVector;
use crate::domain::kernel::LiquidityProfile;
use crate::error::EngineError;

/// Move direction relative to spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Grid points above spot.
    Up,
    /// Grid points below spot.
    Down,
}

impl Direction {
    /// Stable name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Directional elasticity; both sides strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElasticityOutput {
    up: f64,
    down: f64,
}

impl ElasticityOutput {
    /// Validate a pair of elasticities.
    ///
    /// # Errors
    ///
    /// `NonPositiveElasticity` for the first side that is zero, negative or
    /// non-finite.
    pub fn new(up: f64, down: f64) -> Result<Self, EngineError> {
        for (direction, value) in [(Direction::Up, up), (Direction::Down, down)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::NonPositiveElasticity {
                    direction: direction.as_str(),
                    value,
                });
            }
        }
        Ok(Self { up, down })
    }

    /// Upward elasticity.
    #[must_use]
    pub const fn up(&self) -> f64 {
        self.up
    }

    /// Downward elasticity.
    #[must_use]
    pub const fn down(&self) -> f64 {
        self.down
    }
}

/// Pressure magnitude per unit elasticity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovementEnergyOutput {
    /// `|net_pressure| / elasticity_up`.
    pub up: f64,
    /// `|net_pressure| / elasticity_down`.
    pub down: f64,
}

impl MovementEnergyOutput {
    /// Energy for `net_pressure` against `elasticity`.
    #[must_use]
    pub fn new(net_pressure: f64, elasticity: &ElasticityOutput) -> Self {
        let magnitude = net_pressure.abs();
        Self {
            up: magnitude / elasticity.up(),
            down: magnitude / elasticity.down(),
        }
    }

    /// `up − down`.
    #[must_use]
    pub fn asymmetry(&self) -> f64 {
        self.up - self.down
    }
}

/// Per-side quantities behind one elasticity value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SideState {
    /// Σ combined source on the side.
    pub pressure: f64,
    /// Σ gamma exposure on the side.
    pub gamma: f64,
    /// Σ vanna exposure on the side.
    pub vanna: f64,
    /// Dimensionless hedge pressure Ψ.
    pub psi: f64,
    /// `mean(λ) × κ`.
    pub base_resistance: f64,
    /// Hedge multiplier applied to the base resistance.
    pub multiplier: f64,
}

/// Everything the calculator derives from one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElasticityReport {
    /// Above spot.
    pub up: SideState,
    /// Below spot.
    pub down: SideState,
    /// `pressure_up + pressure_down`.
    pub net_pressure: f64,
    /// Validated elasticities.
    pub elasticity: ElasticityOutput,
    /// Movement energy.
    pub energy: MovementEnergyOutput,
}

/// Fields the calculator reads.
#[derive(Debug, Clone, Copy)]
pub struct ElasticityInputs<'a> {
    /// Combined weighted source `S`.
    pub source: &'a FieldVector,
    /// Gamma field.
    pub gamma: &'a FieldVector,
    /// Vanna field.
    pub vanna: &'a FieldVector,
    /// Liquidity λ(x).
    pub liquidity: &'a LiquidityProfile,
    /// Spot grid index.
    pub center: usize,
    /// Net dealer gamma sign, used on sides without gamma.
    pub dealer_gamma_sign: DealerSign,
}

/// Computes directional elasticity and movement energy.
#[derive(Debug, Clone, Copy)]
pub struct ElasticityCalculator {
    config: ElasticityConfig,
    weights: AggregationWeights,
    kappa: f64,
}

impl ElasticityCalculator {
    /// Create a calculator.
    #[must_use]
    pub const fn new(config: ElasticityConfig, weights: AggregationWeights, kappa: f64) -> Self {
        Self {
            config,
            weights,
            kappa,
        }
    }

    /// `1 + k_long·|Ψ|` long gamma, `max(ε, 1 − k_short·|Ψ|)` short gamma,
    /// `1` flat.
    #[must_use]
    pub fn hedge_multiplier(&self, psi: f64, gamma_sign: DealerSign) -> f64 {
        match gamma_sign {
            DealerSign::Long => 1.0 + self.config.k_long * psi.abs(),
            DealerSign::Short => (1.0 - self.config.k_short * psi.abs()).max(self.config.floor),
            DealerSign::Flat => 1.0,
        }
    }

    /// Derive per-side state, elasticity and energy.
    ///
    /// # Errors
    ///
    /// `GridMismatch` when inputs disagree in length; `NonPositiveElasticity`
    /// when either side fails the positivity invariant.
    pub fn compute(&self, inputs: &ElasticityInputs<'_>) -> Result<ElasticityReport, EngineError> {
        let n = inputs.source.len();
        for len in [inputs.gamma.len(), inputs.vanna.len(), inputs.liquidity.len()] {
            if len != n {
                return Err(EngineError::GridMismatch {
                    expected: n,
                    actual: len,
                });
            }
        }

        let c = inputs.center;
        let (pressure_down, pressure_up) = inputs.source.side_sums(c);
        let (gamma_down, gamma_up) = inputs.gamma.side_sums(c);
        let (vanna_down, vanna_up) = inputs.vanna.side_sums(c);

        let gross = self.weights.gamma.abs() * inputs.gamma.abs_sum()
            + self.weights.vanna.abs() * inputs.vanna.abs_sum();

        let lambda_up = inputs.liquidity.mean_over(c..n);
        let lambda_down = inputs.liquidity.mean_over(0..c + 1);

        let up = self.side(pressure_up, gamma_up, vanna_up, gross, lambda_up, inputs.dealer_gamma_sign);
        let down = self.side(
            pressure_down,
            gamma_down,
            vanna_down,
            gross,
            lambda_down,
            inputs.dealer_gamma_sign,
        );

        let elasticity = ElasticityOutput::new(
            up.base_resistance * up.multiplier,
            down.base_resistance * down.multiplier,
        )?;
        let net_pressure = pressure_up + pressure_down;
        let energy = MovementEnergyOutput::new(net_pressure, &elasticity);

        tracing::debug!(
            elasticity_up = elasticity.up(),
            elasticity_down = elasticity.down(),
            psi_up = up.psi,
            psi_down = down.psi,
            net_pressure,
            "Computed elasticity"
        );

        Ok(ElasticityReport {
            up,
            down,
            net_pressure,
            elasticity,
            energy,
        })
    }

    fn side(
        &self,
        pressure: f64,
        gamma: f64,
        vanna: f64,
        gross: f64,
        mean_lambda: f64,
        fallback_sign: DealerSign,
    ) -> SideState {
        let psi = if gross > 0.0 {
            (self.weights.gamma * gamma + self.weights.vanna * vanna) / gross
        } else {
            0.0
        };
        let gamma_sign = match DealerSign::of(gamma) {
            DealerSign::Flat => fallback_sign,
            sign => sign,
        };
        SideState {
            pressure,
            gamma,
            vanna,
            psi,
            base_resistance: mean_lambda * self.kappa,
            multiplier: self.hedge_multiplier(psi, gamma_sign),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn calculator() -> ElasticityCalculator {
        ElasticityCalculator::new(ElasticityConfig::default(), AggregationWeights::default(), 1.0)
    }

    fn field(values: &[f64]) -> FieldVector {
        FieldVector::from(values.to_vec())
    }

    #[test]
    fn short_gamma_above_spot_softens_upside() {
        let gamma = field(&[0.0, 0.0, 0.0, -4.0, 0.0]);
        let vanna = field(&[0.0; 5]);
        let liquidity = LiquidityProfile::uniform(5, 1.0).unwrap();
        let report = calculator()
            .compute(&ElasticityInputs {
                source: &gamma,
                gamma: &gamma,
                vanna: &vanna,
                liquidity: &liquidity,
                center: 2,
                dealer_gamma_sign: DealerSign::Short,
            })
            .unwrap();

        assert_eq!(report.up.psi, -1.0);
        assert!((report.up.multiplier - 0.2).abs() < 1e-12);
        assert_eq!(report.down.multiplier, 1.0);
        assert!(report.elasticity.up() < report.elasticity.down());
        assert_eq!(report.net_pressure, -4.0);
        assert!(report.energy.asymmetry() > 0.0);
    }

    #[test]
    fn long_gamma_stiffens() {
        let calc = calculator();
        assert_eq!(calc.hedge_multiplier(0.5, DealerSign::Long), 1.5);
        assert_eq!(calc.hedge_multiplier(-0.5, DealerSign::Long), 1.5);
        assert_eq!(calc.hedge_multiplier(0.5, DealerSign::Flat), 1.0);
    }

    #[test]
    fn short_gamma_multiplier_is_floored() {
        let calc = calculator();
        assert_eq!(calc.hedge_multiplier(10.0, DealerSign::Short), 0.05);
    }

    #[test]
    fn side_without_gamma_uses_dealer_sign() {
        let calc = calculator();
        let state = calc.side(0.0, 0.0, 3.0, 6.0, 1.0, DealerSign::Short);
        assert_eq!(state.psi, 0.5);
        assert!((state.multiplier - 0.6).abs() < 1e-12);
    }

    #[test]
    fn elasticity_rejects_non_positive() {
        assert!(matches!(
            ElasticityOutput::new(1.0, 0.0),
            Err(EngineError::NonPositiveElasticity { direction: "down", .. })
        ));
        assert!(matches!(
            ElasticityOutput::new(f64::NAN, 1.0),
            Err(EngineError::NonPositiveElasticity { direction: "up", .. })
        ));
    }

    #[test]
    fn energy_is_linear_in_net_pressure() {
        let e = ElasticityOutput::new(2.0, 4.0).unwrap();
        let one = MovementEnergyOutput::new(-10.0, &e);
        let three = MovementEnergyOutput::new(-30.0, &e);
        assert_eq!(one.up, 5.0);
        assert_eq!(three.up, 3.0 * one.up);
        assert_eq!(three.down, 3.0 * one.down);
        assert_eq!(one.asymmetry(), 2.5);
    }

    proptest! {
        /// Elasticity stays strictly positive for any valid coefficients,
        /// liquidity and exposure.
        #[test]
        fn elasticity_is_always_positive(
            gamma in prop::collection::vec(-1e12f64..1e12, 11),
            vanna in prop::collection::vec(-1e10f64..1e10, 11),
            lambdas in prop::collection::vec(0.01f64..100.0, 11),
            k_long in 0.0f64..10.0,
            k_short in 0.0f64..10.0,
            floor in 0.001f64..1.0,
            kappa in 0.01f64..10.0,
        ) {
            let calc = ElasticityCalculator::new(
                ElasticityConfig { k_long, k_short, floor },
                AggregationWeights::default(),
                kappa,
            );
            let gamma = FieldVector::from(gamma);
            let vanna = FieldVector::from(vanna);
            let source = FieldVector::weighted_sum(&[(1.0, &gamma), (1.0, &vanna)]).unwrap();
            let liquidity = LiquidityProfile::new(lambdas).unwrap();
            let report = calc.compute(&ElasticityInputs {
                source: &source,
                gamma: &gamma,
                vanna: &vanna,
                liquidity: &liquidity,
                center: 5,
                dealer_gamma_sign: DealerSign::of(gamma.sum()),
            }).unwrap();
            prop_assert!(report.elasticity.up() > 0.0);
            prop_assert!(report.elasticity.down() > 0.0);
            prop_assert!(report.up.psi.abs() <= 1.0 + 1e-12);
        }
    }
}
