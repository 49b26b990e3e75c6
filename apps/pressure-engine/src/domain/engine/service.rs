//! Hedge-pressure engine service.
//!
//! Runs the full pipeline for one snapshot: normalize, sign, aggregate,
//! build the kernel, convolve, derive elasticity and classify. Each call is
//! independent; the engine holds only validated, read-only configuration.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use super::output::{
    DEGRADED_MISSING_GREEKS, EngineOutput, FEATURE_KEYS, OUTPUT_KIND, insert_regime_metadata,
};
use crate::config::EngineConfig;
use crate::domain::chain::{ChainNormalizer, ChainSnapshot, MarketContext, NormalizationStats, NormalizedChain};
use crate::domain::dealer_sign::DealerSignEstimator;
use crate::domain::elasticity::{ElasticityCalculator, ElasticityInputs};
use crate::domain::field::{AggregatedFields, FieldAggregator, SpatialGrid};
use crate::domain::kernel::{KernelBuilder, KernelCache, KernelCacheKey, KernelGrid, LiquidityProfile};
use crate::domain::potential::PotentialConvolver;
use crate::domain::regime::{RegimeClassifier, RegimeInputs};
use crate::error::EngineError;
use crate::observability::{
    record_analysis, record_confidence, record_kernel_build, record_numeric_defect,
    record_rows_dropped,
};

/// Dealer hedge-pressure field engine.
#[derive(Debug, Clone)]
pub struct HedgePressureEngine {
    config: Arc<EngineConfig>,
    grid: SpatialGrid,
    normalizer: ChainNormalizer,
    estimator: DealerSignEstimator,
    kernel_builder: KernelBuilder,
    convolver: PotentialConvolver,
    elasticity: ElasticityCalculator,
    classifier: RegimeClassifier,
}

/// A chain after normalization, signing and aggregation.
struct PreparedChain {
    stats: NormalizationStats,
    fields: AggregatedFields,
    profile: LiquidityProfile,
    explicit_signs: usize,
    estimated_signs: usize,
}

impl HedgePressureEngine {
    /// Create an engine from configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the configuration fails validation.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::from_shared(Arc::new(config))
    }

    /// Create an engine sharing an already loaded configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the configuration fails validation.
    pub fn from_shared(config: Arc<EngineConfig>) -> Result<Self, EngineError> {
        config
            .validate()
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            grid: SpatialGrid::new(&config.grid)?,
            normalizer: ChainNormalizer::new(&config.exposure),
            estimator: DealerSignEstimator::new(config.dealer_sign.convention),
            kernel_builder: KernelBuilder::new(&config.kernel)?,
            convolver: PotentialConvolver::new(config.weights),
            elasticity: ElasticityCalculator::new(config.elasticity, config.weights, config.kernel.kappa),
            classifier: RegimeClassifier::new(config.regime.clone()),
            config,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Spatial grid.
    #[must_use]
    pub const fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Analyze one snapshot.
    ///
    /// Snapshots with no usable rows produce the degraded output, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Numeric defects (`SingularKernel`, `DegenerateKernelMass`,
    /// `NonPositiveElasticity`, `NonFiniteField`).
    pub fn analyze(&self, snapshot: &ChainSnapshot, market: &MarketContext) -> Result<EngineOutput, EngineError> {
        self.instrumented(snapshot, market, None)
    }

    /// Analyze one snapshot, reusing kernels from `cache` when present.
    ///
    /// # Errors
    ///
    /// Same as [`Self::analyze`].
    pub fn analyze_with_cache(
        &self,
        snapshot: &ChainSnapshot,
        market: &MarketContext,
        cache: &KernelCache,
    ) -> Result<EngineOutput, EngineError> {
        self.instrumented(snapshot, market, Some(cache))
    }

    /// Analyze independent snapshots in parallel.
    ///
    /// Results keep the input order.
    #[must_use]
    pub fn analyze_batch(&self, jobs: &[(ChainSnapshot, MarketContext)]) -> Vec<Result<EngineOutput, EngineError>> {
        jobs.par_iter()
            .map(|(snapshot, market)| self.instrumented(snapshot, market, None))
            .collect()
    }

    /// [`Self::analyze_batch`] reading kernels from `cache`.
    #[must_use]
    pub fn analyze_batch_with_cache(
        &self,
        jobs: &[(ChainSnapshot, MarketContext)],
        cache: &KernelCache,
    ) -> Vec<Result<EngineOutput, EngineError>> {
        jobs.par_iter()
            .map(|(snapshot, market)| self.instrumented(snapshot, market, Some(cache)))
            .collect()
    }

    /// Build the kernel `snapshot` would need and store it in `cache`.
    ///
    /// Returns `None` for a snapshot with no usable rows.
    ///
    /// # Errors
    ///
    /// Kernel build failures.
    pub fn warm_cache(
        &self,
        cache: &mut KernelCache,
        snapshot: &ChainSnapshot,
    ) -> Result<Option<Arc<KernelGrid>>, EngineError> {
        match self.prepare(snapshot)? {
            Some(prepared) => cache
                .warm(&self.kernel_builder, &self.grid, &prepared.profile)
                .map(Some),
            None => Ok(None),
        }
    }

    fn instrumented(
        &self,
        snapshot: &ChainSnapshot,
        market: &MarketContext,
        cache: Option<&KernelCache>,
    ) -> Result<EngineOutput, EngineError> {
        let started = Instant::now();
        let span = tracing::info_span!("analyze", symbol = %snapshot.symbol, rows = snapshot.rows.len());
        let _entered = span.enter();

        let result = self.run(snapshot, market, cache);
        let elapsed = started.elapsed().as_secs_f64();
        let symbol = snapshot.symbol.as_str();

        match &result {
            Ok(output) => {
                let status = if output.is_degraded() { "degraded" } else { "ok" };
                record_analysis(symbol, status, output.regime.as_str(), elapsed);
                record_confidence(symbol, output.confidence);
            }
            Err(e) => {
                if e.is_numeric_defect() {
                    record_numeric_defect(e.code().reason());
                }
                record_analysis(symbol, "error", "none", elapsed);
                tracing::error!(error = %e, code = %e.code(), "Hedge-pressure analysis failed");
            }
        }
        result
    }

    fn prepare(&self, snapshot: &ChainSnapshot) -> Result<Option<PreparedChain>, EngineError> {
        let normalized = self.normalizer.normalize(&snapshot.rows, snapshot.as_of);
        for (reason, count) in normalized.stats.drops() {
            record_rows_dropped(reason.as_str(), count);
        }

        let Some(spot) = normalized.spot() else {
            return Ok(None);
        };

        let NormalizedChain { rows, stats } = normalized;
        let (rows, sign_stats) = self.estimator.assign(rows, spot);
        let fields = FieldAggregator::new(&self.grid, &self.config.exposure).aggregate(&rows, spot);
        let profile = LiquidityProfile::from_config(&self.config.liquidity, &fields.volume)?;

        Ok(Some(PreparedChain {
            stats,
            fields,
            profile,
            explicit_signs: sign_stats.explicit,
            estimated_signs: sign_stats.estimated,
        }))
    }

    fn kernel(&self, profile: &LiquidityProfile, cache: Option<&KernelCache>) -> Result<Arc<KernelGrid>, EngineError> {
        let started = Instant::now();
        if let Some(kernel) = cache.and_then(|c| c.get(&KernelCacheKey::new(&self.kernel_builder, &self.grid, profile))) {
            record_kernel_build(kernel.branch().as_str(), true, started.elapsed().as_secs_f64());
            return Ok(kernel);
        }
        let kernel = self.kernel_builder.build(&self.grid, profile)?;
        record_kernel_build(kernel.branch().as_str(), false, started.elapsed().as_secs_f64());
        Ok(Arc::new(kernel))
    }

    fn run(
        &self,
        snapshot: &ChainSnapshot,
        market: &MarketContext,
        cache: Option<&KernelCache>,
    ) -> Result<EngineOutput, EngineError> {
        let Some(prepared) = self.prepare(snapshot)? else {
            tracing::warn!(
                symbol = %snapshot.symbol,
                rows = snapshot.rows.len(),
                "No usable chain rows; returning degraded output"
            );
            return Ok(EngineOutput::degraded(
                snapshot.symbol.clone(),
                snapshot.as_of,
                DEGRADED_MISSING_GREEKS,
            ));
        };

        let PreparedChain {
            stats,
            fields,
            profile,
            explicit_signs,
            estimated_signs,
        } = prepared;
        let center = self.grid.center_index();

        let kernel = self.kernel(&profile, cache)?;
        let source = self.convolver.source(&fields)?;
        let potential = self.convolver.convolve(&source, &kernel)?;
        let shape = potential.shape_at(center);

        let dealer_gamma_sign = fields.dealer_gamma_sign();
        let report = self.elasticity.compute(&ElasticityInputs {
            source: &source,
            gamma: &fields.gamma,
            vanna: &fields.vanna,
            liquidity: &profile,
            center,
            dealer_gamma_sign,
        })?;

        let volatility_index = market.volatility_index();
        if volatility_index.is_none() {
            tracing::warn!(symbol = %snapshot.symbol, "No volatility index; vanna and jump-risk confidence degraded");
        }
        let vol_of_vol = market.vol_of_vol().unwrap_or(fields.vol_of_vol);

        let regimes = self.classifier.classify(&RegimeInputs {
            gamma_pressure: fields.gamma_total,
            vanna_pressure: fields.vanna_total,
            charm_pressure: fields.charm_total,
            gamma_up: report.up.gamma,
            gamma_down: report.down.gamma,
            weighted_dte: fields.weighted_dte,
            vol_of_vol,
            volatility_index,
            curvature_acceleration: shape.curvature_acceleration,
            data_quality: stats.data_quality(),
        });

        let aggregator = FieldAggregator::new(&self.grid, &self.config.exposure);
        let gamma_flip = aggregator.gamma_flip(&fields.gamma);
        let (gamma_peak, gamma_trough) = aggregator.gamma_extremes(&fields.gamma);

        let values = [
            fields.gamma_total,
            fields.vanna_total,
            fields.charm_total,
            dealer_gamma_sign.value(),
            report.up.pressure,
            report.down.pressure,
            report.net_pressure,
            report.elasticity.up(),
            report.elasticity.down(),
            report.energy.up,
            report.energy.down,
            report.energy.asymmetry(),
            report.up.psi,
            report.down.psi,
            shape.potential_at_spot,
            shape.slope,
            shape.curvature,
            shape.curvature_acceleration,
            vol_of_vol,
            fields.weighted_dte,
            gamma_flip.unwrap_or(0.0),
            gamma_peak.unwrap_or(0.0),
            gamma_trough.unwrap_or(0.0),
            stats.total as f64,
            stats.kept as f64,
            fields.rows_binned as f64,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::NonFiniteField { stage: "features" });
        }
        let features: BTreeMap<String, f64> = FEATURE_KEYS
            .iter()
            .zip(values)
            .map(|(k, v)| ((*k).to_string(), v))
            .collect();

        let mut metadata = BTreeMap::new();
        let mut note = |key: &str, value: String| {
            metadata.insert(key.to_string(), value);
        };
        note("dealer_sign_convention", self.estimator.convention().to_string());
        note("dealer_sign_explicit_rows", explicit_signs.to_string());
        note("dealer_sign_estimated_rows", estimated_signs.to_string());
        note("kernel_branch", kernel.branch().as_str().to_string());
        note("liquidity_profile", self.config.liquidity.profile.as_str().to_string());
        note("volatility_index", volatility_index.map_or_else(|| "missing".to_string(), |v| v.to_string()));
        note("gamma_flip", if gamma_flip.is_some() { "found" } else { "none" }.to_string());
        note("rows_outside_grid", fields.rows_outside_grid.to_string());
        note("rows_unplaced", fields.rows_unplaced.to_string());
        for (reason, count) in stats.drops() {
            note(&format!("dropped.{}", reason.as_str()), count.to_string());
        }
        insert_regime_metadata(&mut metadata, &regimes);

        let confidence = regimes.confidence();
        tracing::info!(
            symbol = %snapshot.symbol,
            regime = regimes.gamma.label.as_str(),
            confidence,
            gamma_pressure = fields.gamma_total,
            net_pressure = report.net_pressure,
            kernel = kernel.branch().as_str(),
            "Hedge-pressure analysis complete"
        );

        Ok(EngineOutput {
            kind: OUTPUT_KIND.to_string(),
            symbol: snapshot.symbol.clone(),
            timestamp: snapshot.as_of,
            features,
            confidence,
            regime: regimes.gamma.label,
            regimes,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::domain::chain::{OptionType, RawChainRow};
    use crate::domain::kernel::{KernelBranch, LiquidityProfileKind};
    use crate::domain::shared::{Symbol, Timestamp};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn now() -> Timestamp {
        Timestamp::parse("2026-01-21T15:00:00Z").unwrap()
    }

    fn raw(option_type: OptionType, strike: Decimal, oi: i64) -> RawChainRow {
        RawChainRow {
            symbol: "SPY".to_string(),
            underlying_price: dec!(450),
            expiry: NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
            dte: None,
            strike,
            option_type,
            mid_price: None,
            bid: None,
            ask: None,
            volume: 100,
            open_interest: oi,
            delta: None,
            gamma: Some(0.01),
            vega: None,
            theta: None,
            vanna: Some(0.02),
            charm: Some(-0.1),
            implied_vol: Some(0.2),
            multiplier: None,
            dealer_sign: None,
        }
    }

    fn snapshot(rows: Vec<RawChainRow>) -> ChainSnapshot {
        ChainSnapshot::new(Symbol::new("SPY"), now(), rows)
    }

    fn engine() -> HedgePressureEngine {
        HedgePressureEngine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EngineConfig {
            grid: GridConfig {
                bin_count: 100,
                range_std: 4.0,
            },
            ..EngineConfig::default()
        };
        assert!(matches!(
            HedgePressureEngine::new(config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_snapshot_is_degraded() {
        let out = engine().analyze(&snapshot(vec![]), &MarketContext::default()).unwrap();
        assert!(out.is_degraded());
        assert_eq!(out.confidence, 0.0);
    }

    #[test]
    fn every_feature_key_is_present() {
        let rows = vec![
            raw(OptionType::Call, dec!(460), 1_000),
            raw(OptionType::Put, dec!(440), 1_000),
        ];
        let out = engine()
            .analyze(&snapshot(rows), &MarketContext::with_volatility_index(18.0))
            .unwrap();
        for key in FEATURE_KEYS {
            assert!(out.features.contains_key(key), "missing feature {key}");
        }
        assert!(!out.is_degraded());
        assert_eq!(out.metadata["dealer_sign_convention"], "short_otm");
        assert_eq!(out.metadata["dealer_sign_estimated_rows"], "2");
        assert_eq!(out.metadata["kernel_branch"], "analytic");
        assert_eq!(out.feature("rows_used"), Some(2.0));
        assert!(out.feature("elasticity_up").unwrap() > 0.0);
        assert!(out.confidence > 0.0 && out.confidence <= 1.0);
    }

    #[test]
    fn volume_weighted_profile_uses_tridiagonal_kernel() {
        let mut config = EngineConfig::default();
        config.liquidity.profile = LiquidityProfileKind::VolumeWeighted;
        let engine = HedgePressureEngine::new(config).unwrap();
        let mut busy = raw(OptionType::Call, dec!(455), 500);
        busy.volume = 10_000;
        let rows = vec![busy, raw(OptionType::Put, dec!(445), 500)];
        let out = engine.analyze(&snapshot(rows), &MarketContext::default()).unwrap();
        assert_eq!(out.metadata["kernel_branch"], KernelBranch::Tridiagonal.as_str());
        assert_eq!(out.metadata["liquidity_profile"], "volume_weighted");
    }

    #[test]
    fn cached_kernel_gives_identical_output() {
        let engine = engine();
        let snap = snapshot(vec![raw(OptionType::Call, dec!(460), 2_000)]);
        let market = MarketContext::with_volatility_index(20.0);

        let mut cache = KernelCache::new();
        assert!(engine.warm_cache(&mut cache, &snap).unwrap().is_some());
        assert_eq!(cache.len(), 1);

        let cached = engine.analyze_with_cache(&snap, &market, &cache).unwrap();
        let fresh = engine.analyze(&snap, &market).unwrap();
        assert_eq!(cached, fresh);
    }

    #[test]
    fn batch_preserves_order() {
        let engine = engine();
        let jobs = vec![
            (snapshot(vec![]), MarketContext::default()),
            (
                snapshot(vec![raw(OptionType::Call, dec!(460), 2_000)]),
                MarketContext::default(),
            ),
        ];
        let results = engine.analyze_batch(&jobs);
        assert_eq!(results.len(), 2);
        assert!(results[0].as_ref().unwrap().is_degraded());
        assert!(!results[1].as_ref().unwrap().is_degraded());
    }

    #[test]
    fn market_vol_of_vol_overrides_chain_estimate() {
        let market = MarketContext {
            volatility_index: Some(20.0),
            vol_of_vol: Some(0.9),
        };
        let out = engine()
            .analyze(&snapshot(vec![raw(OptionType::Call, dec!(460), 2_000)]), &market)
            .unwrap();
        assert_eq!(out.feature("vol_of_vol"), Some(0.9));
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HedgePressureEngine>();
    }
}
