//! Hedge-Pressure Engine Integration Tests
//!
//! Synthetic chains through the public engine API: degraded handling,
//! gamma regimes, elasticity asymmetry and energy scaling.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use pressure_engine::domain::elasticity::{ElasticityOutput, MovementEnergyOutput};
use pressure_engine::domain::engine::{DEGRADED_KEY, DEGRADED_MISSING_GREEKS};
use pressure_engine::{
    ChainSnapshot, EngineConfig, EngineError, FEATURE_KEYS, GammaRegime, HedgePressureEngine,
    MarketContext, OptionType, RawChainRow, Symbol, Timestamp, load_config_from_string,
};

// =============================================================================
// Fixtures
// =============================================================================

const AS_OF: &str = "2026-01-21T15:00:00Z";

fn expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
}

fn row(option_type: OptionType, strike: Decimal, open_interest: i64, gamma: f64, dealer_sign: Option<i8>) -> RawChainRow {
    RawChainRow {
        symbol: "SPY".to_string(),
        underlying_price: dec!(450),
        expiry: expiry(),
        dte: None,
        strike,
        option_type,
        mid_price: None,
        bid: None,
        ask: None,
        volume: 250,
        open_interest,
        delta: None,
        gamma: Some(gamma),
        vega: None,
        theta: None,
        vanna: Some(0.0),
        charm: Some(0.0),
        implied_vol: Some(0.2),
        multiplier: None,
        dealer_sign,
    }
}

fn snapshot(symbol: &str, as_of: &str, rows: Vec<RawChainRow>) -> ChainSnapshot {
    ChainSnapshot::new(Symbol::new(symbol), Timestamp::parse(as_of).unwrap(), rows)
}

fn engine() -> HedgePressureEngine {
    HedgePressureEngine::new(EngineConfig::default()).unwrap()
}

fn vix(level: f64) -> MarketContext {
    MarketContext::with_volatility_index(level)
}

// =============================================================================
// Degraded handling
// =============================================================================

#[test]
fn degraded_output_is_identical_across_symbols_and_times() {
    let mut invalid = row(OptionType::Call, dec!(460), 1_000, 0.01, None);
    invalid.gamma = None;

    let engine = engine();
    let a = engine
        .analyze(&snapshot("SPY", AS_OF, vec![invalid.clone()]), &vix(18.0))
        .unwrap();
    let b = engine
        .analyze(&snapshot("QQQ", "2026-03-02T14:30:00Z", vec![]), &MarketContext::default())
        .unwrap();

    for out in [&a, &b] {
        assert_eq!(out.confidence, 0.0);
        assert_eq!(out.metadata[DEGRADED_KEY], DEGRADED_MISSING_GREEKS);
        assert_eq!(out.regime, GammaRegime::Neutral);
    }
    assert_eq!(a.features, b.features);
    assert_eq!(a.regimes, b.regimes);
    assert_eq!(a.metadata, b.metadata);
}

#[test]
fn invalid_rows_are_dropped_not_zeroed() {
    let mut missing = row(OptionType::Put, dec!(440), 1_000, 0.01, None);
    missing.vanna = None;
    let mut bad_oi = row(OptionType::Put, dec!(430), -5, 0.01, None);
    bad_oi.volume = 10;
    let good = row(OptionType::Call, dec!(460), 1_000, 0.01, None);

    let out = engine()
        .analyze(&snapshot("SPY", AS_OF, vec![missing, bad_oi, good]), &vix(18.0))
        .unwrap();

    assert!(!out.is_degraded());
    assert_eq!(out.feature("rows_total"), Some(3.0));
    assert_eq!(out.feature("rows_used"), Some(1.0));
    assert_eq!(out.metadata["dropped.missing_greeks"], "1");
    assert_eq!(out.metadata["dropped.invalid_contract"], "1");
    assert!(out.confidence < 1.0);
}

// =============================================================================
// Gamma regimes
// =============================================================================

#[test]
fn symmetric_chain_with_flat_dealers_is_neutral() {
    let rows = vec![
        row(OptionType::Call, dec!(460), 10_000, 0.01, Some(0)),
        row(OptionType::Put, dec!(440), 10_000, 0.01, Some(0)),
    ];
    let out = engine().analyze(&snapshot("SPY", AS_OF, rows), &vix(18.0)).unwrap();

    assert_eq!(out.regime, GammaRegime::Neutral);
    assert_eq!(out.feature("gamma_pressure"), Some(0.0));
    assert_eq!(out.feature("dealer_gamma_sign"), Some(0.0));
    assert_eq!(out.feature("elasticity_up"), out.feature("elasticity_down"));
}

#[test]
fn symmetric_chain_with_offsetting_dealers_is_neutral() {
    let rows = vec![
        row(OptionType::Call, dec!(460), 10_000, 0.01, Some(-1)),
        row(OptionType::Put, dec!(440), 10_000, 0.01, Some(1)),
    ];
    let out = engine().analyze(&snapshot("SPY", AS_OF, rows), &vix(18.0)).unwrap();

    assert_eq!(out.regime, GammaRegime::Neutral);
    assert_eq!(out.feature("gamma_pressure"), Some(0.0));
}

#[test]
fn heavy_short_call_gamma_is_short_squeeze() {
    let rows: Vec<RawChainRow> = (0..20)
        .map(|i| row(OptionType::Call, dec!(460) + Decimal::from(i), 50_000, 0.01, Some(-1)))
        .collect();
    let out = engine().analyze(&snapshot("SPY", AS_OF, rows), &vix(18.0)).unwrap();

    assert_eq!(out.regime, GammaRegime::ShortSqueeze);
    assert_eq!(out.metadata["regime.gamma_regime"], "short_squeeze");
    assert!(out.feature("gamma_pressure").unwrap() < -1e10);
    assert_eq!(out.feature("dealer_gamma_sign"), Some(-1.0));
    assert!(out.regimes.gamma.confidence > 0.5);
}

#[test]
fn heavy_long_gamma_is_long_compression() {
    let rows: Vec<RawChainRow> = (0..20)
        .map(|i| row(OptionType::Put, dec!(440) - Decimal::from(i), 50_000, 0.01, Some(1)))
        .collect();
    let out = engine().analyze(&snapshot("SPY", AS_OF, rows), &vix(18.0)).unwrap();

    assert_eq!(out.regime, GammaRegime::LongCompression);
    assert!(out.feature("elasticity_down").unwrap() > out.feature("elasticity_up").unwrap());
}

// =============================================================================
// Scenario: dealers short OTM calls 5% above a $450 spot
// =============================================================================

#[test]
fn short_otm_calls_make_upside_easier() {
    let rows: Vec<RawChainRow> = (0..500)
        .map(|_| row(OptionType::Call, dec!(472.5), 50_000, 0.002, Some(-1)))
        .collect();
    let out = engine().analyze(&snapshot("SPY", AS_OF, rows), &vix(18.0)).unwrap();

    let gamma = out.feature("gamma_pressure").unwrap();
    assert!(gamma < -1e9, "gamma_pressure {gamma}");
    assert!(matches!(out.regime, GammaRegime::ShortSqueeze | GammaRegime::LowExpansion));

    let up = out.feature("elasticity_up").unwrap();
    let down = out.feature("elasticity_down").unwrap();
    assert!(up > 0.0 && down > 0.0);
    assert!(up < down, "elasticity_up {up} should be below elasticity_down {down}");
    assert!(out.feature("psi_up").unwrap() < 0.0);
}

#[test]
fn single_short_call_row_is_low_expansion() {
    let rows = vec![row(OptionType::Call, dec!(472.5), 50_000, 0.002, Some(-1))];
    let out = engine().analyze(&snapshot("SPY", AS_OF, rows), &vix(18.0)).unwrap();
    assert_eq!(out.regime, GammaRegime::LowExpansion);
}

// =============================================================================
// Energy
// =============================================================================

#[test]
fn energy_scales_linearly_with_pressure() {
    let elasticity = ElasticityOutput::new(0.4, 1.6).unwrap();
    let single = MovementEnergyOutput::new(-250.0, &elasticity);
    let double = MovementEnergyOutput::new(-500.0, &elasticity);

    assert!((double.up - 2.0 * single.up).abs() < 1e-12);
    assert!((double.down - 2.0 * single.down).abs() < 1e-12);
    assert!((single.asymmetry() - double.asymmetry()).abs() < 1e-12);
}

#[test]
fn doubling_open_interest_doubles_energy() {
    let chain = |oi: i64| {
        vec![
            row(OptionType::Call, dec!(465), oi, 0.01, Some(-1)),
            row(OptionType::Put, dec!(435), oi / 2, 0.01, Some(1)),
        ]
    };
    let engine = engine();
    let base = engine.analyze(&snapshot("SPY", AS_OF, chain(4_000)), &vix(18.0)).unwrap();
    let doubled = engine.analyze(&snapshot("SPY", AS_OF, chain(8_000)), &vix(18.0)).unwrap();

    let close = |a: f64, b: f64| (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0);
    assert!(close(base.feature("elasticity_up").unwrap(), doubled.feature("elasticity_up").unwrap()));
    assert!(close(
        2.0 * base.feature("net_pressure").unwrap(),
        doubled.feature("net_pressure").unwrap()
    ));
    for key in ["movement_energy_up", "movement_energy_down"] {
        assert!(close(2.0 * base.feature(key).unwrap(), doubled.feature(key).unwrap()), "{key}");
    }
}

// =============================================================================
// Output contract
// =============================================================================

#[test]
fn output_carries_every_feature_and_dimension() {
    let rows = vec![
        row(OptionType::Call, dec!(455), 3_000, 0.01, None),
        row(OptionType::Put, dec!(445), 3_000, 0.01, None),
    ];
    let out = engine().analyze(&snapshot("SPY", AS_OF, rows), &MarketContext::default()).unwrap();

    assert_eq!(out.kind, "dealer_hedge_pressure");
    for key in FEATURE_KEYS {
        assert!(out.feature(key).unwrap().is_finite(), "{key}");
    }
    for dim in ["gamma_regime", "vanna_regime", "charm_regime", "jump_risk_regime", "potential_shape"] {
        assert!(out.metadata.contains_key(&format!("regime.{dim}")), "{dim}");
        assert!(out.metadata.contains_key(&format!("confidence.{dim}")), "{dim}");
    }
    assert_eq!(out.metadata["volatility_index"], "missing");
    assert!(out.confidence > 0.0 && out.confidence <= 1.0);
}

#[test]
fn missing_volatility_index_lowers_confidence() {
    let mut call = row(OptionType::Call, dec!(460), 20_000, 0.01, Some(-1));
    call.vanna = Some(1.0);
    let rows = vec![call];
    let engine = engine();
    let with = engine.analyze(&snapshot("SPY", AS_OF, rows.clone()), &vix(20.0)).unwrap();
    let without = engine
        .analyze(&snapshot("SPY", AS_OF, rows), &MarketContext::default())
        .unwrap();

    assert!(!without.is_degraded());
    assert!(without.confidence > 0.0, "confidence {}", without.confidence);
    assert!(without.confidence < with.confidence);
    assert!(without.regimes.jump_risk.confidence > 0.0);
    assert!(without.regimes.jump_risk.confidence < with.regimes.jump_risk.confidence);
    assert!(without.regimes.vanna.confidence > 0.0);
    assert!(without.regimes.vanna.confidence < with.regimes.vanna.confidence);
}

#[test]
fn exposure_follows_each_rows_underlying_price() {
    let at = |underlying: Decimal| {
        let mut r = row(OptionType::Call, dec!(520), 1_000, 0.01, Some(-1));
        r.underlying_price = underlying;
        r
    };
    let out = engine()
        .analyze(&snapshot("SPY", AS_OF, vec![at(dec!(400)), at(dec!(500))]), &vix(18.0))
        .unwrap();

    // 0.01 × (400² + 500²) × 1000 × 100
    let gamma = out.feature("gamma_pressure").unwrap();
    assert!((gamma + 410_000_000.0).abs() < 1e-3, "gamma_pressure {gamma}");
}

#[test]
fn yaml_config_drives_the_engine() {
    let config = load_config_from_string(
        r"
grid:
  bin_count: 51
  range_std: 3.0
dealer_sign:
  convention: all_short
",
    )
    .unwrap();
    let engine = HedgePressureEngine::new(config).unwrap();
    assert_eq!(engine.grid().len(), 51);

    let rows = vec![row(OptionType::Put, dec!(440), 2_000, 0.01, None)];
    let out = engine.analyze(&snapshot("SPY", AS_OF, rows), &vix(18.0)).unwrap();
    assert_eq!(out.metadata["dealer_sign_convention"], "all_short");
    assert_eq!(out.feature("dealer_gamma_sign"), Some(-1.0));
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = EngineConfig::default();
    config.kernel.kappa = 0.0;
    assert!(matches!(HedgePressureEngine::new(config), Err(EngineError::InvalidConfig(_))));
}
