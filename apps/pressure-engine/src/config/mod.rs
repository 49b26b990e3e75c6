//! Configuration module for the pressure engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for every engine component. Configuration is read once and
//! is immutable afterwards, so it can be shared freely between threads.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pressure_engine::config::{load_config, EngineConfig};
//!
//! // Load from default path (pressure-engine.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("config/spx.yaml"))?;
//!
//! println!("grid bins: {}", config.grid.bin_count);
//! ```

mod dealer_sign;
mod elasticity;
mod exposure;
mod grid;
mod kernel;
mod observability;
mod regime;
mod weights;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use dealer_sign::DealerSignConfig;
pub use elasticity::ElasticityConfig;
pub use exposure::ExposureConfig;
pub use grid::GridConfig;
pub use kernel::{KernelConfig, LiquidityConfig};
pub use observability::{LOG_FORMATS, LoggingConfig, ObservabilityConfig};
pub use regime::{
    CharmThresholds, GammaThresholds, JumpRiskThresholds, RegimeConfig, ShapeThresholds,
    VannaThresholds,
};
pub use weights::AggregationWeights;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "pressure-engine.yaml";

/// Upper bound on grid size; keeps the kernel solve bounded.
pub const MAX_BIN_COUNT: usize = 65_537;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Spatial grid.
    #[serde(default)]
    pub grid: GridConfig,
    /// Green's kernel solve.
    #[serde(default)]
    pub kernel: KernelConfig,
    /// Liquidity profile.
    #[serde(default)]
    pub liquidity: LiquidityConfig,
    /// Field aggregation weights.
    #[serde(default)]
    pub weights: AggregationWeights,
    /// Hedge-multiplier coefficients.
    #[serde(default)]
    pub elasticity: ElasticityConfig,
    /// Dollar-exposure units.
    #[serde(default)]
    pub exposure: ExposureConfig,
    /// Dealer-sign heuristic.
    #[serde(default)]
    pub dealer_sign: DealerSignConfig,
    /// Regime thresholds.
    #[serde(default)]
    pub regime: RegimeConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl EngineConfig {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self)
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to [`DEFAULT_CONFIG_PATH`].
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<EngineConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: EngineConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let var_name = cap.get(1).map_or("", |m| m.as_str());
        let default_value = cap.get(2).map(|m| m.as_str());

        match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

fn require_positive(value: f64, field: &str) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be finite and positive")))
    }
}

fn require_non_negative(value: f64, field: &str) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be finite and non-negative")))
    }
}

fn require_unit_interval(value: f64, field: &str) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be between 0.0 and 1.0")))
    }
}

/// Validate configuration values.
fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    // Grid
    let bins = config.grid.bin_count;
    if bins < 5 || bins % 2 == 0 {
        return Err(invalid("grid.bin_count must be odd and at least 5"));
    }
    if bins > MAX_BIN_COUNT {
        return Err(invalid(format!(
            "grid.bin_count must not exceed {MAX_BIN_COUNT}"
        )));
    }
    require_positive(config.grid.range_std, "grid.range_std")?;

    // Kernel and liquidity
    require_positive(config.kernel.kappa, "kernel.kappa")?;
    require_non_negative(config.kernel.uniform_tolerance, "kernel.uniform_tolerance")?;
    require_positive(config.liquidity.base_lambda, "liquidity.base_lambda")?;
    if !(config.liquidity.floor_ratio > 0.0 && config.liquidity.floor_ratio <= 1.0) {
        return Err(invalid("liquidity.floor_ratio must be in (0.0, 1.0]"));
    }

    // Weights
    let w = &config.weights;
    if !(w.gamma.is_finite() && w.vanna.is_finite() && w.charm.is_finite()) {
        return Err(invalid("weights must be finite"));
    }

    // Elasticity
    require_non_negative(config.elasticity.k_long, "elasticity.k_long")?;
    require_non_negative(config.elasticity.k_short, "elasticity.k_short")?;
    if !(config.elasticity.floor > 0.0 && config.elasticity.floor <= 1.0) {
        return Err(invalid("elasticity.floor must be in (0.0, 1.0]"));
    }

    // Exposure units
    require_positive(
        config.exposure.trading_days_per_year,
        "exposure.trading_days_per_year",
    )?;
    require_positive(config.exposure.minutes_per_day, "exposure.minutes_per_day")?;
    require_positive(
        config.exposure.default_multiplier,
        "exposure.default_multiplier",
    )?;
    if config.exposure.expiry_hour_utc > 23 {
        return Err(invalid("exposure.expiry_hour_utc must be between 0 and 23"));
    }

    validate_regime(&config.regime)?;

    // Logging
    let format = config.observability.logging.format.as_str();
    if !LOG_FORMATS.contains(&format) {
        return Err(invalid(format!(
            "observability.logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    Ok(())
}

fn validate_regime(regime: &RegimeConfig) -> Result<(), ConfigError> {
    let gamma = &regime.gamma;
    require_positive(gamma.high_magnitude, "regime.gamma.high_magnitude")?;
    require_non_negative(gamma.neutral_band, "regime.gamma.neutral_band")?;
    if gamma.neutral_band >= gamma.high_magnitude {
        return Err(invalid(
            "regime.gamma.neutral_band must be below regime.gamma.high_magnitude",
        ));
    }

    let vanna = &regime.vanna;
    require_positive(vanna.magnitude, "regime.vanna.magnitude")?;
    require_non_negative(vanna.vix_low, "regime.vanna.vix_low")?;
    require_positive(vanna.vix_high, "regime.vanna.vix_high")?;
    if vanna.vix_low >= vanna.vix_high {
        return Err(invalid(
            "regime.vanna.vix_low must be below regime.vanna.vix_high",
        ));
    }

    require_positive(regime.charm.magnitude, "regime.charm.magnitude")?;
    require_non_negative(regime.charm.acceleration_dte, "regime.charm.acceleration_dte")?;

    let jump = &regime.jump;
    require_positive(jump.vol_of_vol_high, "regime.jump.vol_of_vol_high")?;
    require_positive(jump.vix_high, "regime.jump.vix_high")?;
    require_positive(
        jump.curvature_acceleration_high,
        "regime.jump.curvature_acceleration_high",
    )?;
    require_unit_interval(jump.high_score, "regime.jump.high_score")?;
    require_unit_interval(jump.moderate_score, "regime.jump.moderate_score")?;
    if jump.moderate_score >= jump.high_score {
        return Err(invalid(
            "regime.jump.moderate_score must be below regime.jump.high_score",
        ));
    }

    let shape = &regime.shape;
    require_positive(shape.gamma_extreme, "regime.shape.gamma_extreme")?;
    require_positive(shape.vanna_extreme, "regime.shape.vanna_extreme")?;
    require_unit_interval(shape.asymmetry, "regime.shape.asymmetry")?;

    require_unit_interval(regime.missing_input_penalty, "regime.missing_input_penalty")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dealer_sign::DealerSignConvention;
    use crate::domain::kernel::LiquidityProfileKind;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();

        assert_eq!(config.grid.bin_count, 101);
        assert!((config.kernel.kappa - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.dealer_sign.convention, DealerSignConvention::ShortOtm);
        assert_eq!(config.liquidity.profile, LiquidityProfileKind::Uniform);
        assert!((config.exposure.minutes_per_year() - 98_280.0).abs() < f64::EPSILON);
        assert!((config.regime.missing_input_penalty - 0.5).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_partial_config() {
        let yaml = r"
grid:
  bin_count: 201
kernel:
  kappa: 2.5
dealer_sign:
  convention: long_calls_short_puts
liquidity:
  profile: volume_weighted
regime:
  gamma:
    high_magnitude: 5.0e9
";

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load partial config: {e}"),
        };
        assert_eq!(config.grid.bin_count, 201);
        assert!((config.grid.range_std - 4.0).abs() < f64::EPSILON); // Default value
        assert!((config.kernel.kappa - 2.5).abs() < f64::EPSILON);
        assert_eq!(
            config.dealer_sign.convention,
            DealerSignConvention::LongCallsShortPuts
        );
        assert_eq!(config.liquidity.profile, LiquidityProfileKind::VolumeWeighted);
        assert!((config.regime.gamma.high_magnitude - 5.0e9).abs() < 1.0);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "kappa: ${PRESSURE_CONFIG_TEST_NONEXISTENT_VAR:-1.5}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "kappa: 1.5");
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "level: ${PRESSURE_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "level: ");
    }

    #[test]
    fn test_interpolated_yaml_loads() {
        let yaml = "kernel:\n  kappa: ${PRESSURE_CONFIG_TEST_MISSING_KAPPA:-0.75}\n";
        let config = load_config_from_string(yaml).unwrap();
        assert!((config.kernel.kappa - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validation_even_bin_count() {
        let yaml = "grid:\n  bin_count: 100\n";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for even bin count");
        };
        assert!(err.to_string().contains("bin_count"));
    }

    #[test]
    fn test_validation_non_positive_kappa() {
        let yaml = "kernel:\n  kappa: 0.0\n";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero kappa");
        };
        assert!(err.to_string().contains("kernel.kappa"));
    }

    #[test]
    fn test_validation_elasticity_floor() {
        let yaml = "elasticity:\n  floor: 0.0\n";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero elasticity floor");
        };
        assert!(err.to_string().contains("elasticity.floor"));
    }

    #[test]
    fn test_validation_gamma_band_above_high() {
        let yaml = r"
regime:
  gamma:
    high_magnitude: 1.0e6
    neutral_band: 1.0e7
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for inverted gamma thresholds");
        };
        assert!(err.to_string().contains("neutral_band"));
    }

    #[test]
    fn test_validation_invalid_log_format() {
        let yaml = r"
observability:
  logging:
    format: xml
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid log format");
        };
        assert!(err.to_string().contains("logging.format"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let Err(err) = load_config(Some("/nonexistent/pressure-engine.yaml")) else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, "grid:\n  bin_count: 61\n  range_std: 3.0\n").unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.grid.bin_count, 61);
        assert!((config.grid.range_std - 3.0).abs() < f64::EPSILON);
    }
}
