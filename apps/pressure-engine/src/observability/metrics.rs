//! Metrics for the pressure engine.
//!
//! Records through the `metrics` facade only. Nothing is exported until the
//! host process installs a recorder; without one every call is a no-op.
//!
//! # Example
//!
//! ```ignore
//! use pressure_engine::observability::record_analysis;
//!
//! record_analysis("SPY", "ok", "short_squeeze", 0.004);
//! ```

use metrics::{counter, gauge, histogram};

// ============================================================================
// Analysis Metrics
// ============================================================================

/// Record one engine invocation.
///
/// # Arguments
///
/// * `symbol` - Underlying symbol
/// * `status` - Outcome (`ok`, `degraded`, `error`)
/// * `regime` - Top-level gamma regime label (`none` on error)
/// * `duration_seconds` - Wall time of the invocation
pub fn record_analysis(symbol: &str, status: &str, regime: &str, duration_seconds: f64) {
    counter!(
        "pressure_analyses_total",
        "status" => status.to_string(),
        "regime" => regime.to_string()
    )
    .increment(1);

    histogram!(
        "pressure_analysis_seconds",
        "symbol" => symbol.to_string()
    )
    .record(duration_seconds);
}

/// Record the confidence of a completed analysis.
pub fn record_confidence(symbol: &str, confidence: f64) {
    gauge!(
        "pressure_confidence",
        "symbol" => symbol.to_string()
    )
    .set(confidence);
}

// ============================================================================
// Input Metrics
// ============================================================================

/// Record chain rows dropped during normalization.
///
/// # Arguments
///
/// * `reason` - Drop reason (`missing_greeks`, `non_positive_expiry`, ...)
/// * `count` - Rows dropped for that reason
pub fn record_rows_dropped(reason: &str, count: usize) {
    if count == 0 {
        return;
    }
    counter!(
        "pressure_rows_dropped_total",
        "reason" => reason.to_string()
    )
    .increment(count as u64);
}

// ============================================================================
// Numeric Metrics
// ============================================================================

/// Record a Green's kernel build.
///
/// # Arguments
///
/// * `branch` - `analytic` or `tridiagonal`
/// * `cached` - Whether the kernel came from a caller-supplied cache
/// * `duration_seconds` - Build (or lookup) time
pub fn record_kernel_build(branch: &str, cached: bool, duration_seconds: f64) {
    counter!(
        "pressure_kernel_builds_total",
        "branch" => branch.to_string(),
        "cached" => cached.to_string()
    )
    .increment(1);

    histogram!(
        "pressure_kernel_build_seconds",
        "branch" => branch.to_string()
    )
    .record(duration_seconds);
}

/// Record a numeric defect surfaced to the caller.
///
/// # Arguments
///
/// * `code` - Error reason (`SINGULAR_KERNEL`, `NON_POSITIVE_ELASTICITY`, ...)
pub fn record_numeric_defect(code: &str) {
    counter!(
        "pressure_numeric_defects_total",
        "code" => code.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    // These verify the functions don't panic; recording needs an installed
    // recorder.

    #[test]
    fn test_record_analysis() {
        record_analysis("SPY", "ok", "neutral", 0.002);
        record_confidence("SPY", 0.8);
    }

    #[test]
    fn test_record_rows_dropped() {
        record_rows_dropped("missing_greeks", 3);
        record_rows_dropped("invalid_contract", 0);
    }

    #[test]
    fn test_record_kernel_build() {
        record_kernel_build("tridiagonal", false, 0.0004);
        record_kernel_build("analytic", true, 0.000_001);
    }

    #[test]
    fn test_record_numeric_defect() {
        record_numeric_defect("SINGULAR_KERNEL");
    }
}
