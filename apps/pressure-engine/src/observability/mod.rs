//! Observability module for metrics.
//!
//! Instrumentation for the pressure engine through the `metrics` facade.
//! Logging setup lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    record_analysis, record_confidence, record_kernel_build, record_numeric_defect,
    record_rows_dropped,
};
