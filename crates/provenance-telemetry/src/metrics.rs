//! Prometheus metrics for Provenance-Chain.
//!
//! All metrics follow the naming convention: `pc_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SUBMITTER METRICS (Subsystem 3)
    // =========================================================================

    /// Mutating operations attempted, by contract method
    pub static ref SUBMISSIONS: CounterVec = CounterVec::new(
        Opts::new("pc_submitter_submissions_total", "Mutating operations attempted"),
        &["method"]
    ).expect("metric creation failed");

    /// Transactions confirmed successful, by contract method
    pub static ref CONFIRMATIONS: CounterVec = CounterVec::new(
        Opts::new("pc_submitter_confirmations_total", "Mutating operations confirmed"),
        &["method"]
    ).expect("metric creation failed");

    /// Failed operations by method and error category
    pub static ref FAILURES: CounterVec = CounterVec::new(
        Opts::new("pc_submitter_failures_total", "Failed operations by category"),
        &["method", "category"]
    ).expect("metric creation failed");

    /// Submit-and-confirm latency
    pub static ref CONFIRMATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "pc_submitter_confirmation_duration_seconds",
            "Time spent submitting and confirming an operation"
        ).buckets(exponential_buckets(0.01, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // QUERY METRICS (Subsystem 4)
    // =========================================================================

    /// Product views requested, by outcome (`ok` or an error category)
    pub static ref QUERIES: CounterVec = CounterVec::new(
        Opts::new("pc_query_views_total", "Product views requested"),
        &["outcome"]
    ).expect("metric creation failed");

    // =========================================================================
    // CODEC METRICS (Subsystem 2)
    // =========================================================================

    /// QR decodes by source (`payload`, `upload`, `capture`) and outcome
    pub static ref QR_DECODES: CounterVec = CounterVec::new(
        Opts::new("pc_codec_decodes_total", "QR payload decodes"),
        &["source", "outcome"]
    ).expect("metric creation failed");
}

/// Handle to the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Registering twice is harmless.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SUBMISSIONS.clone()),
        Box::new(CONFIRMATIONS.clone()),
        Box::new(FAILURES.clone()),
        Box::new(CONFIRMATION_DURATION.clone()),
        Box::new(QUERIES.clone()),
        Box::new(QR_DECODES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
