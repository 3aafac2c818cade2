// Prometheus metrics for the ledger gateway
// Tracks: requests per endpoint, validation rejections, ledger latency and failures, connection churn

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Encoder, HistogramOpts, HistogramVec, IntCounter,
    IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

pub struct Metrics {
    pub registry: Registry,

    // Request metrics
    pub http_requests_total: IntCounterVec,
    pub validation_rejections_total: IntCounterVec,

    // Ledger metrics
    pub ledger_errors_total: IntCounterVec,
    pub ledger_call_duration_seconds: HistogramVec,
    pub connections_opened_total: IntCounter,
    pub connections_closed_total: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let http_requests_total = register_int_counter_vec_with_registry!(
            Opts::new("ledger_gateway_http_requests_total", "Total HTTP requests by endpoint"),
            &["endpoint"],
            registry
        )?;

        let validation_rejections_total = register_int_counter_vec_with_registry!(
            Opts::new(
                "ledger_gateway_validation_rejections_total",
                "Requests rejected before reaching the ledger"
            ),
            &["endpoint"],
            registry
        )?;

        let ledger_errors_total = register_int_counter_vec_with_registry!(
            Opts::new("ledger_gateway_ledger_errors_total", "Failed ledger operations"),
            &["operation"],
            registry
        )?;

        let ledger_call_duration_seconds = register_histogram_vec_with_registry!(
            HistogramOpts::new(
                "ledger_gateway_ledger_call_duration_seconds",
                "Ledger operation duration including connection setup"
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["operation"],
            registry
        )?;

        let connections_opened_total = register_int_counter_with_registry!(
            Opts::new("ledger_gateway_connections_opened_total", "Ledger connections opened"),
            registry
        )?;

        let connections_closed_total = register_int_counter_with_registry!(
            Opts::new("ledger_gateway_connections_closed_total", "Ledger connections closed"),
            registry
        )?;

        Ok(Self {
            registry,
            http_requests_total,
            validation_rejections_total,
            ledger_errors_total,
            ledger_call_duration_seconds,
            connections_opened_total,
            connections_closed_total,
        })
    }

    /// Export all metrics in Prometheus text format
    pub fn export(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn track_request(&self, endpoint: &str) {
        self.http_requests_total.with_label_values(&[endpoint]).inc();
    }

    pub fn track_rejection(&self, endpoint: &str) {
        self.validation_rejections_total
            .with_label_values(&[endpoint])
            .inc();
    }

    pub fn track_ledger_call(&self, operation: &str, seconds: f64, failed: bool) {
        self.ledger_call_duration_seconds
            .with_label_values(&[operation])
            .observe(seconds);
        if failed {
            self.ledger_errors_total.with_label_values(&[operation]).inc();
        }
    }
}

// Global metrics instance
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});
