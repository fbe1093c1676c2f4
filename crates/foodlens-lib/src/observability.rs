//! Observability infrastructure for the attendance predictor
//!
//! Provides:
//! - Prometheus metrics (fit latency, prediction latency, training rows, cache hits)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_gauge, Encoder,
    GaugeVec, Histogram, IntCounter, IntGauge, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

struct PredictorMetricsInner {
    fit_latency_seconds: Histogram,
    prediction_latency_seconds: Histogram,
    training_rows: IntGauge,
    recommendations_total: IntCounter,
    recommendation_errors_total: IntCounter,
    model_cache_hits_total: IntCounter,
    model_cache_misses_total: IntCounter,
    model_version_info: GaugeVec,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            fit_latency_seconds: register_histogram!(
                "foodlens_fit_latency_seconds",
                "Time spent fitting the attendance model",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register fit_latency_seconds"),

            prediction_latency_seconds: register_histogram!(
                "foodlens_prediction_latency_seconds",
                "Time spent producing a recommendation end to end",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            training_rows: register_int_gauge!(
                "foodlens_training_rows",
                "Rows in the historical table used by the last fit"
            )
            .expect("Failed to register training_rows"),

            recommendations_total: register_int_counter!(
                "foodlens_recommendations_total",
                "Total number of recommendations produced"
            )
            .expect("Failed to register recommendations_total"),

            recommendation_errors_total: register_int_counter!(
                "foodlens_recommendation_errors_total",
                "Total number of failed recommendation calls"
            )
            .expect("Failed to register recommendation_errors_total"),

            model_cache_hits_total: register_int_counter!(
                "foodlens_model_cache_hits_total",
                "Recommendations served by a cached model"
            )
            .expect("Failed to register model_cache_hits_total"),

            model_cache_misses_total: register_int_counter!(
                "foodlens_model_cache_misses_total",
                "Recommendations that had to fit a fresh model"
            )
            .expect("Failed to register model_cache_misses_total"),

            model_version_info: register_gauge_vec!(
                "foodlens_model_version_info",
                "Content-hash version of the most recently used model",
                &["version"]
            )
            .expect("Failed to register model_version_info"),
        }
    }
}

/// Predictor metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PredictorMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictorMetrics").finish()
    }
}

impl PredictorMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new)
    }

    pub fn observe_fit_latency(&self, duration_secs: f64) {
        self.inner().fit_latency_seconds.observe(duration_secs);
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn set_training_rows(&self, rows: usize) {
        self.inner().training_rows.set(rows as i64);
    }

    pub fn inc_recommendations(&self) {
        self.inner().recommendations_total.inc();
    }

    pub fn inc_recommendation_errors(&self) {
        self.inner().recommendation_errors_total.inc();
    }

    pub fn record_cache_lookup(&self, hit: bool) {
        if hit {
            self.inner().model_cache_hits_total.inc();
        } else {
            self.inner().model_cache_misses_total.inc();
        }
    }

    /// Replace the model version label
    pub fn set_model_version(&self, version: &str) {
        self.inner().model_version_info.reset();
        self.inner()
            .model_version_info
            .with_label_values(&[version])
            .set(1.0);
    }

    /// Render the default registry in Prometheus text exposition format
    pub fn encode_text(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Structured logger for predictor events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Log a completed model fit
    pub fn log_model_fit(
        &self,
        model_version: &str,
        rows: usize,
        features: usize,
        depth: usize,
        leaves: usize,
        elapsed_ms: f64,
    ) {
        info!(
            event = "model_fit",
            service = %self.service,
            model_version = %model_version,
            rows = rows,
            features = features,
            depth = depth,
            leaves = leaves,
            elapsed_ms = elapsed_ms,
            "Fitted attendance model"
        );
    }

    /// Log a produced recommendation
    pub fn log_recommendation(
        &self,
        building: &str,
        event_type: &str,
        rsvps: u32,
        planned_food: u32,
        predicted_attendance: u32,
        recommended_food: u32,
        reduction: i64,
        model_version: &str,
    ) {
        info!(
            event = "recommendation_generated",
            service = %self.service,
            building = %building,
            event_type = %event_type,
            rsvps = rsvps,
            planned_food = planned_food,
            predicted_attendance = predicted_attendance,
            recommended_food = recommended_food,
            reduction = reduction,
            model_version = %model_version,
            "Generated food recommendation"
        );
    }

    /// Log a missing or unreadable input file
    pub fn log_data_unavailable(&self, path: &str, reason: &str) {
        warn!(
            event = "data_unavailable",
            service = %self.service,
            path = %path,
            reason = %reason,
            "Predictor input unavailable"
        );
    }

    /// Log a failed recommendation that was not an input availability problem
    pub fn log_recommendation_failed(&self, kind: &str, reason: &str) {
        warn!(
            event = "recommendation_failed",
            service = %self.service,
            kind = %kind,
            reason = %reason,
            "Recommendation failed"
        );
    }

    pub fn log_startup(&self, version: &str, data_path: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            data_path = %data_path,
            "FoodLens predictor started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "FoodLens predictor shutting down"
        );
    }
}
