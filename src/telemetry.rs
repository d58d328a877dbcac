//! Telemetry metric names and the collector bundle.
//!
//! All metrics are prefixed with `munin_`. Counters end in `_total`,
//! histograms use seconds. Collectors are registered on an explicitly
//! passed [`prometheus::Registry`]: the daemon owns one and hands it to
//! the metrics listener, tests build their own. Nothing records through
//! a process-wide default registry.
//!
//! # Common labels
//!
//! - `operation` — "translate" | "format" | "summarize"

use prometheus::{HistogramOpts, HistogramTimer, HistogramVec, IntCounterVec, Opts, Registry};
use prometheus::TextEncoder;

use crate::error::{MuninError, Result};
use crate::types::Operation;

/// Requests that went to the generation backend: every cache miss plus
/// every non-cached operation. Cache hits are not counted here.
///
/// Labels: `operation`.
pub const REQUESTS_TOTAL: &str = "munin_requests_total";

/// Requests answered from the cache store.
///
/// Labels: `operation`.
pub const CACHE_HITS_TOTAL: &str = "munin_cache_hits_total";

/// Wall time of backend generation calls in seconds, recorded whether
/// the call succeeds or fails.
///
/// Labels: `operation`.
pub const GENERATE_DURATION_SECONDS: &str = "munin_generate_duration_seconds";

/// Collector bundle threaded through the pipeline.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub requests: IntCounterVec,
    pub cache_hits: IntCounterVec,
    pub generate_duration: HistogramVec,
}

impl Metrics {
    /// Build the collectors and register them on `registry`.
    pub fn new(registry: &Registry) -> Result<Self> {
        let requests = IntCounterVec::new(
            Opts::new(
                REQUESTS_TOTAL,
                "Requests that went to the generation backend",
            ),
            &["operation"],
        )
        .map_err(registration_error)?;

        let cache_hits = IntCounterVec::new(
            Opts::new(CACHE_HITS_TOTAL, "Requests answered from the cache store"),
            &["operation"],
        )
        .map_err(registration_error)?;

        let generate_duration = HistogramVec::new(
            HistogramOpts::new(
                GENERATE_DURATION_SECONDS,
                "Backend generation latency in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["operation"],
        )
        .map_err(registration_error)?;

        registry
            .register(Box::new(requests.clone()))
            .map_err(registration_error)?;
        registry
            .register(Box::new(cache_hits.clone()))
            .map_err(registration_error)?;
        registry
            .register(Box::new(generate_duration.clone()))
            .map_err(registration_error)?;

        Ok(Self {
            requests,
            cache_hits,
            generate_duration,
        })
    }

    pub fn record_request(&self, operation: Operation) {
        self.requests.with_label_values(&[operation.as_str()]).inc();
    }

    pub fn record_cache_hit(&self, operation: Operation) {
        self.cache_hits
            .with_label_values(&[operation.as_str()])
            .inc();
    }

    /// Timer that observes into the latency histogram when dropped.
    pub fn generation_timer(&self, operation: Operation) -> HistogramTimer {
        self.generate_duration
            .with_label_values(&[operation.as_str()])
            .start_timer()
    }
}

fn registration_error(e: prometheus::Error) -> MuninError {
    MuninError::Configuration(format!("metric registration failed: {e}"))
}

/// Encode everything on `registry` in the Prometheus text format.
pub fn render(registry: &Registry) -> String {
    let encoder = TextEncoder::new();
    encoder
        .encode_to_string(&registry.gather())
        .unwrap_or_else(|e| format!("# encoding error: {e}\n"))
}
