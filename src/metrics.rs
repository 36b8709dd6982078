//! Prometheus metrics registration and export.

use std::sync::OnceLock;

use prometheus::{Counter, CounterVec, Encoder, HistogramVec, Opts, Registry, TextEncoder};

/// Global registry for all engine metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Completed requests, labelled by category, model, and status.
static REQUESTS_TOTAL: OnceLock<CounterVec> = OnceLock::new();

/// Requests served by a model other than the first ranked candidate.
static FALLBACKS_TOTAL: OnceLock<Counter> = OnceLock::new();

/// Classification cache hits.
static CACHE_HITS_TOTAL: OnceLock<Counter> = OnceLock::new();

/// Provider completion latency in seconds, labelled by model.
static REQUEST_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Initialise and register all metrics. Call once at boot; metric recording
/// is a no-op until this has run, so tests never need it.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    let registry = Registry::new();

    let requests_total = CounterVec::new(
        Opts::new("semroute_requests_total", "Completed routing requests"),
        &["category", "model", "status"],
    )?;
    let fallbacks_total = Counter::new(
        "semroute_fallbacks_total",
        "Requests served by a non-primary candidate",
    )?;
    let cache_hits_total = Counter::new(
        "semroute_classification_cache_hits_total",
        "Classification cache hits",
    )?;
    let request_latency = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "semroute_completion_latency_seconds",
            "Provider completion latency in seconds",
        )
        .buckets(vec![0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
        &["model"],
    )?;

    registry.register(Box::new(requests_total.clone()))?;
    registry.register(Box::new(fallbacks_total.clone()))?;
    registry.register(Box::new(cache_hits_total.clone()))?;
    registry.register(Box::new(request_latency.clone()))?;

    let _ = REQUESTS_TOTAL.set(requests_total);
    let _ = FALLBACKS_TOTAL.set(fallbacks_total);
    let _ = CACHE_HITS_TOTAL.set(cache_hits_total);
    let _ = REQUEST_LATENCY.set(request_latency);
    let _ = REGISTRY.set(registry);
    Ok(())
}

pub fn record_request(category: &str, model: &str, status: &str) {
    if let Some(counter) = REQUESTS_TOTAL.get() {
        counter.with_label_values(&[category, model, status]).inc();
    }
}

pub fn record_fallback() {
    if let Some(counter) = FALLBACKS_TOTAL.get() {
        counter.inc();
    }
}

pub fn classification_cache_hit() {
    if let Some(counter) = CACHE_HITS_TOTAL.get() {
        counter.inc();
    }
}

pub fn observe_latency(model: &str, latency_ms: u64) {
    if let Some(histogram) = REQUEST_LATENCY.get() {
        histogram
            .with_label_values(&[model])
            .observe(latency_ms as f64 / 1000.0);
    }
}

/// Render all metrics in Prometheus text exposition format.
pub fn export() -> String {
    let Some(registry) = REGISTRY.get() else {
        return String::new();
    };
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if encoder.encode(&registry.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
