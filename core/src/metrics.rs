use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Prosess-globale tellere. Navnene er konstanter, så registrering kan ikke feile i praksis.
pub struct Metrics {
    pub registry: Registry,
    pub fixes_total: IntCounterVec,
    pub requests_total: IntCounterVec,
    pub sessions_finished_total: IntCounterVec,
}

fn counter_vec(registry: &Registry, name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    let c = IntCounterVec::new(Opts::new(name, help), labels).expect("valid metric definition");
    registry
        .register(Box::new(c.clone()))
        .expect("metric registered once");
    c
}

pub static METRICS: Lazy<Metrics> = Lazy::new(|| {
    let registry = Registry::new();
    let fixes_total = counter_vec(
        &registry,
        "plotarea_fixes_total",
        "Position fixes seen by the filter, by decision",
        &["decision"],
    );
    let requests_total = counter_vec(
        &registry,
        "plotarea_requests_total",
        "HTTP requests handled, by endpoint and outcome",
        &["endpoint", "outcome"],
    );
    let sessions_finished_total = counter_vec(
        &registry,
        "plotarea_sessions_finished_total",
        "Finished recording sessions, by area outcome",
        &["outcome"],
    );
    Metrics {
        registry,
        fixes_total,
        requests_total,
        sessions_finished_total,
    }
});

#[inline]
pub fn record_fix(decision: &str) {
    METRICS.fixes_total.with_label_values(&[decision]).inc();
}

#[inline]
pub fn record_request(endpoint: &str, outcome: &str) {
    METRICS.requests_total.with_label_values(&[endpoint, outcome]).inc();
}

#[inline]
pub fn record_session_finished(outcome: &str) {
    METRICS.sessions_finished_total.with_label_values(&[outcome]).inc();
}

/// Prometheus tekstformat for /metrics.
pub fn render() -> String {
    let mut buf = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&METRICS.registry.gather(), &mut buf) {
        log::warn!("metrics encode failed: {e}");
    }
    String::from_utf8_lossy(&buf).into_owned()
}
