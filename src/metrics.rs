use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, Encoder, HistogramOpts, HistogramVec,
    IntCounterVec, IntGaugeVec, TextEncoder,
};

pub static DASHBOARD_FETCH_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let opts = HistogramOpts::new("dashboard_fetch_seconds", "Histogram of fixture fetch durations")
        .buckets(vec![0.05, 0.1, 0.15, 0.25, 0.5, 1.0, 2.0]);
    register_histogram_vec!(opts, &["category", "dataset"]).expect("register dashboard_fetch_seconds")
});

pub static DASHBOARD_FETCH_FAILED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dashboard_fetch_failed_total",
        "Total number of fixture fetches that failed to load or validate",
        &["category", "dataset"]
    )
    .expect("register dashboard_fetch_failed_total")
});

pub static DASHBOARD_VIEW_RECOMPUTE_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dashboard_view_recompute_total",
        "Total number of derived view recomputations",
        &["category"]
    )
    .expect("register dashboard_view_recompute_total")
});

pub static DASHBOARD_VISIBLE_COMMENTS: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!(
        "dashboard_visible_comments",
        "Comments remaining after the active filters",
        &["category"]
    )
    .expect("register dashboard_visible_comments")
});

pub static DASHBOARD_INSIGHT_LATENCY_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "dashboard_insight_latency_seconds",
        "Histogram of insight responder latency",
        &["category", "provider"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0]
    )
    .expect("register dashboard_insight_latency_seconds")
});

pub fn gather_metrics() -> String {
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if TextEncoder::new().encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
