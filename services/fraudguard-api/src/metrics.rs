use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use risk_engine::BatchResult;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("fraudguard_http_requests_total", "Total HTTP requests"),
        &["path", "status"]
    ).expect("metric can be created");

    // Scoring metrics
    pub static ref PREDICTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("fraudguard_predictions_total", "Total predictions by risk level"),
        &["risk_level"]
    ).expect("metric can be created");

    pub static ref FRAUD_FLAGGED_TOTAL: IntCounter = IntCounter::new(
        "fraudguard_fraud_flagged_total",
        "Total transactions flagged as fraud"
    ).expect("metric can be created");

    pub static ref BATCH_SIZE: Histogram = Histogram::with_opts(
        HistogramOpts::new("fraudguard_batch_size", "Transactions per prediction request")
            .buckets(vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0])
    ).expect("metric can be created");

    pub static ref EVALUATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "fraudguard_evaluation_duration_seconds",
            "Batch evaluation time in seconds"
        )
        .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1])
    ).expect("metric can be created");
}

/// Register all metrics with the given registry
pub fn register_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    registry.register(Box::new(PREDICTIONS_TOTAL.clone()))?;
    registry.register(Box::new(FRAUD_FLAGGED_TOTAL.clone()))?;
    registry.register(Box::new(BATCH_SIZE.clone()))?;
    registry.register(Box::new(EVALUATION_DURATION.clone()))?;
    Ok(())
}

/// Register with the service registry; repeated calls are no-ops
pub fn init() {
    if let Err(e) = register_metrics(&REGISTRY) {
        if !matches!(e, prometheus::Error::AlreadyReg) {
            tracing::warn!("Failed to register metrics: {}", e);
        }
    }
}

pub fn record_request(path: &str, status: u16) {
    let status = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[path, status.as_str()])
        .inc();
}

pub fn record_batch(result: &BatchResult, elapsed_seconds: f64) {
    BATCH_SIZE.observe(result.total_processed as f64);
    EVALUATION_DURATION.observe(elapsed_seconds);

    for prediction in &result.predictions {
        PREDICTIONS_TOTAL
            .with_label_values(&[prediction.risk_level.as_str()])
            .inc();
    }
    FRAUD_FLAGGED_TOTAL.inc_by(result.fraud_count() as u64);
}

/// Generate metrics output in Prometheus text format
pub fn render() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
