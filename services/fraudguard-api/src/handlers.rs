use crate::errors::{ApiError, ApiResult};
use crate::metrics;
use crate::models::*;
use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use chrono::Utc;
use risk_engine::{round_to, RiskEngine, Transaction};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use validator::Validate;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Per-process service state shared by all workers
#[derive(Debug, Clone)]
pub struct AppState {
    pub started_at: Instant,
    pub max_batch_size: usize,
}

impl AppState {
    pub fn new(max_batch_size: usize) -> Self {
        Self {
            started_at: Instant::now(),
            max_batch_size,
        }
    }
}

// ===== Health Check =====
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    metrics::record_request("/health", 200);

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: round_to(state.started_at.elapsed().as_secs_f64(), 2),
    })
}

// ===== Predict =====
pub async fn predict(
    req: web::Json<PredictionRequest>,
    engine: web::Data<Arc<RiskEngine>>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let outcome = score_batch(req.into_inner(), &engine, state.max_batch_size);

    match outcome {
        Ok(response) => {
            metrics::record_request("/predict", 200);
            Ok(response)
        }
        Err(e) => {
            warn!("Prediction request rejected: {}", e);
            metrics::record_request("/predict", e.status_code().as_u16());
            Err(e)
        }
    }
}

fn score_batch(
    request: PredictionRequest,
    engine: &RiskEngine,
    max_batch_size: usize,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    if request.transactions.len() > max_batch_size {
        return Err(ApiError::ValidationError(format!(
            "batch of {} transactions exceeds the maximum of {}",
            request.transactions.len(),
            max_batch_size
        )));
    }

    for (index, payload) in request.transactions.iter().enumerate() {
        payload.validate().map_err(|e| {
            ApiError::ValidationError(format!("transaction at index {}: {}", index, e))
        })?;
    }

    let transactions: Vec<Transaction> = request
        .transactions
        .into_iter()
        .map(Transaction::from)
        .collect();

    info!("Scoring batch of {} transactions", transactions.len());

    let started = Instant::now();
    let result = engine.evaluate(&transactions)?;
    metrics::record_batch(&result, started.elapsed().as_secs_f64());

    Ok(HttpResponse::Ok().json(result))
}

// ===== Model Info =====
pub async fn model_info(engine: web::Data<Arc<RiskEngine>>) -> HttpResponse {
    metrics::record_request("/model/info", 200);
    HttpResponse::Ok().json(engine.model_info())
}

// ===== Service Index =====
pub async fn index() -> HttpResponse {
    metrics::record_request("/", 200);
    HttpResponse::Ok().json(ServiceIndex::new())
}

// ===== Prometheus Metrics =====
pub async fn metrics_endpoint() -> ApiResult<HttpResponse> {
    let body = metrics::render().map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

/// Unparseable bodies are a 400; parseable JSON of the wrong shape is a 422
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let api_err = match &err {
        JsonPayloadError::Deserialize(e) if e.is_data() => ApiError::ValidationError(e.to_string()),
        _ => ApiError::BadRequest(err.to_string()),
    };

    warn!("Rejected request body on {}: {}", req.path(), api_err);
    metrics::record_request(req.path(), api_err.status_code().as_u16());

    api_err.into()
}

// ===== Configure Routes =====
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_BODY_BYTES)
            .error_handler(json_error_handler),
    )
    .route("/", web::get().to(index))
    .route("/health", web::get().to(health_check))
    .route("/predict", web::post().to(predict))
    .route("/model/info", web::get().to(model_info))
    .route("/metrics", web::get().to(metrics_endpoint));
}
