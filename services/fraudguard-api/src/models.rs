use chrono::{DateTime, Utc};
use risk_engine::{Timestamp, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// ===== Prediction Request =====
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct PredictionRequest {
    #[validate(length(min = 1, message = "at least one transaction is required"))]
    pub transactions: Vec<TransactionPayload>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    #[validate(custom = "validate_positive_amount")]
    pub amount: Decimal,

    #[validate(length(equal = 3, message = "currency must be a 3-letter code"))]
    pub currency: String,

    #[validate(length(min = 1, message = "merchantId must not be empty"))]
    pub merchant_id: String,

    #[validate(length(min = 1, message = "paymentMethod must not be empty"))]
    pub payment_method: String,

    #[validate(email)]
    pub customer_email: String,

    #[serde(default)]
    pub ip_address: Option<String>,

    #[serde(default)]
    pub device_id: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Unparseable text is accepted and scored, not rejected
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        let mut err = ValidationError::new("positive_amount");
        err.message = Some("amount must be greater than 0".into());
        Err(err)
    }
}

impl From<TransactionPayload> for Transaction {
    fn from(payload: TransactionPayload) -> Self {
        Transaction {
            amount: payload.amount,
            currency: payload.currency.into(),
            merchant_id: payload.merchant_id,
            payment_method: payload.payment_method.into(),
            customer_email: payload.customer_email,
            ip_address: payload.ip_address,
            device_id: payload.device_id,
            description: payload.description,
            timestamp: payload.timestamp,
        }
    }
}

// ===== Service Responses =====
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    /// Seconds since the service started
    pub uptime: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceIndex {
    pub message: String,
    pub version: String,
    pub health: String,
    pub predict: String,
    pub model_info: String,
    pub metrics: String,
}

impl ServiceIndex {
    pub fn new() -> Self {
        Self {
            message: "FraudGuard Risk Scoring API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            health: "/health".to_string(),
            predict: "/predict".to_string(),
            model_info: "/model/info".to_string(),
            metrics: "/metrics".to_string(),
        }
    }
}

impl Default for ServiceIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
