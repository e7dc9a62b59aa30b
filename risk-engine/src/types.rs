//! Core types for risk engine

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Settlement currency of a transaction.
///
/// Codes outside the supported set are preserved as `Unrecognized` and scored
/// with a neutral default weight instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    /// US dollar
    USD,
    /// Euro
    EUR,
    /// Pound sterling
    GBP,
    /// Nigerian naira
    NGN,
    /// Canadian dollar
    CAD,
    /// Australian dollar
    AUD,
    /// Japanese yen
    JPY,
    /// Any other code, uppercased
    Unrecognized(String),
}

impl Currency {
    /// Currencies with an explicit risk weight
    pub const SUPPORTED: [Currency; 7] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::NGN,
        Currency::CAD,
        Currency::AUD,
        Currency::JPY,
    ];

    /// ISO 4217 code
    pub fn code(&self) -> &str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::NGN => "NGN",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::JPY => "JPY",
            Currency::Unrecognized(code) => code,
        }
    }

    /// Check if the currency is outside the supported set
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Currency::Unrecognized(_))
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        let code = code.trim().to_uppercase();
        match code.as_str() {
            "USD" => Currency::USD,
            "EUR" => Currency::EUR,
            "GBP" => Currency::GBP,
            "NGN" => Currency::NGN,
            "CAD" => Currency::CAD,
            "AUD" => Currency::AUD,
            "JPY" => Currency::JPY,
            _ => Currency::Unrecognized(code),
        }
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Currency::from(code.as_str())
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Payment instrument used for a transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    /// credit_card
    CreditCard,
    /// debit_card
    DebitCard,
    /// bank_transfer
    BankTransfer,
    /// digital_wallet
    DigitalWallet,
    /// cash
    Cash,
    /// Any other method, lowercased
    Unrecognized(String),
}

impl PaymentMethod {
    /// Methods with an explicit risk weight
    pub const SUPPORTED: [PaymentMethod; 5] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::BankTransfer,
        PaymentMethod::DigitalWallet,
        PaymentMethod::Cash,
    ];

    /// Wire name
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::DigitalWallet => "digital_wallet",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Unrecognized(name) => name,
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "credit_card" => PaymentMethod::CreditCard,
            "debit_card" => PaymentMethod::DebitCard,
            "bank_transfer" => PaymentMethod::BankTransfer,
            "digital_wallet" => PaymentMethod::DigitalWallet,
            "cash" => PaymentMethod::Cash,
            _ => PaymentMethod::Unrecognized(name),
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(name: String) -> Self {
        PaymentMethod::from(name.as_str())
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offset-less layouts read as UTC, tried after RFC 3339
const NAIVE_TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Transaction time as submitted.
///
/// Text that cannot be read as a date-time is kept as `Invalid`; the temporal
/// extractor scores it instead of the batch being rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// Parsed instant, normalized to UTC
    At(DateTime<Utc>),
    /// Unparseable input, verbatim
    Invalid(String),
}

impl Timestamp {
    /// Parse RFC 3339, then ISO 8601 without an offset (taken as UTC), then a
    /// bare date (midnight UTC)
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Timestamp::At(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Timestamp::At(dt.with_timezone(&Utc));
        }

        for format in NAIVE_TIMESTAMP_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Timestamp::At(Utc.from_utc_datetime(&naive));
            }
        }

        let midnight = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0));
        match midnight {
            Some(naive) => Timestamp::At(Utc.from_utc_datetime(&naive)),
            None => Timestamp::Invalid(raw.to_string()),
        }
    }

    /// Parsed instant, if any
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::At(dt) => Some(*dt),
            Timestamp::Invalid(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::At(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Timestamp::At(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Timestamp::Invalid(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Timestamp::parse(&raw))
    }
}

/// A transaction submitted for scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Amount in units of `currency`
    pub amount: Decimal,

    /// Settlement currency
    pub currency: Currency,

    /// Merchant identifier
    pub merchant_id: String,

    /// Payment instrument
    pub payment_method: PaymentMethod,

    /// Customer email address
    pub customer_email: String,

    /// Customer IP address (not scored)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Device fingerprint (not scored)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Free-text description (not scored)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the transaction happened; evaluation time is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl Transaction {
    /// Create a transaction with the required fields only
    pub fn new(
        amount: Decimal,
        currency: impl Into<Currency>,
        merchant_id: impl Into<String>,
        payment_method: impl Into<PaymentMethod>,
        customer_email: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            currency: currency.into(),
            merchant_id: merchant_id.into(),
            payment_method: payment_method.into(),
            customer_email: customer_email.into(),
            ip_address: None,
            device_id: None,
            description: None,
            timestamp: None,
        }
    }

    /// Set the transaction timestamp
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Instant used for temporal scoring: the transaction's own time, or `now`
    /// when absent. `None` when the submitted timestamp could not be parsed.
    pub fn effective_timestamp(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match &self.timestamp {
            Some(timestamp) => timestamp.instant(),
            None => Some(now),
        }
    }
}

/// Discrete risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
}

impl RiskLevel {
    /// Lowercase label used on the wire and in metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round `value` half away from zero to `places` decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// Scores are kept at full precision in memory and rounded on the wire.
fn serialize_3dp<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 3))
}

fn serialize_2dp<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 2))
}

/// Scoring outcome for one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Whether the transaction is flagged as fraud
    pub is_fraud: bool,

    /// Certainty of the classification (0.5-0.99)
    #[serde(serialize_with = "serialize_3dp")]
    pub confidence: f64,

    /// Risk score (0-1)
    #[serde(serialize_with = "serialize_3dp")]
    pub risk_score: f64,

    /// Risk level
    pub risk_level: RiskLevel,

    /// Explanations in extractor order
    pub risk_factors: Vec<String>,

    /// Evaluation time in milliseconds
    #[serde(serialize_with = "serialize_2dp")]
    pub processing_time: f64,
}

/// Predictions for a whole batch plus summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// One prediction per input transaction, in input order
    pub predictions: Vec<Prediction>,

    /// Number of transactions evaluated
    pub total_processed: usize,

    /// Arithmetic mean of the risk scores (0 for an empty batch)
    #[serde(serialize_with = "serialize_3dp")]
    pub average_risk_score: f64,

    /// Number of predictions with `RiskLevel::High`
    pub high_risk_count: usize,
}

impl BatchResult {
    /// Build a result and its summary statistics from ordered predictions
    pub fn from_predictions(predictions: Vec<Prediction>) -> Self {
        let total_processed = predictions.len();
        let average_risk_score = if total_processed == 0 {
            0.0
        } else {
            predictions.iter().map(|p| p.risk_score).sum::<f64>() / total_processed as f64
        };
        let high_risk_count = predictions
            .iter()
            .filter(|p| p.risk_level == RiskLevel::High)
            .count();

        Self {
            predictions,
            total_processed,
            average_risk_score,
            high_risk_count,
        }
    }

    /// Number of predictions flagged as fraud
    pub fn fraud_count(&self) -> usize {
        self.predictions.iter().filter(|p| p.is_fraud).count()
    }
}
