//! Feature extractors
//!
//! Each extractor maps a [`Transaction`] to a [`Signal`]: an additive score
//! contribution plus the human-readable factors that explain it. Extractors
//! are pure; the only input besides the transaction is the evaluation instant
//! used when the transaction carries no timestamp.

use crate::tables;
use crate::types::{Currency, PaymentMethod, Transaction};
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Contribution of one extractor to the risk score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signal {
    /// Additive score contribution
    pub contribution: f64,
    /// Factors triggered by this extractor, in detection order
    pub factors: Vec<String>,
}

impl Signal {
    /// Signal with no contribution and no factor
    pub fn none() -> Self {
        Self::default()
    }

    /// Signal contributing `contribution` without explanation
    pub fn silent(contribution: f64) -> Self {
        Self {
            contribution,
            factors: Vec::new(),
        }
    }

    /// Signal contributing `contribution` with one factor
    pub fn with_factor(contribution: f64, factor: impl Into<String>) -> Self {
        Self {
            contribution,
            factors: vec![factor.into()],
        }
    }

    fn add(&mut self, contribution: f64, factor: impl Into<String>) {
        self.contribution += contribution;
        self.factors.push(factor.into());
    }
}

/// Extractor kinds in invocation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// Transaction amount tiers
    Amount,
    /// Payment instrument weight
    PaymentMethod,
    /// Email domain and username patterns
    Email,
    /// Merchant category reputation
    Merchant,
    /// Hour of day and day of week
    Temporal,
    /// Settlement currency weight
    Currency,
}

impl Extractor {
    /// Fixed invocation order used by the aggregator
    pub const ORDER: [Extractor; 6] = [
        Extractor::Amount,
        Extractor::PaymentMethod,
        Extractor::Email,
        Extractor::Merchant,
        Extractor::Temporal,
        Extractor::Currency,
    ];

    /// Feature description reported by model info
    pub fn description(&self) -> &'static str {
        match self {
            Extractor::Amount => "Transaction amount analysis",
            Extractor::PaymentMethod => "Payment method risk assessment",
            Extractor::Email => "Email domain verification",
            Extractor::Merchant => "Merchant category analysis",
            Extractor::Temporal => "Temporal pattern detection",
            Extractor::Currency => "Currency risk evaluation",
        }
    }

    /// Run this extractor
    pub fn extract(&self, tx: &Transaction, now: DateTime<Utc>) -> Signal {
        match self {
            Extractor::Amount => amount_signal(tx.amount),
            Extractor::PaymentMethod => payment_method_signal(&tx.payment_method),
            Extractor::Email => email_signal(&tx.customer_email),
            Extractor::Merchant => merchant_signal(&tx.merchant_id),
            Extractor::Temporal => match tx.effective_timestamp(now) {
                Some(timestamp) => temporal_signal(timestamp),
                None => Signal::with_factor(INVALID_TIMESTAMP_RISK, "Invalid timestamp format"),
            },
            Extractor::Currency => currency_signal(&tx.currency),
        }
    }
}

// ===== Amount =====

/// Contribution of the top amount tier
pub const AMOUNT_VERY_HIGH_RISK: f64 = 0.40;
const AMOUNT_HIGH_RISK: f64 = 0.30;
const AMOUNT_MODERATE_RISK: f64 = 0.15;
const AMOUNT_SMALL_RISK: f64 = 0.25;
const AMOUNT_BASELINE_RISK: f64 = 0.05;

/// Tiered amount risk
pub fn amount_signal(amount: Decimal) -> Signal {
    match amount {
        a if a > dec!(50000) => {
            Signal::with_factor(AMOUNT_VERY_HIGH_RISK, "Very high transaction amount")
        }
        a if a > dec!(10000) => Signal::with_factor(AMOUNT_HIGH_RISK, "High transaction amount"),
        a if a > dec!(1000) => {
            Signal::with_factor(AMOUNT_MODERATE_RISK, "Moderate transaction amount")
        }
        a if a < dec!(1.00) => Signal::with_factor(
            AMOUNT_SMALL_RISK,
            "Unusually small transaction amount (possible testing)",
        ),
        _ => Signal::silent(AMOUNT_BASELINE_RISK),
    }
}

// ===== Payment method =====

const UNRECOGNIZED_METHOD_RISK: f64 = 0.12;

/// Fixed weight per payment method: digital_wallet > credit_card >
/// debit_card > bank_transfer > cash.
pub fn payment_method_weight(method: &PaymentMethod) -> f64 {
    match method {
        PaymentMethod::DigitalWallet => 0.15,
        PaymentMethod::CreditCard => 0.08,
        PaymentMethod::DebitCard => 0.05,
        PaymentMethod::BankTransfer => 0.03,
        PaymentMethod::Cash => 0.0,
        PaymentMethod::Unrecognized(_) => UNRECOGNIZED_METHOD_RISK,
    }
}

/// Payment method risk
pub fn payment_method_signal(method: &PaymentMethod) -> Signal {
    let weight = payment_method_weight(method);

    match method {
        PaymentMethod::Unrecognized(_) => {
            Signal::with_factor(weight, "Unrecognized payment method")
        }
        _ if weight >= 0.15 => {
            Signal::with_factor(weight, format!("High-risk payment method: {}", method))
        }
        _ if weight >= 0.08 => {
            Signal::with_factor(weight, format!("Medium-risk payment method: {}", method))
        }
        _ => Signal::silent(weight),
    }
}

// ===== Email =====

const MALFORMED_EMAIL_RISK: f64 = 0.15;
const DISPOSABLE_EMAIL_RISK: f64 = 0.40;
const FREE_PROVIDER_RISK: f64 = 0.02;
const SHORT_USERNAME_RISK: f64 = 0.15;
const NUMERIC_USERNAME_RISK: f64 = 0.10;

/// Usernames at or below this length are considered suspicious
pub const SHORT_USERNAME_MAX_LEN: usize = 3;

/// Email domain reputation and username patterns
pub fn email_signal(email: &str) -> Signal {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return Signal::with_factor(MALFORMED_EMAIL_RISK, "Malformed email address");
    };

    let domain = domain.trim().to_lowercase();
    let mut signal = Signal::none();

    if tables::is_disposable_domain(&domain) {
        signal.add(DISPOSABLE_EMAIL_RISK, "Disposable email domain");
    } else if tables::is_free_provider(&domain) {
        signal.add(FREE_PROVIDER_RISK, "Free email provider");
    }

    let local_len = local.chars().count();
    if local_len <= SHORT_USERNAME_MAX_LEN {
        signal.add(SHORT_USERNAME_RISK, "Suspicious short email username");
    }

    let digits = local.chars().filter(|c| c.is_ascii_digit()).count();
    if local_len > 0 && digits * 2 > local_len {
        signal.add(NUMERIC_USERNAME_RISK, "Numeric-heavy email username");
    }

    signal
}

// ===== Merchant =====

const HIGH_RISK_MERCHANT: f64 = 0.30;
const MEDIUM_RISK_MERCHANT: f64 = 0.15;
const UNKNOWN_MERCHANT_RISK: f64 = 0.20;

/// Merchant category reputation
pub fn merchant_signal(merchant_id: &str) -> Signal {
    let normalized = merchant_id.trim().to_uppercase();
    let mut signal = Signal::none();

    if let Some(category) = tables::merchant_category(&normalized) {
        match category.tier() {
            tables::MerchantTier::High => signal.add(
                HIGH_RISK_MERCHANT,
                format!("High-risk merchant category: {}", category),
            ),
            tables::MerchantTier::Medium => signal.add(
                MEDIUM_RISK_MERCHANT,
                format!("Medium-risk merchant category: {}", category),
            ),
        }
    }

    if tables::is_unknown_merchant(&normalized) {
        signal.add(UNKNOWN_MERCHANT_RISK, "New or unrecognized merchant");
    }

    signal
}

// ===== Temporal =====

const LATE_NIGHT_RISK: f64 = 0.15;
const WEEKEND_RISK: f64 = 0.05;
const INVALID_TIMESTAMP_RISK: f64 = 0.05;

/// First hour (UTC) no longer considered late night
pub const LATE_NIGHT_END_HOUR: u32 = 6;
/// First hour (UTC) considered late night
pub const LATE_NIGHT_START_HOUR: u32 = 23;

/// Hour-of-day and day-of-week patterns (UTC)
pub fn temporal_signal(timestamp: DateTime<Utc>) -> Signal {
    let mut signal = Signal::none();

    let hour = timestamp.hour();
    if hour < LATE_NIGHT_END_HOUR || hour >= LATE_NIGHT_START_HOUR {
        signal.add(LATE_NIGHT_RISK, "Late-night transaction");
    }

    if matches!(timestamp.weekday(), Weekday::Sat | Weekday::Sun) {
        signal.add(WEEKEND_RISK, "Weekend transaction");
    }

    signal
}

// ===== Currency =====

const UNRECOGNIZED_CURRENCY_RISK: f64 = 0.05;

/// Fixed weight per currency
pub fn currency_weight(currency: &Currency) -> f64 {
    match currency {
        Currency::NGN => 0.20,
        Currency::EUR | Currency::GBP => 0.10,
        Currency::USD | Currency::CAD | Currency::AUD | Currency::JPY => 0.0,
        Currency::Unrecognized(_) => UNRECOGNIZED_CURRENCY_RISK,
    }
}

/// Currency risk
pub fn currency_signal(currency: &Currency) -> Signal {
    let weight = currency_weight(currency);

    match currency {
        Currency::Unrecognized(_) => Signal::with_factor(weight, "Unrecognized currency"),
        _ if weight >= 0.20 => {
            Signal::with_factor(weight, format!("High-risk currency: {}", currency))
        }
        _ if weight >= 0.10 => {
            Signal::with_factor(weight, format!("Medium-risk currency: {}", currency))
        }
        _ => Signal::silent(weight),
    }
}
