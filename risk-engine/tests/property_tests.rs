//! Property-based tests for scoring invariants
//!
//! These tests use proptest to verify:
//! - Bounds: risk score in [0, 1], confidence in [0.5, 0.99]
//! - Idempotence: same transaction → same prediction in deterministic mode
//! - Order preservation: predictions[i] belongs to transactions[i]
//! - Amount tiers: > 50,000 hits the top tier, < 1.00 flags testing

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use risk_engine::extractors::{amount_signal, AMOUNT_VERY_HIGH_RISK};
use risk_engine::{
    Classifier, EngineConfig, JitterConfig, JitterMode, RiskEngine, RiskLevel, Timestamp,
    Transaction,
};
use rust_decimal::Decimal;

/// Strategy for generating positive amounts (cents)
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..20_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating currency codes, including unknown ones
fn currency_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("USD".to_string()),
        Just("EUR".to_string()),
        Just("GBP".to_string()),
        Just("NGN".to_string()),
        Just("CAD".to_string()),
        Just("AUD".to_string()),
        Just("JPY".to_string()),
        "[A-Z]{3}",
    ]
}

/// Strategy for generating payment methods, including unknown ones
fn payment_method_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("credit_card".to_string()),
        Just("debit_card".to_string()),
        Just("bank_transfer".to_string()),
        Just("digital_wallet".to_string()),
        Just("cash".to_string()),
        "[a-z_]{3,12}",
    ]
}

/// Strategy for generating emails, malformed ones included
fn email_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9.]{1,12}@(gmail\\.com|tempmail\\.org|corp\\.io|10minutemail\\.com)",
        "[a-z0-9]{1,12}",
    ]
}

/// Strategy for generating merchant ids
fn merchant_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z]{3,8}_[0-9]{3}",
        Just("CRYPTO_EXCHANGE_001".to_string()),
        Just("NEW_TRAVEL_DESK".to_string()),
        Just("JEWELRY_HOUSE".to_string()),
    ]
}

/// Strategy for generating instants across all hours and weekdays
fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..(3 * 365 * 24 * 3600)).prop_map(|offset| {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(offset)
    })
}

/// Strategy for generating timestamps: absent, parsed, or unparseable text
fn timestamp_strategy() -> impl Strategy<Value = Option<Timestamp>> {
    prop_oneof![
        Just(None),
        instant_strategy().prop_map(|dt| Some(Timestamp::from(dt))),
        "[a-z]{1,10}".prop_map(|raw| Some(Timestamp::parse(&raw))),
    ]
}

/// Strategy for generating valid transactions
fn transaction_strategy() -> impl Strategy<Value = Transaction> {
    (
        amount_strategy(),
        currency_strategy(),
        merchant_strategy(),
        payment_method_strategy(),
        email_strategy(),
        timestamp_strategy(),
    )
        .prop_map(|(amount, currency, merchant, method, email, timestamp)| {
            let mut tx = Transaction::new(amount, currency, merchant, method, email);
            tx.timestamp = timestamp;
            tx
        })
}

fn entropy_engine() -> RiskEngine {
    RiskEngine::new(EngineConfig {
        jitter: JitterConfig {
            mode: JitterMode::Entropy,
            amplitude: 0.1,
        },
        ..EngineConfig::default()
    })
    .unwrap()
}

proptest! {
    /// Property: scores and confidences stay within their ranges, even with jitter
    #[test]
    fn prediction_bounds(batch in prop::collection::vec(transaction_strategy(), 0..20)) {
        let result = entropy_engine().evaluate(&batch).unwrap();

        prop_assert_eq!(result.total_processed, batch.len());
        for prediction in &result.predictions {
            prop_assert!((0.0..=1.0).contains(&prediction.risk_score));
            prop_assert!((0.5..=0.99).contains(&prediction.confidence));
            prop_assert!(prediction.processing_time >= 0.0);
        }
    }

    /// Property: deterministic mode is idempotent
    #[test]
    fn deterministic_idempotence(tx in transaction_strategy()) {
        let engine = RiskEngine::deterministic();
        let now = Utc::now();

        let a = engine.evaluate_at(std::slice::from_ref(&tx), now).unwrap();
        let b = engine.evaluate_at(std::slice::from_ref(&tx), now).unwrap();

        let (a, b) = (&a.predictions[0], &b.predictions[0]);
        prop_assert_eq!(a.risk_score, b.risk_score);
        prop_assert_eq!(&a.risk_factors, &b.risk_factors);
        prop_assert_eq!(a.is_fraud, b.is_fraud);
        prop_assert_eq!(a.risk_level, b.risk_level);
    }

    /// Property: prediction i is the prediction of transaction i
    #[test]
    fn order_preservation(batch in prop::collection::vec(transaction_strategy(), 1..15)) {
        let engine = RiskEngine::deterministic();
        let now = Utc::now();

        let result = engine.evaluate_at(&batch, now).unwrap();
        prop_assert_eq!(result.predictions.len(), batch.len());

        for (tx, prediction) in batch.iter().zip(&result.predictions) {
            let single = engine.evaluate_at(std::slice::from_ref(tx), now).unwrap();
            prop_assert_eq!(single.predictions[0].risk_score, prediction.risk_score);
            prop_assert_eq!(&single.predictions[0].risk_factors, &prediction.risk_factors);
        }
    }

    /// Property: summary statistics match the predictions
    #[test]
    fn summary_statistics(batch in prop::collection::vec(transaction_strategy(), 1..20)) {
        let result = RiskEngine::deterministic().evaluate(&batch).unwrap();

        let mean = result.predictions.iter().map(|p| p.risk_score).sum::<f64>()
            / result.predictions.len() as f64;
        let high = result.predictions.iter().filter(|p| p.risk_level == RiskLevel::High).count();

        prop_assert!((result.average_risk_score - mean).abs() < 1e-9);
        prop_assert_eq!(result.high_risk_count, high);
    }

    /// Property: amounts above 50,000 hit the top tier
    #[test]
    fn very_high_amount_tier(cents in 5_000_001i64..1_000_000_000i64) {
        let signal = amount_signal(Decimal::new(cents, 2));
        prop_assert_eq!(signal.contribution, AMOUNT_VERY_HIGH_RISK);
    }

    /// Property: amounts below 1.00 are flagged as possible testing
    #[test]
    fn small_amount_flagged(cents in 1i64..100i64) {
        let signal = amount_signal(Decimal::new(cents, 2));
        prop_assert!(signal
            .factors
            .iter()
            .any(|f| f == "Unusually small transaction amount (possible testing)"));
    }

    /// Property: confidence never decreases moving away from the fraud threshold
    #[test]
    fn confidence_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let classifier = Classifier::default();
        let (near, far) = if (a - 0.6).abs() <= (b - 0.6).abs() { (a, b) } else { (b, a) };

        prop_assert!(classifier.confidence(near) <= classifier.confidence(far));
    }
}
