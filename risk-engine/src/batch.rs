//! Batch orchestration
//!
//! [`RiskEngine`] validates, scores and classifies a batch of transactions and
//! rolls the predictions into a [`BatchResult`]. One invalid transaction fails
//! the whole batch; predictions are never silently dropped.

use crate::classifier::{Classifier, Thresholds};
use crate::extractors::Extractor;
use crate::jitter::{JitterConfig, JitterSource};
use crate::scoring::RiskScorer;
use crate::tables::TABLES_VERSION;
use crate::{BatchResult, Currency, Error, PaymentMethod, Prediction, Result, Transaction};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

/// Model name reported by [`RiskEngine::model_info`]
pub const MODEL_NAME: &str = "FraudGuard Risk Model";

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    /// Classification thresholds
    pub thresholds: Thresholds,
    /// Jitter source selection
    pub jitter: JitterConfig,
}

impl EngineConfig {
    /// Deterministic configuration with default thresholds
    pub fn deterministic() -> Self {
        Self::default()
    }

    /// Validate thresholds and jitter bounds
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.jitter.validate()
    }
}

/// Static description of the scoring model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Model name
    pub name: String,
    /// Crate version
    pub version: String,
    /// Feature descriptions in extractor order
    pub features: Vec<String>,
    /// Named thresholds
    pub risk_thresholds: BTreeMap<String, f64>,
    /// Currencies with an explicit weight
    pub supported_currencies: Vec<String>,
    /// Payment methods with an explicit weight
    pub supported_payment_methods: Vec<String>,
    /// Version of the trigger lookup tables
    pub tables_version: String,
    /// Whether scores are reproducible
    pub deterministic: bool,
}

/// Risk engine: the in-process entry point for scoring batches
#[derive(Debug, Clone)]
pub struct RiskEngine {
    scorer: RiskScorer,
    classifier: Classifier,
    config: EngineConfig,
}

impl RiskEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            scorer: RiskScorer::new(),
            classifier: Classifier::new(config.thresholds)?,
            config,
        })
    }

    /// Engine with default thresholds and jitter disabled
    pub fn deterministic() -> Self {
        Self {
            scorer: RiskScorer::new(),
            classifier: Classifier::default(),
            config: EngineConfig::deterministic(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a batch using the current time for missing timestamps
    pub fn evaluate(&self, transactions: &[Transaction]) -> Result<BatchResult> {
        self.evaluate_at(transactions, Utc::now())
    }

    /// Evaluate a batch with an explicit evaluation instant
    pub fn evaluate_at(
        &self,
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> Result<BatchResult> {
        for (index, tx) in transactions.iter().enumerate() {
            validate_transaction(index, tx)?;
        }

        let batch_start = Instant::now();
        let mut jitter = self.config.jitter.source();

        let predictions: Vec<Prediction> = transactions
            .iter()
            .enumerate()
            .map(|(index, tx)| {
                let prediction = self.predict(tx, now, jitter.as_mut());
                debug!(
                    "Transaction {}: risk={:.3}, level={}, fraud={}",
                    index + 1,
                    prediction.risk_score,
                    prediction.risk_level,
                    prediction.is_fraud
                );
                prediction
            })
            .collect();

        let result = BatchResult::from_predictions(predictions);

        info!(
            "Batch of {} transactions evaluated in {:.2}ms (avg risk {:.3}, {} high risk)",
            result.total_processed,
            batch_start.elapsed().as_secs_f64() * 1000.0,
            result.average_risk_score,
            result.high_risk_count
        );

        Ok(result)
    }

    /// Evaluate a single transaction
    pub fn evaluate_one(&self, tx: &Transaction) -> Result<Prediction> {
        validate_transaction(0, tx)?;
        let mut jitter = self.config.jitter.source();
        Ok(self.predict(tx, Utc::now(), jitter.as_mut()))
    }

    fn predict(
        &self,
        tx: &Transaction,
        now: DateTime<Utc>,
        jitter: &mut dyn JitterSource,
    ) -> Prediction {
        let started = Instant::now();

        let scored = self.scorer.score(tx, now, jitter);
        let classification = self.classifier.classify(scored.risk_score);

        Prediction {
            is_fraud: classification.is_fraud,
            confidence: classification.confidence,
            risk_score: scored.risk_score,
            risk_level: classification.risk_level,
            risk_factors: scored.risk_factors,
            processing_time: started.elapsed().as_secs_f64() * 1000.0,
        }
    }

    /// Static model metadata
    pub fn model_info(&self) -> ModelInfo {
        let thresholds = self.classifier.thresholds();
        let risk_thresholds = BTreeMap::from([
            ("medium".to_string(), thresholds.medium),
            ("high".to_string(), thresholds.high),
            ("fraud".to_string(), thresholds.fraud),
        ]);

        ModelInfo {
            name: MODEL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            features: Extractor::ORDER
                .iter()
                .map(|e| e.description().to_string())
                .collect(),
            risk_thresholds,
            supported_currencies: Currency::SUPPORTED.iter().map(|c| c.to_string()).collect(),
            supported_payment_methods: PaymentMethod::SUPPORTED
                .iter()
                .map(|m| m.to_string())
                .collect(),
            tables_version: TABLES_VERSION.to_string(),
            deterministic: self.config.jitter.is_deterministic(),
        }
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::deterministic()
    }
}

fn validate_transaction(index: usize, tx: &Transaction) -> Result<()> {
    if tx.amount <= Decimal::ZERO {
        return Err(Error::InvalidTransactionField {
            index,
            field: "amount",
            reason: format!("must be positive, got {}", tx.amount),
        });
    }

    if tx.merchant_id.trim().is_empty() {
        return Err(Error::InvalidTransactionField {
            index,
            field: "merchantId",
            reason: "must not be empty".to_string(),
        });
    }

    Ok(())
}
