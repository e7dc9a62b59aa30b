//! Prediction classifier: risk score → fraud flag, risk level, confidence

use crate::{Error, Result, RiskLevel};
use serde::{Deserialize, Serialize};

/// Score at which the medium bucket starts (inclusive)
pub const DEFAULT_MEDIUM_THRESHOLD: f64 = 0.3;

/// Score at which the medium bucket ends (inclusive)
pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.6;

/// Scores strictly above this are flagged as fraud
pub const DEFAULT_FRAUD_THRESHOLD: f64 = 0.6;

/// Confidence floor
pub const MIN_CONFIDENCE: f64 = 0.5;

/// Confidence ceiling
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Classification thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Lower inclusive bound of the medium bucket
    pub medium: f64,
    /// Upper inclusive bound of the medium bucket
    pub high: f64,
    /// Fraud decision boundary
    pub fraud: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            medium: DEFAULT_MEDIUM_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
            fraud: DEFAULT_FRAUD_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Check that the thresholds are ordered and within [0, 1]
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);

        if !in_range(self.medium) || !in_range(self.high) || !in_range(self.fraud) {
            return Err(Error::InvalidConfig(format!(
                "thresholds must lie in [0, 1] (medium={}, high={}, fraud={})",
                self.medium, self.high, self.fraud
            )));
        }

        if self.medium > self.high {
            return Err(Error::InvalidConfig(format!(
                "medium threshold {} exceeds high threshold {}",
                self.medium, self.high
            )));
        }

        Ok(())
    }
}

/// Classification of one risk score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Score above the fraud threshold
    pub is_fraud: bool,
    /// Risk bucket
    pub risk_level: RiskLevel,
    /// Distance-from-boundary confidence
    pub confidence: f64,
}

/// Maps risk scores to classifications
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    /// Create a classifier with validated thresholds
    pub fn new(thresholds: Thresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    /// Active thresholds
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Risk bucket for a score
    pub fn risk_level(&self, score: f64) -> RiskLevel {
        if score < self.thresholds.medium {
            RiskLevel::Low
        } else if score <= self.thresholds.high {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Fraud decision for a score
    pub fn is_fraud(&self, score: f64) -> bool {
        score > self.thresholds.fraud
    }

    /// Confidence grows with the distance from the fraud boundary
    pub fn confidence(&self, score: f64) -> f64 {
        let distance = (score - self.thresholds.fraud).abs();
        (MIN_CONFIDENCE + distance).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
    }

    /// Classify a score
    pub fn classify(&self, score: f64) -> Classification {
        Classification {
            is_fraud: self.is_fraud(score),
            risk_level: self.risk_level(score),
            confidence: self.confidence(score),
        }
    }
}
