//! Risk scoring engine
//!
//! Runs every feature extractor in [`Extractor::ORDER`], sums their
//! contributions, adds one jitter sample and clamps the result to `[0, 1]`.

use crate::extractors::Extractor;
use crate::jitter::JitterSource;
use crate::Transaction;
use chrono::{DateTime, Utc};

/// Raw scoring output for one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTransaction {
    /// Clamped risk score (0-1)
    pub risk_score: f64,
    /// Triggered factors in extractor order
    pub risk_factors: Vec<String>,
}

/// Risk scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    /// Create new risk scorer
    pub fn new() -> Self {
        Self
    }

    /// Score a transaction.
    ///
    /// `now` stands in for a missing transaction timestamp.
    pub fn score(
        &self,
        tx: &Transaction,
        now: DateTime<Utc>,
        jitter: &mut dyn JitterSource,
    ) -> ScoredTransaction {
        let mut total = 0.0;
        let mut risk_factors = Vec::new();

        for extractor in Extractor::ORDER {
            let signal = extractor.extract(tx, now);
            total += signal.contribution;
            risk_factors.extend(signal.factors);
        }

        total += jitter.sample();

        ScoredTransaction {
            risk_score: clamp_score(total),
            risk_factors,
        }
    }
}

/// Truncate a raw sum into `[0, 1]`; NaN maps to 0
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 1.0)
}
