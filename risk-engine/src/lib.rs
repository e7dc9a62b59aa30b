//! Risk Engine for FraudGuard
//!
//! Deterministic fraud-risk scoring for payment transactions: feature
//! extraction, score aggregation, classification and batch evaluation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod classifier;
pub mod error;
pub mod extractors;
pub mod jitter;
pub mod scoring;
pub mod tables;
pub mod types;

pub use batch::{EngineConfig, ModelInfo, RiskEngine};
pub use classifier::{Classification, Classifier, Thresholds, DEFAULT_FRAUD_THRESHOLD};
pub use error::{Error, Result};
pub use jitter::{JitterConfig, JitterMode, JitterSource};
pub use scoring::RiskScorer;
pub use types::*;
