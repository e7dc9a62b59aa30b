//! Error types for risk engine

use thiserror::Error;

/// Risk engine error
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A transaction in the batch violates a domain constraint
    #[error("Invalid transaction at index {index}: field `{field}` {reason}")]
    InvalidTransactionField {
        /// Position of the offending transaction in the batch
        index: usize,
        /// Field name as it appears on the wire
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Index of the offending transaction, if the error refers to one
    pub fn transaction_index(&self) -> Option<usize> {
        match self {
            Error::InvalidTransactionField { index, .. } => Some(*index),
            Error::InvalidConfig(_) => None,
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
