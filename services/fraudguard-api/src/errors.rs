use crate::models::ErrorResponse;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    /// Body is not parseable JSON
    BadRequest(String),
    /// Well-formed JSON that fails field or batch validation
    ValidationError(String),
    /// Rejected by the scoring engine
    EngineError(risk_engine::Error),
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::EngineError(e) => write!(f, "{}", e),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::EngineError(risk_engine::Error::InvalidTransactionField { .. }) => {
                "INVALID_TRANSACTION"
            }
            ApiError::EngineError(risk_engine::Error::InvalidConfig(_)) => "CONFIGURATION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_)
            | ApiError::EngineError(risk_engine::Error::InvalidTransactionField { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::EngineError(risk_engine::Error::InvalidConfig(_))
            | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        })
    }
}

impl From<risk_engine::Error> for ApiError {
    fn from(err: risk_engine::Error) -> Self {
        ApiError::EngineError(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("eof".into()).error_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::ValidationError("amount".into()).error_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let engine_err = ApiError::from(risk_engine::Error::InvalidTransactionField {
            index: 3,
            field: "amount",
            reason: "must be positive".into(),
        });
        assert_eq!(engine_err.error_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(engine_err.to_string().contains("index 3"));

        assert_eq!(
            ApiError::InternalError("boom".into()).error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
