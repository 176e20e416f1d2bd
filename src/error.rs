//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// Status code, machine-readable code and optional details
    fn parts(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            AppError::Domain(domain_err) => match domain_err {
                DomainError::InvalidAmount(msg) => {
                    (StatusCode::BAD_REQUEST, "invalid_amount", Some(msg.clone()))
                }
                DomainError::InvalidRate(msg) => {
                    (StatusCode::BAD_REQUEST, "invalid_rate", Some(msg.clone()))
                }
                DomainError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "validation_failed", Some(msg.clone()))
                }

                // 404 Not Found
                DomainError::AccountNotFound(number) => {
                    (StatusCode::NOT_FOUND, "account_not_found", Some(number.clone()))
                }
                DomainError::ClientNotFound(id) => {
                    (StatusCode::NOT_FOUND, "client_not_found", Some(id.to_string()))
                }

                // 409 Conflict
                DomainError::DuplicateAccountNumber(number) => {
                    (StatusCode::CONFLICT, "duplicate_account_number", Some(number.clone()))
                }
                DomainError::DuplicateClient(name) => {
                    (StatusCode::CONFLICT, "duplicate_client", Some(name.clone()))
                }
                DomainError::BalanceConflict(number) => {
                    (StatusCode::CONFLICT, "balance_conflict", Some(number.clone()))
                }

                // 422 Unprocessable Entity
                DomainError::InsufficientFunds { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "insufficient_funds",
                    Some(domain_err.to_string()),
                ),
                DomainError::BalanceLimitExceeded(limit) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "balance_limit_exceeded",
                    Some(limit.to_string()),
                ),
            },

            AppError::Store(StoreError::StaleBalance { account_id }) => (
                StatusCode::CONFLICT,
                "balance_conflict",
                Some(account_id.to_string()),
            ),
            AppError::Store(StoreError::NumericOverflow(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "balance_limit_exceeded", None)
            }

            // 500 Internal Server Error
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error", None),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    /// Failures the caller cannot fix; these get logged with full context.
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = self.parts();

        let error = if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
            // Internals stay in the log.
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (AppError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::validation("x").into(), StatusCode::BAD_REQUEST),
            (DomainError::InvalidRate("x".into()).into(), StatusCode::BAD_REQUEST),
            (DomainError::AccountNotFound("A".into()).into(), StatusCode::NOT_FOUND),
            (DomainError::ClientNotFound(1).into(), StatusCode::NOT_FOUND),
            (DomainError::DuplicateAccountNumber("A".into()).into(), StatusCode::CONFLICT),
            (DomainError::DuplicateClient("A".into()).into(), StatusCode::CONFLICT),
            (
                DomainError::insufficient_funds(dec!(2), dec!(1)).into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                StoreError::StaleBalance { account_id: 1 }.into(),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::balance_limit_exceeded().into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                StoreError::NumericOverflow("1e17".into()).into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                StoreError::InvalidRow("bad".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "{:?}", err);
        }
    }

    #[test]
    fn test_internal_classification() {
        assert!(AppError::from(StoreError::InvalidRow("bad".into())).is_internal());
        assert!(!AppError::from(DomainError::AccountNotFound("A".into())).is_internal());
    }

    #[test]
    fn test_error_response_serialization() {
        let body = ErrorResponse {
            error: "Account not found: X".to_string(),
            error_code: "account_not_found".to_string(),
            details: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["errorCode"], "account_not_found");
        assert!(json.get("details").is_none());
    }
}
