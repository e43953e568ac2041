//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Wire Format
//! This is what clients receive when a request fails:
//! ```json
//! {
//!   "kind": "insufficient_stock",
//!   "message": "Insufficient stock for medicine med-1: available 3, requested 5",
//!   "medicine_id": "med-1"
//! }
//! ```
//! `kind` is machine-readable and stable; `message` is for humans.
//! `medicine_id` is only present for insufficient-stock failures, naming the
//! offending line.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use medirush_core::CoreError;
use medirush_db::{DbError, OrderError};

/// Machine-readable failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input; the caller's fault, nothing touched (400)
    Validation,

    /// Unknown pharmacy / medicine / order reference (404)
    NotFound,

    /// One or more lines cannot be satisfied; whole order rejected (409)
    InsufficientStock,

    /// The order is not in a state that allows the requested transition (409)
    Conflict,

    /// Infrastructure failure; the operation rolled back and may be retried (500)
    Persistence,
}

/// API error returned from handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error kind for programmatic handling
    pub kind: ErrorKind,

    /// Human-readable error message for display
    pub message: String,

    /// For insufficient-stock failures: the offending medicine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medicine_id: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ApiError {
            kind,
            message: message.into(),
            medicine_id: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorKind::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::Validation, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InsufficientStock | ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, axum::Json(self)).into_response()
    }
}

/// Converts domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::PharmacyNotFound(_)
            | CoreError::MedicineNotFound { .. }
            | CoreError::OrderNotFound(_) => ApiError::new(ErrorKind::NotFound, err.to_string()),

            CoreError::InsufficientStock { ref medicine_id, .. } => {
                let id = medicine_id.clone();
                ApiError {
                    kind: ErrorKind::InsufficientStock,
                    message: err.to_string(),
                    medicine_id: Some(id),
                }
            }

            CoreError::InvalidStatusTransition { .. } => {
                ApiError::new(ErrorKind::Conflict, err.to_string())
            }

            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts database errors to API errors.
///
/// Everything infrastructural is reported as a retryable persistence failure
/// with a generic message; the real cause goes to the log, not the client.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            other => {
                tracing::error!(error = %other, "database failure");
                ApiError::new(ErrorKind::Persistence, "Database operation failed")
            }
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Domain(e) => ApiError::from(e),
            OrderError::Db(e) => ApiError::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_carries_medicine_id() {
        let api_err: ApiError = CoreError::InsufficientStock {
            medicine_id: "med-1".to_string(),
            available: 3,
            requested: 5,
        }
        .into();

        assert_eq!(api_err.kind, ErrorKind::InsufficientStock);
        assert_eq!(api_err.medicine_id.as_deref(), Some("med-1"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::InsufficientStock).unwrap();
        assert_eq!(json, "\"insufficient_stock\"");
    }
}
