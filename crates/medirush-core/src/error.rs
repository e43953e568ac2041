//! # Error Types
//!
//! Domain-specific error types for medirush-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medirush-core errors (this file)                                      │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  medirush-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (in app)                                                   │
//! │  └── ApiError         - What HTTP clients see (kind + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → OrderError → ApiError → Client    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, requested vs available, ...)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a distinct, machine-readable failure kind

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent domain rule violations. None of them imply any
/// persisted state change: every path that raises one unwinds cleanly.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced pharmacy does not exist.
    #[error("Pharmacy not found: {0}")]
    PharmacyNotFound(String),

    /// The referenced medicine does not exist, or belongs to a different
    /// pharmacy than the one the order targets.
    #[error("Medicine {medicine_id} not found for pharmacy {pharmacy_id}")]
    MedicineNotFound {
        medicine_id: String,
        pharmacy_id: String,
    },

    /// A line cannot be satisfied from current stock. The whole order is
    /// rejected; no partial fulfillment.
    #[error("Insufficient stock for medicine {medicine_id}: available {available}, requested {requested}")]
    InsufficientStock {
        medicine_id: String,
        available: i64,
        requested: i64,
    },

    /// The referenced order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// The order is not in a state that allows the requested transition.
    #[error("Order {order_id} is {from}, cannot move to {to}")]
    InvalidStatusTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any database work; the caller's fault, nothing touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. non-finite coordinate, lone lat without lng).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            medicine_id: "med-1".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for medicine med-1: available 3, requested 5"
        );
    }

    #[test]
    fn test_transition_error_message() {
        let err = CoreError::InvalidStatusTransition {
            order_id: "ord-1".to_string(),
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        };
        assert_eq!(err.to_string(), "Order ord-1 is delivered, cannot move to pending");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "delivery_address".to_string(),
        };
        assert_eq!(err.to_string(), "delivery_address is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
