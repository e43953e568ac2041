//! # Validation Module
//!
//! Fail-fast validation of order-creation requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP deserialization (serde)                                 │
//! │  └── Type/shape checks, rejects non-numeric coordinates                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  └── Runs before any database work; a failure here guarantees          │
//! │      zero side effects                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL / UNIQUE / FK constraints, stock >= quantity guard       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::NewOrder;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the delivery address.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Maximum 500 characters
pub fn validate_delivery_address(address: &str) -> ValidationResult<()> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::Required {
            field: "delivery_address".to_string(),
        });
    }

    if address.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "delivery_address".to_string(),
            max: 500,
        });
    }

    Ok(())
}

/// Validates the customer phone number.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Maximum 32 characters
///
/// Format is intentionally loose: numbers arrive with country codes, spaces
/// and dashes, and the delivery partner dials whatever the customer typed.
pub fn validate_customer_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "customer_phone".to_string(),
        });
    }

    if phone.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "customer_phone".to_string(),
            max: 32,
        });
    }

    Ok(())
}

/// Validates the optional customer coordinates.
///
/// ## Rules
/// - Both present or both absent; a lone latitude or longitude is an error
/// - Both must be finite when present
pub fn validate_customer_location(lat: Option<f64>, lng: Option<f64>) -> ValidationResult<()> {
    match (lat, lng) {
        (None, None) => Ok(()),
        (Some(lat), Some(lng)) => {
            if !lat.is_finite() || !lng.is_finite() {
                return Err(ValidationError::InvalidFormat {
                    field: "customer_location".to_string(),
                    reason: "coordinates must be finite numbers".to_string(),
                });
            }
            Ok(())
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "customer_location".to_string(),
            reason: "latitude and longitude must be supplied together".to_string(),
        }),
    }
}

// =============================================================================
// Request Validator
// =============================================================================

/// Validates a complete order-creation request.
///
/// Runs every check before any database work starts, so a failure here has
/// no side effects by construction. Existence checks (pharmacy, medicines,
/// stock) belong to the database layer and run inside the order transaction.
pub fn validate_new_order(req: &NewOrder) -> ValidationResult<()> {
    if req.pharmacy_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "pharmacy_id".to_string(),
        });
    }

    if req.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if req.items.len() > MAX_ORDER_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_ITEMS as i64,
        });
    }

    for item in &req.items {
        if item.medicine_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "medicine_id".to_string(),
            });
        }
        validate_quantity(item.quantity)?;
    }

    validate_delivery_address(&req.delivery_address)?;
    validate_customer_phone(&req.customer_phone)?;
    validate_customer_location(req.customer_lat, req.customer_lng)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewOrderItem;

    fn valid_request() -> NewOrder {
        NewOrder {
            pharmacy_id: "ph-1".to_string(),
            items: vec![NewOrderItem {
                medicine_id: "med-1".to_string(),
                quantity: 2,
            }],
            is_express: false,
            delivery_address: "12 Hospital Rd, Satna".to_string(),
            customer_phone: "+91 98765 43210".to_string(),
            customer_lat: None,
            customer_lng: None,
            user_id: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_new_order(&valid_request()).is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut req = valid_request();
        req.items.clear();
        assert!(matches!(
            validate_new_order(&req),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_blank_pharmacy_rejected() {
        let mut req = valid_request();
        req.pharmacy_id = "  ".to_string();
        assert!(validate_new_order(&req).is_err());
    }

    #[test]
    fn test_blank_address_and_phone_rejected() {
        let mut req = valid_request();
        req.delivery_address = "".to_string();
        assert!(validate_new_order(&req).is_err());

        let mut req = valid_request();
        req.customer_phone = "   ".to_string();
        assert!(validate_new_order(&req).is_err());
    }

    #[test]
    fn test_nonpositive_line_quantity_rejected() {
        let mut req = valid_request();
        req.items[0].quantity = 0;
        assert!(matches!(
            validate_new_order(&req),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_lone_coordinate_rejected() {
        assert!(validate_customer_location(Some(24.5), None).is_err());
        assert!(validate_customer_location(None, Some(80.8)).is_err());
        assert!(validate_customer_location(None, None).is_ok());
        assert!(validate_customer_location(Some(24.5), Some(80.8)).is_ok());
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        assert!(validate_customer_location(Some(f64::NAN), Some(80.8)).is_err());
        assert!(validate_customer_location(Some(24.5), Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_too_many_items_rejected() {
        let mut req = valid_request();
        req.items = (0..=MAX_ORDER_ITEMS)
            .map(|i| NewOrderItem {
                medicine_id: format!("med-{i}"),
                quantity: 1,
            })
            .collect();
        assert!(matches!(
            validate_new_order(&req),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
