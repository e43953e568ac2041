//! # Domain Types
//!
//! Core domain types used throughout MediRush.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Pharmacy     │   │    Medicine     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  lat / lng      │   │  pharmacy_id    │   │  order_number   │       │
//! │  │  is_approved    │   │  price_paise    │   │  status         │       │
//! │  └─────────────────┘   │  stock_qty      │   │  total_paise    │       │
//! │                        └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ 1:N            │
//! │                                              ┌────────▼────────┐       │
//! │                                              │   OrderItem     │       │
//! │                                              │  unit price as  │       │
//! │                                              │  charged, frozen│       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Orders have:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `order_number`: human-readable business identifier shown to customers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of an order.
///
/// ## Allowed Transitions
/// ```text
/// pending ──► paid ──────────┐
///    │  │                    ▼
///    │  └──► out_for_delivery ──► delivered
///    └─────► cancelled
/// ```
/// Creation always starts at `pending`; no transition ever moves backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order created, awaiting payment.
    Pending,
    /// Payment confirmed by the payment collaborator.
    Paid,
    /// Order cancelled before dispatch.
    Cancelled,
    /// Handed to a delivery partner.
    OutForDelivery,
    /// Delivered to the customer.
    Delivered,
}

impl OrderStatus {
    /// Stable string form, matching the database and wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// The statuses an order may be in immediately before entering `self`.
    ///
    /// Empty for `Pending`: orders are born pending and never return to it.
    pub const fn allowed_predecessors(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[],
            OrderStatus::Paid => &[OrderStatus::Pending],
            OrderStatus::Cancelled => &[OrderStatus::Pending],
            OrderStatus::OutForDelivery => &[OrderStatus::Pending, OrderStatus::Paid],
            OrderStatus::Delivered => &[OrderStatus::OutForDelivery],
        }
    }

    /// Whether an order currently in `self` may move to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        next.allowed_predecessors().contains(self)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Pharmacy
// =============================================================================

/// A pharmacy that medicines belong to and orders are placed against.
///
/// Read-only from the order core's perspective; directory management lives
/// outside this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Pharmacy {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Street address.
    pub address: String,

    /// Latitude of the storefront.
    pub lat: f64,

    /// Longitude of the storefront.
    pub lng: f64,

    /// Whether the pharmacy has been approved to take orders.
    pub is_approved: bool,

    /// Contact phone number.
    pub phone: String,

    /// When the pharmacy was registered.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Medicine
// =============================================================================

/// A medicine stocked by exactly one pharmacy.
///
/// `stock_qty` is the shared mutable state of the whole system: it is only
/// ever decremented through the atomic reservation in the database layer and
/// never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Medicine {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning pharmacy.
    pub pharmacy_id: String,

    /// Display name shown to customers and frozen onto order items.
    pub name: String,

    /// Catalog category (e.g. "Everyday", "Vitamins").
    pub category: String,

    /// Dosage strength (e.g. "500mg").
    pub strength: String,

    /// Sales unit (strip, bottle, pack, ...).
    pub unit: String,

    /// Base unit price in paise.
    pub price_paise: i64,

    /// Units currently available for reservation. Never negative.
    pub stock_qty: i64,

    /// Whether the medicine is currently listed.
    pub is_available: bool,

    /// When the medicine was added.
    pub created_at: DateTime<Utc>,

    /// When the row was last changed (reservation included).
    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    /// Returns the base unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A persisted order header.
///
/// Created exactly once by the order transaction; afterwards only `status`
/// (and `updated_at`) ever change, through guarded transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    /// Human-readable business identifier, unique across all orders ever.
    pub order_number: String,
    /// Ordering user, when known. Guest checkout leaves this empty.
    pub user_id: Option<String>,
    pub pharmacy_id: String,
    pub status: OrderStatus,
    /// Sum of charged line totals.
    pub subtotal_paise: i64,
    /// Total saved through quantity discounts across all lines.
    pub quantity_discount_paise: i64,
    /// Customer-to-pharmacy distance. None when the customer supplied no
    /// coordinates; never silently defaulted to zero.
    pub distance_km: Option<f64>,
    pub distance_surcharge_paise: i64,
    pub express_charge_paise: i64,
    /// subtotal + distance surcharge + express charge.
    pub total_paise: i64,
    pub is_express: bool,
    pub delivery_address: String,
    pub customer_phone: String,
    pub customer_lat: Option<f64>,
    pub customer_lng: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }

    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_paise(self.subtotal_paise)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses the snapshot pattern to freeze medicine data at time of purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub medicine_id: String,
    /// Medicine name at time of purchase (frozen).
    pub name_snapshot: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Catalog unit price at time of purchase, before discount (frozen).
    pub base_unit_price_paise: i64,
    /// Unit price as charged, after the quantity discount (frozen).
    pub unit_price_paise: i64,
    /// Applied discount tier in percent.
    pub discount_percent: u32,
    /// `unit_price_paise × quantity`.
    pub line_total_paise: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the charged unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paise(self.line_total_paise)
    }
}

// =============================================================================
// Order Request
// =============================================================================

/// An incoming order-creation request, before validation.
///
/// One request targets exactly one pharmacy. Coordinates are optional but
/// must come as a pair; `validation::validate_new_order` enforces the shape
/// before any database work starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub pharmacy_id: String,
    pub items: Vec<NewOrderItem>,
    #[serde(default)]
    pub is_express: bool,
    pub delivery_address: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_lat: Option<f64>,
    #[serde(default)]
    pub customer_lng: Option<f64>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// One requested line: which medicine, and how many units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub medicine_id: String,
    pub quantity: i64,
}

impl NewOrder {
    /// The customer location, when both coordinates were supplied.
    pub fn customer_location(&self) -> Option<(f64, f64)> {
        self.customer_lat.zip(self.customer_lng)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_allowed_transitions() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(Paid));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Pending.can_transition_to(OutForDelivery));
        assert!(Paid.can_transition_to(OutForDelivery));
        assert!(OutForDelivery.can_transition_to(Delivered));
    }

    #[test]
    fn test_disallowed_transitions() {
        use OrderStatus::*;

        // Nothing returns to pending
        for status in [Paid, Cancelled, OutForDelivery, Delivered] {
            assert!(!status.can_transition_to(Pending));
        }
        // Terminal states go nowhere
        for next in [Paid, Cancelled, OutForDelivery, Delivered] {
            assert!(!Delivered.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
        // No skipping straight to delivered
        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Paid.can_transition_to(Delivered));
        // Paid cannot be cancelled in this flow
        assert!(!Paid.can_transition_to(Cancelled));
    }

    #[test]
    fn test_status_string_form() {
        assert_eq!(OrderStatus::Pending.as_str(), "pending");
        assert_eq!(OrderStatus::OutForDelivery.as_str(), "out_for_delivery");
        assert_eq!(OrderStatus::OutForDelivery.to_string(), "out_for_delivery");
    }

    #[test]
    fn test_status_serde_round_trip() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"out_for_delivery\"");
        let parsed: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, OrderStatus::OutForDelivery);
    }

    #[test]
    fn test_customer_location_requires_both_coordinates() {
        let mut req = NewOrder {
            pharmacy_id: "p1".to_string(),
            items: vec![],
            is_express: false,
            delivery_address: "addr".to_string(),
            customer_phone: "123".to_string(),
            customer_lat: Some(24.5),
            customer_lng: None,
            user_id: None,
        };
        assert_eq!(req.customer_location(), None);

        req.customer_lng = Some(80.8);
        assert_eq!(req.customer_location(), Some((24.5, 80.8)));
    }
}
