//! # Order Repository
//!
//! The transactional order flow: creation, read-back, status transitions.
//!
//! ## Order Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       create() — one transaction                        │
//! │                                                                         │
//! │  validate request (pure, no side effects)                              │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  resolve pharmacy ──► resolve + price every line ──► delivery pricing  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reserve stock per line (conditional decrement)                        │
//! │       │         └── any failure: transaction drops, ROLLBACK,          │
//! │       │             earlier reservations undone, no order rows         │
//! │       ▼                                                                 │
//! │  claim unique order number ──► insert header ──► insert items          │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                         │
//! │  stock decrements + header + items become visible together             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything between BEGIN and COMMIT either lands as a whole or leaves no
//! trace, including the case where persistence itself fails after all
//! reservations succeeded.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult, OrderResult};
use crate::repository::medicine::{self, ReserveOutcome};
use crate::repository::pharmacy;
use medirush_core::{
    pricing, validation, CoreError, DeliveryPricing, Medicine, Money, NewOrder, Order, OrderItem,
    OrderStatus, PricedLine,
};

const ORDER_COLUMNS: &str = "id, order_number, user_id, pharmacy_id, status, \
     subtotal_paise, quantity_discount_paise, distance_km, distance_surcharge_paise, \
     express_charge_paise, total_paise, is_express, delivery_address, customer_phone, \
     customer_lat, customer_lng, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str = "id, order_id, medicine_id, name_snapshot, quantity, \
     base_unit_price_paise, unit_price_paise, discount_percent, line_total_paise, created_at";

/// How many times to regenerate on an order-number collision before giving
/// up. With 8 hex characters of entropy a single retry is already rare.
const ORDER_NUMBER_ATTEMPTS: u32 = 5;

/// A freshly created order with its persisted line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// An order read back with its line items and the owning pharmacy's
/// display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub pharmacy_name: String,
    pub pharmacy_lat: f64,
    pub pharmacy_lng: f64,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an order as one atomic unit of work.
    ///
    /// Validation failures return before any database work. Once the
    /// transaction starts, every reservation and insert commits together;
    /// any failure on any path rolls the whole thing back.
    pub async fn create(
        &self,
        req: &NewOrder,
        delivery: &DeliveryPricing,
    ) -> OrderResult<CreatedOrder> {
        validation::validate_new_order(req).map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let pharmacy = pharmacy::fetch_by_id(&mut tx, &req.pharmacy_id)
            .await?
            .ok_or_else(|| CoreError::PharmacyNotFound(req.pharmacy_id.clone()))?;

        // Price every line against the catalog. The medicine rows read here
        // are the same rows the reservations below will decrement, inside
        // the same transaction.
        let mut subtotal = Money::zero();
        let mut quantity_discount = Money::zero();
        let mut lines: Vec<(Medicine, i64, PricedLine)> = Vec::with_capacity(req.items.len());
        for item in &req.items {
            let medicine = medicine::fetch_for_pharmacy(&mut tx, &item.medicine_id, &req.pharmacy_id)
                .await?
                .ok_or_else(|| CoreError::MedicineNotFound {
                    medicine_id: item.medicine_id.clone(),
                    pharmacy_id: req.pharmacy_id.clone(),
                })?;

            let priced = pricing::price_line(medicine.price(), item.quantity);
            subtotal += priced.line_total;
            quantity_discount += priced.discount_amount;
            lines.push((medicine, item.quantity, priced));
        }

        // Delivery pricing. Without customer coordinates the distance stays
        // None and no surcharge applies.
        let (distance_km, distance_surcharge) = match req.customer_location() {
            Some((lat, lng)) => {
                let km = medirush_core::geo::haversine_km(lat, lng, pharmacy.lat, pharmacy.lng);
                (Some(km), delivery.surcharge_for(km))
            }
            None => (None, Money::zero()),
        };
        let express_charge = delivery.express_charge_for(req.is_express);
        let total = subtotal + distance_surcharge + express_charge;

        // Reserve stock for every line. Returning early drops the
        // transaction, which rolls back reservations already made for
        // earlier lines in this same request.
        for (medicine, quantity, _) in &lines {
            match medicine::reserve(&mut tx, &req.pharmacy_id, &medicine.id, *quantity).await? {
                ReserveOutcome::Reserved => {}
                ReserveOutcome::InsufficientStock { available } => {
                    debug!(medicine_id = %medicine.id, available, requested = quantity, "Reservation failed");
                    return Err(CoreError::InsufficientStock {
                        medicine_id: medicine.id.clone(),
                        available,
                        requested: *quantity,
                    }
                    .into());
                }
                ReserveOutcome::NotFound => {
                    return Err(CoreError::MedicineNotFound {
                        medicine_id: medicine.id.clone(),
                        pharmacy_id: req.pharmacy_id.clone(),
                    }
                    .into());
                }
            }
        }

        let now = Utc::now();
        let order_number = claim_order_number(&mut tx).await?;

        let order = Order {
            id: Uuid::new_v4().to_string(),
            order_number,
            user_id: req.user_id.clone(),
            pharmacy_id: req.pharmacy_id.clone(),
            status: OrderStatus::Pending,
            subtotal_paise: subtotal.paise(),
            quantity_discount_paise: quantity_discount.paise(),
            distance_km,
            distance_surcharge_paise: distance_surcharge.paise(),
            express_charge_paise: express_charge.paise(),
            total_paise: total.paise(),
            is_express: req.is_express,
            delivery_address: req.delivery_address.trim().to_string(),
            customer_phone: req.customer_phone.trim().to_string(),
            customer_lat: req.customer_lat,
            customer_lng: req.customer_lng,
            created_at: now,
            updated_at: now,
        };

        insert_order(&mut tx, &order).await?;

        let mut items = Vec::with_capacity(lines.len());
        for (medicine, quantity, priced) in lines {
            let item = OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order.id.clone(),
                medicine_id: medicine.id,
                name_snapshot: medicine.name,
                quantity,
                base_unit_price_paise: medicine.price_paise,
                unit_price_paise: priced.unit_price.paise(),
                discount_percent: priced.discount_percent,
                line_total_paise: priced.line_total.paise(),
                created_at: now,
            };
            insert_order_item(&mut tx, &item).await?;
            items.push(item);
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total = %order.total(),
            items = items.len(),
            "Order created"
        );

        Ok(CreatedOrder { order, items })
    }

    /// Gets an order header by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Gets an order with its line items and the owning pharmacy's display
    /// name and coordinates. Pure read-back, no business logic.
    pub async fn get_with_items(&self, id: &str) -> DbResult<Option<OrderDetails>> {
        let Some(order) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = ? ORDER BY created_at, id"
        );
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        let (pharmacy_name, pharmacy_lat, pharmacy_lng) =
            sqlx::query_as::<_, (String, f64, f64)>(
                "SELECT name, lat, lng FROM pharmacies WHERE id = ?",
            )
            .bind(&order.pharmacy_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Some(OrderDetails {
            order,
            items,
            pharmacy_name,
            pharmacy_lat,
            pharmacy_lng,
        }))
    }

    /// Moves an order to `next`, enforcing the lifecycle.
    ///
    /// The guard is part of the UPDATE itself (`status IN (...allowed...)`),
    /// so two racing transitions cannot both succeed: one matches, the other
    /// sees zero rows and reports the conflict it lost to.
    pub async fn transition(&self, order_id: &str, next: OrderStatus) -> OrderResult<Order> {
        let allowed = next.allowed_predecessors();

        if !allowed.is_empty() {
            let placeholders = vec!["?"; allowed.len()].join(", ");
            let sql = format!(
                "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status IN ({placeholders})"
            );

            let mut query = sqlx::query(&sql).bind(next).bind(Utc::now()).bind(order_id);
            for status in allowed {
                query = query.bind(*status);
            }

            let result = query.execute(&self.pool).await.map_err(DbError::from)?;

            if result.rows_affected() > 0 {
                let order = self
                    .get_by_id(order_id)
                    .await?
                    .ok_or_else(|| DbError::not_found("Order", order_id))?;
                info!(order_id = %order_id, status = %next, "Order status updated");
                return Ok(order);
            }
        }

        // Nothing matched: either the order doesn't exist, or it is not in
        // a state this transition may leave from.
        match self.get_by_id(order_id).await? {
            None => Err(CoreError::OrderNotFound(order_id.to_string()).into()),
            Some(order) => Err(CoreError::InvalidStatusTransition {
                order_id: order_id.to_string(),
                from: order.status,
                to: next,
            }
            .into()),
        }
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
    debug!(id = %order.id, order_number = %order.order_number, "Inserting order");

    sqlx::query(
        r#"
        INSERT INTO orders (
            id, order_number, user_id, pharmacy_id, status,
            subtotal_paise, quantity_discount_paise, distance_km,
            distance_surcharge_paise, express_charge_paise, total_paise,
            is_express, delivery_address, customer_phone,
            customer_lat, customer_lng, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&order.id)
    .bind(&order.order_number)
    .bind(&order.user_id)
    .bind(&order.pharmacy_id)
    .bind(order.status)
    .bind(order.subtotal_paise)
    .bind(order.quantity_discount_paise)
    .bind(order.distance_km)
    .bind(order.distance_surcharge_paise)
    .bind(order.express_charge_paise)
    .bind(order.total_paise)
    .bind(order.is_express)
    .bind(&order.delivery_address)
    .bind(&order.customer_phone)
    .bind(order.customer_lat)
    .bind(order.customer_lng)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

async fn insert_order_item(conn: &mut SqliteConnection, item: &OrderItem) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO order_items (
            id, order_id, medicine_id, name_snapshot, quantity,
            base_unit_price_paise, unit_price_paise, discount_percent,
            line_total_paise, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&item.id)
    .bind(&item.order_id)
    .bind(&item.medicine_id)
    .bind(&item.name_snapshot)
    .bind(item.quantity)
    .bind(item.base_unit_price_paise)
    .bind(item.unit_price_paise)
    .bind(item.discount_percent)
    .bind(item.line_total_paise)
    .bind(item.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Generates an order number and verifies it is unused, inside the caller's
/// transaction. The UNIQUE constraint on `orders.order_number` remains the
/// backstop for anything this check races with.
async fn claim_order_number(conn: &mut SqliteConnection) -> DbResult<String> {
    let mut candidate = generate_order_number();

    for _ in 0..ORDER_NUMBER_ATTEMPTS {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE order_number = ?)",
        )
        .bind(&candidate)
        .fetch_one(&mut *conn)
        .await?;

        if !taken {
            return Ok(candidate);
        }

        candidate = generate_order_number();
    }

    Err(DbError::duplicate("order_number", candidate))
}

/// Generates an order number in format: ORD-XXXXXXXX
///
/// ## Format
/// - ORD: fixed prefix shown to customers
/// - XXXXXXXX: first 8 hex characters of a v4 UUID, uppercased
///
/// ## Example
/// `ORD-9F86D081`
fn generate_order_number() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", id[..8].to_uppercase())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        assert_eq!(number.len(), 12);
        assert!(number.starts_with("ORD-"));
        assert!(number[4..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_order_numbers_vary() {
        let a = generate_order_number();
        let b = generate_order_number();
        assert_ne!(a, b);
    }
}
