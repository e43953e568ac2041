//! # Medicine Repository
//!
//! Medicine lookup and atomic stock reservation.
//!
//! ## Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Reservation Strategy                           │
//! │                                                                         │
//! │  ❌ WRONG: read stock, compare in Rust, write new value                │
//! │     Two racing orders both read stock=1 and both "succeed".            │
//! │                                                                         │
//! │  ✅ CORRECT: single conditional decrement                              │
//! │     UPDATE medicines SET stock_qty = stock_qty - ?                     │
//! │     WHERE id = ? AND pharmacy_id = ? AND stock_qty >= ?                │
//! │                                                                         │
//! │  The check and the decrement are one indivisible statement. Of two     │
//! │  racing orders for the last unit, exactly one matches the WHERE        │
//! │  clause; the other sees zero rows affected.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use medirush_core::Medicine;

const MEDICINE_COLUMNS: &str = "id, pharmacy_id, name, category, strength, unit, \
     price_paise, stock_qty, is_available, created_at, updated_at";

/// Outcome of a reservation attempt.
///
/// `NotFound` covers both an unknown medicine id and a medicine owned by a
/// different pharmacy; the caller cannot tell the difference and should not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// Stock was decremented by the requested quantity.
    Reserved,
    /// Not enough stock; nothing was changed.
    InsufficientStock { available: i64 },
    /// No such medicine for this pharmacy; nothing was changed.
    NotFound,
}

/// Repository for medicine lookups and stock reservation.
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    /// Creates a new MedicineRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MedicineRepository { pool }
    }

    /// Gets a medicine by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Medicine>> {
        let sql = format!("SELECT {MEDICINE_COLUMNS} FROM medicines WHERE id = ?");
        let medicine = sqlx::query_as::<_, Medicine>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(medicine)
    }

    /// Current stock level for a medicine, if it exists.
    pub async fn stock_of(&self, id: &str) -> DbResult<Option<i64>> {
        let stock = sqlx::query_scalar::<_, i64>("SELECT stock_qty FROM medicines WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(stock)
    }

    /// Attempts to reserve `quantity` units of a medicine.
    ///
    /// A standalone reservation outside any order transaction; the conditional
    /// UPDATE is a single statement, so it is atomic on its own. The order
    /// flow instead calls [`reserve`] on its transaction connection so that
    /// a later failure rolls the reservation back.
    pub async fn reserve(
        &self,
        pharmacy_id: &str,
        medicine_id: &str,
        quantity: i64,
    ) -> DbResult<ReserveOutcome> {
        let mut conn = self.pool.acquire().await?;
        reserve(&mut conn, pharmacy_id, medicine_id, quantity).await
    }
}

/// Fetches a medicine scoped to its owning pharmacy, on an existing
/// connection.
pub(crate) async fn fetch_for_pharmacy(
    conn: &mut SqliteConnection,
    medicine_id: &str,
    pharmacy_id: &str,
) -> DbResult<Option<Medicine>> {
    let sql = format!("SELECT {MEDICINE_COLUMNS} FROM medicines WHERE id = ? AND pharmacy_id = ?");
    let medicine = sqlx::query_as::<_, Medicine>(&sql)
        .bind(medicine_id)
        .bind(pharmacy_id)
        .fetch_optional(conn)
        .await?;

    Ok(medicine)
}

/// Atomically reserves `quantity` units: decrements stock only if enough is
/// available, as one conditional UPDATE.
///
/// When zero rows match, a follow-up read on the same connection
/// distinguishes "not enough stock" from "no such medicine".
pub async fn reserve(
    conn: &mut SqliteConnection,
    pharmacy_id: &str,
    medicine_id: &str,
    quantity: i64,
) -> DbResult<ReserveOutcome> {
    debug!(medicine_id = %medicine_id, quantity = %quantity, "Reserving stock");

    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE medicines
        SET stock_qty = stock_qty - ?, updated_at = ?
        WHERE id = ? AND pharmacy_id = ? AND stock_qty >= ?
        "#,
    )
    .bind(quantity)
    .bind(now)
    .bind(medicine_id)
    .bind(pharmacy_id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() > 0 {
        return Ok(ReserveOutcome::Reserved);
    }

    let available = sqlx::query_scalar::<_, i64>(
        "SELECT stock_qty FROM medicines WHERE id = ? AND pharmacy_id = ?",
    )
    .bind(medicine_id)
    .bind(pharmacy_id)
    .fetch_optional(&mut *conn)
    .await?;

    match available {
        Some(available) => Ok(ReserveOutcome::InsufficientStock { available }),
        None => Ok(ReserveOutcome::NotFound),
    }
}
