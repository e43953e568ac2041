//! # Pharmacy Repository
//!
//! Read access to pharmacies. The order core never mutates a pharmacy;
//! registration and approval are handled elsewhere.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbResult;
use medirush_core::Pharmacy;

const PHARMACY_COLUMNS: &str =
    "id, name, address, lat, lng, is_approved, phone, created_at";

/// Repository for pharmacy lookups.
#[derive(Debug, Clone)]
pub struct PharmacyRepository {
    pool: SqlitePool,
}

impl PharmacyRepository {
    /// Creates a new PharmacyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PharmacyRepository { pool }
    }

    /// Gets a pharmacy by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Pharmacy>> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id(&mut conn, id).await
    }
}

/// Fetches a pharmacy on an existing connection.
///
/// Used by the order transaction so that the lookup shares the transaction's
/// snapshot with the reservation that follows.
pub(crate) async fn fetch_by_id(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<Pharmacy>> {
    let pharmacy = sqlx::query_as::<_, Pharmacy>(&format!(
        "SELECT {PHARMACY_COLUMNS} FROM pharmacies WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(pharmacy)
}
