//! # medirush-db: Database Layer for MediRush
//!
//! This crate provides database access for the MediRush order core.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and order-flow error types
//! - [`repository`] - Repository implementations (pharmacy, medicine, order)
//!
//! ## The One Hard Invariant
//!
//! Order creation is a single transaction: stock reservations (atomic
//! conditional decrements) and the order header/line-item inserts commit
//! together or roll back together. See [`repository::order`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medirush_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("medirush.db")).await?;
//! let created = db.orders().create(&request, &delivery_pricing).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, OrderError};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::medicine::{MedicineRepository, ReserveOutcome};
pub use repository::order::{CreatedOrder, OrderDetails, OrderRepository};
pub use repository::pharmacy::PharmacyRepository;
