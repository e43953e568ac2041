//! # Repository Module
//!
//! Database repository implementations for MediRush.
//!
//! ## Repository Pattern
//! Each repository abstracts one table family behind a clean API, keeping
//! SQL in one place and letting callers work with the domain types from
//! medirush-core. Repositories are handed an explicit pool (no process-wide
//! connection), so tests can run each against an isolated database.
//!
//! ## Available Repositories
//!
//! - [`pharmacy::PharmacyRepository`] - Pharmacy lookup
//! - [`medicine::MedicineRepository`] - Medicine lookup and atomic stock reservation
//! - [`order::OrderRepository`] - The transactional order flow, read-back and
//!   status transitions

pub mod medicine;
pub mod order;
pub mod pharmacy;
