//! Repository layer for the SQLite project mirror.
//!
//! # Responsibility
//! - Keep SQL details out of the store and services.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod project_repo;
