//! Domain model for the project hierarchy.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the hierarchy as a flat list with id references.
//!
//! # Invariants
//! - Every project is identified by a stable `ProjectId`.
//! - The parent graph is acyclic.

pub mod project;
