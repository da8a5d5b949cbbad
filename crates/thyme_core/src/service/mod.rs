//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and store mutations into user-level actions.
//! - Keep UI layers decoupled from store and query details.

pub mod mutation_coordinator;
