//! Authoritative in-memory state.
//!
//! # Responsibility
//! - Keep the canonical project list behind one writer.
//! - Publish every change as a fresh immutable snapshot.

pub mod project_store;
