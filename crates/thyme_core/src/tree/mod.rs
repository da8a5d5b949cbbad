//! Read-only hierarchy logic over project snapshots.
//!
//! # Responsibility
//! - Provide pure structural queries used for validation.
//! - Provide the flattened view model consumed by renderers.

pub mod present;
pub mod query;
