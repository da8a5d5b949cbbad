//! Project hierarchy core for Thyme.
//! This crate is the single source of truth for project tree invariants.

pub mod config;
pub mod db;
pub mod dispatch;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod tree;

pub use config::CoreConfig;
pub use dispatch::{
    AlertSink, CommandSink, NullSink, ProjectCommand, ProjectIntent, RecordingSink, SinkError,
};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::project::{Project, ProjectId, ProjectSnapshot};
pub use repo::project_repo::{
    ProjectRepoError, ProjectRepoResult, ProjectRepository, SqliteProjectRepository,
};
pub use service::mutation_coordinator::{
    ConfirmationState, DestructiveAction, MutationCoordinator, RemoveRequest, ReparentOutcome,
    HAS_CHILDREN_ALERT,
};
pub use store::project_store::{ProjectStore, StoreError, StoreResult};
pub use tree::present::{present, present_active, Hierarchy, HierarchyRow};
pub use tree::query::{
    ancestors, check_integrity, children_of, find, has_children, is_descendant,
    parent_candidates, IntegrityViolation,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
