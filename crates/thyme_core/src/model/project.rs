//! Project domain model.
//!
//! # Responsibility
//! - Define the canonical project record shared by store, queries and views.
//! - Provide the immutable snapshot type handed to read-only consumers.
//!
//! # Invariants
//! - `id` is stable and never reused for another project.
//! - `parent` references another project in the same list or is `None`.
//! - `archived` applies to this record only and never cascades.

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;
use uuid::Uuid;

/// Stable identifier for one project.
pub type ProjectId = Uuid;

/// Canonical project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable id, immutable once created.
    pub id: ProjectId,
    /// User-facing label. Not unique.
    pub name: String,
    /// Parent project id. `None` means root project.
    pub parent: Option<ProjectId>,
    /// Hidden from active views, kept in storage.
    #[serde(default)]
    pub archived: bool,
}

impl Project {
    /// Creates an active project with a generated id.
    pub fn new(name: impl Into<String>, parent: Option<ProjectId>) -> Self {
        Self::with_id(Uuid::new_v4(), name, parent)
    }

    /// Creates an active project with a caller-provided id.
    ///
    /// Used by load paths where identity already exists.
    pub fn with_id(id: ProjectId, name: impl Into<String>, parent: Option<ProjectId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            archived: false,
        }
    }

    /// Returns whether this project has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns whether this project shows up in active views.
    pub fn is_active(&self) -> bool {
        !self.archived
    }
}

/// Immutable view of the project list at one point in time.
///
/// Cloning is cheap; every clone shares the same backing list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSnapshot {
    projects: Arc<Vec<Project>>,
}

impl ProjectSnapshot {
    /// Wraps an owned list. Order is kept as given.
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects: Arc::new(projects),
        }
    }

    /// Returns projects in insertion order.
    pub fn projects(&self) -> &[Project] {
        self.projects.as_slice()
    }

    /// Returns whether both snapshots share the same backing list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.projects, &other.projects)
    }

    /// Copies the list out for building the next snapshot.
    pub fn to_vec(&self) -> Vec<Project> {
        self.projects.as_ref().clone()
    }
}

impl Deref for ProjectSnapshot {
    type Target = [Project];

    fn deref(&self) -> &Self::Target {
        self.projects.as_slice()
    }
}

impl From<Vec<Project>> for ProjectSnapshot {
    fn from(value: Vec<Project>) -> Self {
        Self::new(value)
    }
}
