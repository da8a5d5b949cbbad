//! Canonical in-memory project list.
//!
//! # Responsibility
//! - Own the authoritative project list and apply mutation intents.
//! - Hand out immutable snapshots to every other component.
//!
//! # Invariants
//! - Parent references must exist on `create` and `update`.
//! - `remove` never orphans children.
//! - A failed operation leaves the list and revision untouched.
//! - Acyclicity is checked by callers, not here (see `MutationCoordinator`).

use crate::dispatch::{ProjectCommand, ProjectIntent};
use crate::model::project::{Project, ProjectId, ProjectSnapshot};
use crate::tree::query::{self, IntegrityViolation};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by project store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from project store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Referenced parent does not exist.
    InvalidParent(ProjectId),
    /// Mutation target does not exist.
    NotFound(ProjectId),
    /// Removal blocked because other projects use this one as parent.
    HasChildren(ProjectId),
    /// Loaded list violates a structural invariant.
    Integrity(IntegrityViolation),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParent(id) => write!(f, "parent project not found: {id}"),
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::HasChildren(id) => write!(f, "project has children: {id}"),
            Self::Integrity(err) => write!(f, "invalid project list: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Integrity(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IntegrityViolation> for StoreError {
    fn from(value: IntegrityViolation) -> Self {
        Self::Integrity(value)
    }
}

impl StoreError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParent(_) => "invalid_parent",
            Self::NotFound(_) => "not_found",
            Self::HasChildren(_) => "has_children",
            Self::Integrity(_) => "integrity",
        }
    }
}

/// Single writer of the project list.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    current: ProjectSnapshot,
    revision: u64,
}

impl ProjectStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from a list loaded elsewhere.
    ///
    /// # Errors
    /// - `Integrity` when ids repeat, a parent is missing, or a cycle exists.
    pub fn from_projects(projects: Vec<Project>) -> StoreResult<Self> {
        if let Err(err) = query::check_integrity(&projects) {
            warn!(
                "event=store_load module=store status=error error_code=integrity error={}",
                err
            );
            return Err(err.into());
        }
        info!(
            "event=store_load module=store status=ok count={}",
            projects.len()
        );
        Ok(Self {
            current: ProjectSnapshot::new(projects),
            revision: 0,
        })
    }

    /// Returns the current immutable snapshot.
    pub fn snapshot(&self) -> ProjectSnapshot {
        self.current.clone()
    }

    /// Returns the current list without cloning the snapshot handle.
    pub fn projects(&self) -> &[Project] {
        self.current.projects()
    }

    /// Looks up one project.
    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        query::find(id, self.projects())
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Counter bumped by every state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies one intent and returns the command describing the change.
    pub fn apply(&mut self, intent: ProjectIntent) -> StoreResult<ProjectCommand> {
        match intent {
            ProjectIntent::Create { name, parent } => {
                self.create(name, parent).map(ProjectCommand::Created)
            }
            ProjectIntent::Update(project) => self.update(project).map(ProjectCommand::Updated),
            ProjectIntent::Archive { id } => self.archive(id).map(ProjectCommand::Archived),
            ProjectIntent::Remove { id } => {
                self.remove(id)?;
                Ok(ProjectCommand::Removed { id })
            }
        }
    }

    /// Inserts a new active project under optional parent.
    ///
    /// # Errors
    /// - `InvalidParent` when `parent` is set and unknown.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        parent: Option<ProjectId>,
    ) -> StoreResult<Project> {
        self.ensure_parent_exists(parent)?;

        let project = Project::new(name, parent);
        let mut next = self.current.to_vec();
        next.push(project.clone());
        self.commit(next);

        info!(
            "event=project_create module=store status=ok project_id={} has_parent={}",
            project.id,
            parent.is_some()
        );
        Ok(project)
    }

    /// Replaces the stored record with the same id.
    ///
    /// # Errors
    /// - `NotFound` when no record has `project.id`.
    /// - `InvalidParent` when `project.parent` is set and unknown.
    pub fn update(&mut self, project: Project) -> StoreResult<Project> {
        let index = self.index_of(project.id)?;
        self.ensure_parent_exists(project.parent)?;

        let mut next = self.current.to_vec();
        next[index] = project.clone();
        self.commit(next);

        info!(
            "event=project_update module=store status=ok project_id={}",
            project.id
        );
        Ok(project)
    }

    /// Marks one project archived. Archiving twice is a no-op success.
    ///
    /// # Errors
    /// - `NotFound` when `id` is unknown.
    pub fn archive(&mut self, id: ProjectId) -> StoreResult<Project> {
        let index = self.index_of(id)?;
        if self.current[index].archived {
            info!(
                "event=project_archive module=store status=noop project_id={}",
                id
            );
            return Ok(self.current[index].clone());
        }

        let mut next = self.current.to_vec();
        next[index].archived = true;
        let archived = next[index].clone();
        self.commit(next);

        info!(
            "event=project_archive module=store status=ok project_id={}",
            id
        );
        Ok(archived)
    }

    /// Deletes one childless project.
    ///
    /// # Errors
    /// - `NotFound` when `id` is unknown.
    /// - `HasChildren` when another project has `id` as parent.
    pub fn remove(&mut self, id: ProjectId) -> StoreResult<Project> {
        let index = self.index_of(id)?;
        if query::has_children(id, self.projects()) {
            return Err(StoreError::HasChildren(id));
        }

        let mut next = self.current.to_vec();
        let removed = next.remove(index);
        self.commit(next);

        info!(
            "event=project_remove module=store status=ok project_id={}",
            id
        );
        Ok(removed)
    }

    fn index_of(&self, id: ProjectId) -> StoreResult<usize> {
        self.projects()
            .iter()
            .position(|project| project.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn ensure_parent_exists(&self, parent: Option<ProjectId>) -> StoreResult<()> {
        match parent {
            Some(parent_id) if self.get(parent_id).is_none() => {
                Err(StoreError::InvalidParent(parent_id))
            }
            _ => Ok(()),
        }
    }

    fn commit(&mut self, next: Vec<Project>) {
        self.current = ProjectSnapshot::new(next);
        self.revision += 1;
    }
}
