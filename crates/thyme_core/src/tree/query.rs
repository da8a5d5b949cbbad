//! Structural queries over a flat project list.
//!
//! # Responsibility
//! - Answer ancestor/descendant and children questions for one snapshot.
//! - Detect malformed lists loaded from outside the store.
//!
//! # Invariants
//! - Functions are pure and never mutate the input.
//! - Upward walks terminate on malformed lists (revisit guard).

use crate::model::project::{Project, ProjectId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural defect found by [`check_integrity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// Same id appears more than once.
    DuplicateId(ProjectId),
    /// Parent id does not exist in the list.
    DanglingParent {
        project_id: ProjectId,
        parent_id: ProjectId,
    },
    /// Project is reachable from itself via parent links.
    Cycle(ProjectId),
}

impl Display for IntegrityViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate project id: {id}"),
            Self::DanglingParent {
                project_id,
                parent_id,
            } => write!(
                f,
                "project {project_id} references missing parent {parent_id}"
            ),
            Self::Cycle(id) => write!(f, "project {id} is its own ancestor"),
        }
    }
}

impl Error for IntegrityViolation {}

/// Returns whether making `target_parent` the parent of
/// `candidate_ancestor` would create a cycle.
///
/// True when `target_parent` is `candidate_ancestor` itself or one of its
/// transitive descendants. `None` is the root and never a descendant.
///
/// # Invariants
/// - Walks upward from `target_parent`; a revisited id counts as a cycle.
/// - A parent link to an unknown id ends the walk.
pub fn is_descendant(
    candidate_ancestor: ProjectId,
    target_parent: Option<ProjectId>,
    projects: &[Project],
) -> bool {
    let mut visited = HashSet::new();
    let mut cursor = target_parent;
    while let Some(current) = cursor {
        if current == candidate_ancestor {
            return true;
        }
        if !visited.insert(current) {
            return true;
        }
        cursor = find(current, projects).and_then(|project| project.parent);
    }
    false
}

/// Returns direct children of `parent` in list order.
///
/// `None` selects root projects.
pub fn children_of(parent: Option<ProjectId>, projects: &[Project]) -> Vec<&Project> {
    projects
        .iter()
        .filter(|project| project.parent == parent)
        .collect()
}

/// Looks up one project by id.
pub fn find(id: ProjectId, projects: &[Project]) -> Option<&Project> {
    projects.iter().find(|project| project.id == id)
}

/// Returns whether any project has `id` as its parent.
pub fn has_children(id: ProjectId, projects: &[Project]) -> bool {
    projects.iter().any(|project| project.parent == Some(id))
}

/// Returns ancestors of `id`, nearest parent first.
///
/// Stops at a root, a missing parent, or a revisited id.
pub fn ancestors(id: ProjectId, projects: &[Project]) -> Vec<&Project> {
    let mut result = Vec::new();
    let mut visited = HashSet::from([id]);
    let mut cursor = find(id, projects).and_then(|project| project.parent);
    while let Some(current) = cursor {
        if !visited.insert(current) {
            break;
        }
        let Some(parent) = find(current, projects) else {
            break;
        };
        result.push(parent);
        cursor = parent.parent;
    }
    result
}

/// Returns every project that may become the parent of `id`.
///
/// Excludes `id` and its descendants. Archived projects stay eligible.
pub fn parent_candidates(id: ProjectId, projects: &[Project]) -> Vec<&Project> {
    projects
        .iter()
        .filter(|project| !is_descendant(id, Some(project.id), projects))
        .collect()
}

/// Validates a list received from outside the store.
///
/// # Errors
/// - `DuplicateId` when two records share an id.
/// - `DanglingParent` when a parent id is unknown.
/// - `Cycle` when a project is its own ancestor.
pub fn check_integrity(projects: &[Project]) -> Result<(), IntegrityViolation> {
    let mut ids = HashSet::with_capacity(projects.len());
    for project in projects {
        if !ids.insert(project.id) {
            return Err(IntegrityViolation::DuplicateId(project.id));
        }
    }

    for project in projects {
        if let Some(parent_id) = project.parent {
            if !ids.contains(&parent_id) {
                return Err(IntegrityViolation::DanglingParent {
                    project_id: project.id,
                    parent_id,
                });
            }
        }
    }

    for project in projects {
        if is_descendant(project.id, project.parent, projects) {
            return Err(IntegrityViolation::Cycle(project.id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ancestors, is_descendant};
    use crate::model::project::Project;

    #[test]
    fn revisit_guard_stops_walk_on_corrupted_list() {
        let mut a = Project::new("A", None);
        let b = Project::new("B", Some(a.id));
        a.parent = Some(b.id);
        let unrelated = Project::new("C", None);
        let projects = vec![a.clone(), b.clone()];

        assert!(is_descendant(unrelated.id, Some(a.id), &projects));
        assert_eq!(ancestors(a.id, &projects).len(), 1);
    }

    #[test]
    fn missing_parent_ends_walk() {
        let orphan = Project::new("Orphan", Some(uuid::Uuid::new_v4()));
        let other = Project::new("Other", None);
        let projects = vec![orphan.clone(), other.clone()];

        assert!(!is_descendant(other.id, Some(orphan.id), &projects));
    }
}
