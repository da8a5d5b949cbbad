//! Indented hierarchy view model.
//!
//! # Responsibility
//! - Flatten the project tree into ordered `(project, level)` rows.
//! - Stay independent from any widget set.
//!
//! # Invariants
//! - Rows follow depth-first pre-order; siblings keep list order.
//! - Traversal holds no state beyond its own iterator; calling again on the
//!   same snapshot yields the same rows.
//! - No cycle detection: the input must be acyclic or iteration never ends.

use crate::model::project::{Project, ProjectId};
use crate::tree::query::children_of;
use std::vec::IntoIter;

/// One rendered row of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyRow<'a> {
    pub project: &'a Project,
    /// Indentation depth relative to the traversal root.
    pub level: usize,
}

/// Lazy depth-first traversal returned by [`present`] and [`present_active`].
#[derive(Debug, Clone)]
pub struct Hierarchy<'a> {
    projects: &'a [Project],
    stack: Vec<(usize, IntoIter<&'a Project>)>,
    skip_archived: bool,
}

impl<'a> Hierarchy<'a> {
    fn new(
        projects: &'a [Project],
        parent: Option<ProjectId>,
        level: usize,
        skip_archived: bool,
    ) -> Self {
        Self {
            projects,
            stack: vec![(level, children_of(parent, projects).into_iter())],
            skip_archived,
        }
    }
}

impl<'a> Iterator for Hierarchy<'a> {
    type Item = HierarchyRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (level, siblings) = self.stack.last_mut()?;
            let level = *level;
            let Some(project) = siblings.next() else {
                self.stack.pop();
                continue;
            };

            let children = children_of(Some(project.id), self.projects).into_iter();
            if self.skip_archived && project.archived {
                // Active children take the archived project's slot.
                self.stack.push((level, children));
                continue;
            }

            self.stack.push((level + 1, children));
            return Some(HierarchyRow { project, level });
        }
    }
}

/// Yields every project below `parent`, starting at `level`.
///
/// Each child is emitted before its own subtree, which starts at
/// `level + 1`. `None` starts from the root projects.
pub fn present(projects: &[Project], parent: Option<ProjectId>, level: usize) -> Hierarchy<'_> {
    Hierarchy::new(projects, parent, level, false)
}

/// Same as [`present`] but leaves archived projects out.
///
/// Children of an archived project are still emitted, one level up.
pub fn present_active(
    projects: &[Project],
    parent: Option<ProjectId>,
    level: usize,
) -> Hierarchy<'_> {
    Hierarchy::new(projects, parent, level, true)
}
