//! User-initiated project edits.
//!
//! # Responsibility
//! - Validate edits against the current snapshot before touching the store.
//! - Drive the confirmation flow for destructive actions.
//! - Publish applied commands and user-facing alerts.
//!
//! # Invariants
//! - Reparenting into the project's own subtree is dropped without alert.
//! - Removal of a project with children never reaches confirmation.
//! - At most one pending confirmation exists per project.

use crate::dispatch::{AlertSink, CommandSink, ProjectCommand, ProjectIntent};
use crate::model::project::{Project, ProjectId, ProjectSnapshot};
use crate::store::project_store::{ProjectStore, StoreError, StoreResult};
use crate::tree::present::{present, present_active, Hierarchy};
use crate::tree::query::{has_children, is_descendant};
use log::{debug, info, warn};
use std::collections::HashMap;

/// Alert shown when removal is blocked by existing children.
pub const HAS_CHILDREN_ALERT: &str = "This project has children, parent cannot be removed.";

/// Destructive action waiting for user confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestructiveAction {
    Remove,
    Archive,
}

impl DestructiveAction {
    /// Question shown in the confirmation dialog.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Remove => "Are you sure you want to remove this project?",
            Self::Archive => "Do you want to archive this project?",
        }
    }

    /// Label of the confirming button.
    pub fn confirm_label(self) -> &'static str {
        match self {
            Self::Remove => "Remove project",
            Self::Archive => "Archive project",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::Archive => "archive",
        }
    }
}

/// Confirmation state of one project item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationState {
    Idle,
    PendingConfirmation(DestructiveAction),
}

/// Result of a reparent request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReparentOutcome {
    /// Parent changed and the command was published.
    Applied(ProjectCommand),
    /// Target parent lies in the project's own subtree; nothing changed.
    RejectedCycle,
}

/// Result of a removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveRequest {
    /// Waiting for `confirm` or `cancel`.
    Pending,
    /// Project has children; the user was alerted.
    Blocked,
}

/// Coordinates edits between UI intents, the store, and the sinks.
pub struct MutationCoordinator<C: CommandSink, A: AlertSink> {
    store: ProjectStore,
    commands: C,
    alerts: A,
    pending: HashMap<ProjectId, DestructiveAction>,
}

impl<C: CommandSink, A: AlertSink> MutationCoordinator<C, A> {
    /// Creates a coordinator owning `store`.
    pub fn new(store: ProjectStore, commands: C, alerts: A) -> Self {
        Self {
            store,
            commands,
            alerts,
            pending: HashMap::new(),
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn snapshot(&self) -> ProjectSnapshot {
        self.store.snapshot()
    }

    pub fn command_sink(&self) -> &C {
        &self.commands
    }

    pub fn alert_sink(&self) -> &A {
        &self.alerts
    }

    /// Rows of the whole hierarchy, archived projects included.
    pub fn rows(&self) -> Hierarchy<'_> {
        present(self.store.projects(), None, 0)
    }

    /// Rows of the active hierarchy.
    pub fn active_rows(&self) -> Hierarchy<'_> {
        present_active(self.store.projects(), None, 0)
    }

    /// Creates a project under optional parent.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        parent: Option<ProjectId>,
    ) -> StoreResult<Project> {
        let revision = self.store.revision();
        let project = self
            .store
            .create(name, parent)
            .inspect_err(report_store_error)?;
        self.publish_if_changed(revision, &ProjectCommand::Created(project.clone()));
        Ok(project)
    }

    /// Renames one project. No confirmation needed.
    pub fn rename(
        &mut self,
        id: ProjectId,
        name: impl Into<String>,
    ) -> StoreResult<ProjectCommand> {
        let mut project = self.lookup(id)?;
        project.name = name.into();
        self.apply(ProjectIntent::Update(project))
    }

    /// Moves one project under `new_parent` (`None` = root).
    ///
    /// Moving a project under itself or one of its descendants is dropped
    /// silently and reported as `RejectedCycle`.
    pub fn reparent(
        &mut self,
        id: ProjectId,
        new_parent: Option<ProjectId>,
    ) -> StoreResult<ReparentOutcome> {
        let mut project = self.lookup(id)?;
        if is_descendant(id, new_parent, self.store.projects()) {
            debug!(
                "event=project_reparent module=coordinator status=rejected reason=cycle project_id={}",
                id
            );
            return Ok(ReparentOutcome::RejectedCycle);
        }

        project.parent = new_parent;
        self.apply(ProjectIntent::Update(project))
            .map(ReparentOutcome::Applied)
    }

    /// Starts removal of one project.
    ///
    /// Alerts and returns `Blocked` when the project has children.
    pub fn request_remove(&mut self, id: ProjectId) -> StoreResult<RemoveRequest> {
        self.lookup(id)?;
        if has_children(id, self.store.projects()) {
            self.alerts.alert(HAS_CHILDREN_ALERT);
            info!(
                "event=project_remove module=coordinator status=blocked reason=has_children project_id={}",
                id
            );
            return Ok(RemoveRequest::Blocked);
        }

        self.set_pending(id, DestructiveAction::Remove);
        Ok(RemoveRequest::Pending)
    }

    /// Starts archiving of one project.
    pub fn request_archive(&mut self, id: ProjectId) -> StoreResult<()> {
        self.lookup(id)?;
        self.set_pending(id, DestructiveAction::Archive);
        Ok(())
    }

    /// Returns the confirmation state of one project.
    pub fn confirmation(&self, id: ProjectId) -> ConfirmationState {
        match self.pending.get(&id) {
            Some(action) => ConfirmationState::PendingConfirmation(*action),
            None => ConfirmationState::Idle,
        }
    }

    /// Runs the pending action of one project and returns to idle.
    ///
    /// Returns `Ok(None)` when nothing is pending.
    pub fn confirm(&mut self, id: ProjectId) -> StoreResult<Option<ProjectCommand>> {
        let Some(action) = self.pending.remove(&id) else {
            return Ok(None);
        };
        info!(
            "event=confirmation module=coordinator status=confirmed action={} project_id={}",
            action.as_str(),
            id
        );

        let intent = match action {
            DestructiveAction::Remove => ProjectIntent::Remove { id },
            DestructiveAction::Archive => ProjectIntent::Archive { id },
        };
        match self.apply(intent) {
            Ok(command) => Ok(Some(command)),
            Err(err @ StoreError::HasChildren(_)) => {
                self.alerts.alert(HAS_CHILDREN_ALERT);
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Drops the pending action of one project, if any.
    pub fn cancel(&mut self, id: ProjectId) {
        if let Some(action) = self.pending.remove(&id) {
            info!(
                "event=confirmation module=coordinator status=cancelled action={} project_id={}",
                action.as_str(),
                id
            );
        }
    }

    fn set_pending(&mut self, id: ProjectId, action: DestructiveAction) {
        if let Some(previous) = self.pending.insert(id, action) {
            debug!(
                "event=confirmation module=coordinator status=replaced previous={} action={} project_id={}",
                previous.as_str(),
                action.as_str(),
                id
            );
        }
    }

    fn lookup(&self, id: ProjectId) -> StoreResult<Project> {
        match self.store.get(id) {
            Some(project) => Ok(project.clone()),
            None => {
                let err = StoreError::NotFound(id);
                report_store_error(&err);
                Err(err)
            }
        }
    }

    fn apply(&mut self, intent: ProjectIntent) -> StoreResult<ProjectCommand> {
        let revision = self.store.revision();
        let command = self.store.apply(intent).inspect_err(report_store_error)?;
        self.publish_if_changed(revision, &command);
        Ok(command)
    }

    fn publish_if_changed(&mut self, revision: u64, command: &ProjectCommand) {
        if self.store.revision() == revision {
            return;
        }
        if let Err(err) = self.commands.publish(command) {
            warn!(
                "event=command_publish module=coordinator status=error command={} project_id={} error={}",
                command.kind(),
                command.project_id(),
                err
            );
        }
    }
}

fn report_store_error(err: &StoreError) {
    match err {
        StoreError::HasChildren(_) => info!(
            "event=store_mutation module=coordinator status=rejected error_code={} error={}",
            err.code(),
            err
        ),
        _ => warn!(
            "event=store_mutation module=coordinator status=error error_code={} error={}",
            err.code(),
            err
        ),
    }
}
