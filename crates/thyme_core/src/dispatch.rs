//! Dispatch and alert boundary.
//!
//! # Responsibility
//! - Define serializable mutation intents accepted by the store.
//! - Define commands published after a mutation succeeds.
//! - Define sinks for commands and user-facing alerts.
//!
//! # Invariants
//! - One command is published per successful state change.
//! - Sink failures never roll back an applied mutation.

use crate::model::project::{Project, ProjectId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mutation requested by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectIntent {
    Create {
        name: String,
        parent: Option<ProjectId>,
    },
    Update(Project),
    Archive {
        id: ProjectId,
    },
    Remove {
        id: ProjectId,
    },
}

/// Result of one applied mutation, ready for state propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectCommand {
    Created(Project),
    Updated(Project),
    Archived(Project),
    Removed { id: ProjectId },
}

impl ProjectCommand {
    /// Returns the id of the project this command touches.
    pub fn project_id(&self) -> ProjectId {
        match self {
            Self::Created(project) | Self::Updated(project) | Self::Archived(project) => {
                project.id
            }
            Self::Removed { id } => *id,
        }
    }

    /// Stable short name used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
            Self::Archived(_) => "archived",
            Self::Removed { .. } => "removed",
        }
    }
}

/// Error reported by a command sink.
#[derive(Debug)]
pub struct SinkError {
    message: String,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn Error + 'static))
    }
}

/// Receiver of applied mutation commands.
pub trait CommandSink {
    /// Publishes one command. Delivery is fire-and-forget for the caller.
    fn publish(&mut self, command: &ProjectCommand) -> Result<(), SinkError>;
}

/// Receiver of user-facing messages.
pub trait AlertSink {
    fn alert(&mut self, message: &str);
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CommandSink for NullSink {
    fn publish(&mut self, _command: &ProjectCommand) -> Result<(), SinkError> {
        Ok(())
    }
}

impl AlertSink for NullSink {
    fn alert(&mut self, _message: &str) {}
}

/// Sink that keeps everything it receives in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub commands: Vec<ProjectCommand>,
    pub alerts: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommandSink for RecordingSink {
    fn publish(&mut self, command: &ProjectCommand) -> Result<(), SinkError> {
        self.commands.push(command.clone());
        Ok(())
    }
}

impl AlertSink for RecordingSink {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

impl<S: CommandSink + ?Sized> CommandSink for &mut S {
    fn publish(&mut self, command: &ProjectCommand) -> Result<(), SinkError> {
        (**self).publish(command)
    }
}

impl<S: AlertSink + ?Sized> AlertSink for &mut S {
    fn alert(&mut self, message: &str) {
        (**self).alert(message);
    }
}

#[cfg(test)]
mod tests {
    use super::{AlertSink, CommandSink, NullSink, ProjectCommand, ProjectIntent, RecordingSink};
    use crate::model::project::Project;

    #[test]
    fn intent_uses_snake_case_type_tag() {
        let intent = ProjectIntent::Create {
            name: "Research".to_string(),
            parent: None,
        };
        let value = serde_json::to_value(&intent).unwrap();
        assert_eq!(value["type"], "create");
        assert_eq!(value["name"], "Research");
        assert!(value["parent"].is_null());
    }

    #[test]
    fn removed_command_carries_only_id() {
        let project = Project::new("Gone", None);
        let command = ProjectCommand::Removed { id: project.id };
        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["type"], "removed");
        assert_eq!(value["id"], project.id.to_string());
        assert_eq!(command.project_id(), project.id);
    }

    #[test]
    fn sinks_forward_through_mutable_references() {
        let project = Project::new("Sink", None);
        let command = ProjectCommand::Created(project);

        fn deliver(mut sink: impl CommandSink + AlertSink, command: &ProjectCommand) {
            sink.publish(command).unwrap();
            sink.alert("heads up");
        }

        let mut recording = RecordingSink::new();
        deliver(&mut recording, &command);
        assert_eq!(recording.commands, vec![command.clone()]);
        assert_eq!(recording.alerts, vec!["heads up"]);

        let mut null = NullSink;
        assert!(null.publish(&command).is_ok());
        null.alert("ignored");
    }
}
