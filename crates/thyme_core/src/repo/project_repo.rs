//! SQLite mirror of the project list.
//!
//! # Responsibility
//! - Load the persisted project list in insertion order.
//! - Mirror published `ProjectCommand`s into the `projects` table.
//!
//! # Invariants
//! - Rows are returned ordered by `position`, which only grows.
//! - Read paths reject invalid persisted values instead of masking them.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::dispatch::{CommandSink, ProjectCommand, SinkError};
use crate::model::project::{Project, ProjectId};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PROJECT_COLUMNS: [&str; 5] = [
    "project_uuid",
    "name",
    "parent_uuid",
    "is_archived",
    "position",
];

/// Result type used by project repository operations.
pub type ProjectRepoResult<T> = Result<T, ProjectRepoError>;

/// Errors from project repository operations.
#[derive(Debug)]
pub enum ProjectRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Command targets a row that does not exist.
    NotFound(ProjectId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required column is missing from the `projects` table.
    MissingRequiredColumn(&'static str),
    /// Persisted data cannot be converted to a valid project.
    InvalidData(String),
}

impl Display for ProjectRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "persisted project not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "project repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredColumn(column) => {
                write!(f, "project repository requires column `{column}` in `projects`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted project data: {message}"),
        }
    }
}

impl Error for ProjectRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for ProjectRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ProjectRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for the project list.
pub trait ProjectRepository {
    /// Loads every project in insertion order.
    fn load_projects(&self) -> ProjectRepoResult<Vec<Project>>;
    /// Mirrors one applied command.
    fn apply_command(&self, command: &ProjectCommand) -> ProjectRepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> ProjectRepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn load_projects(&self) -> ProjectRepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT project_uuid, name, parent_uuid, is_archived
             FROM projects
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn apply_command(&self, command: &ProjectCommand) -> ProjectRepoResult<()> {
        let changed = match command {
            ProjectCommand::Created(project) => self.conn.execute(
                "INSERT INTO projects (project_uuid, name, parent_uuid, is_archived, position)
                 VALUES (
                    ?1, ?2, ?3, ?4,
                    (SELECT COALESCE(MAX(position), -1) + 1 FROM projects)
                 );",
                params![
                    project.id.to_string(),
                    project.name.as_str(),
                    project.parent.map(|value| value.to_string()),
                    bool_to_int(project.archived),
                ],
            )?,
            ProjectCommand::Updated(project) | ProjectCommand::Archived(project) => {
                self.conn.execute(
                    "UPDATE projects
                     SET name = ?2,
                         parent_uuid = ?3,
                         is_archived = ?4,
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE project_uuid = ?1;",
                    params![
                        project.id.to_string(),
                        project.name.as_str(),
                        project.parent.map(|value| value.to_string()),
                        bool_to_int(project.archived),
                    ],
                )?
            }
            ProjectCommand::Removed { id } => self.conn.execute(
                "DELETE FROM projects WHERE project_uuid = ?1;",
                [id.to_string()],
            )?,
        };

        if changed == 0 {
            return Err(ProjectRepoError::NotFound(command.project_id()));
        }
        debug!(
            "event=project_mirror module=repo status=ok command={} project_id={}",
            command.kind(),
            command.project_id()
        );
        Ok(())
    }
}

impl CommandSink for SqliteProjectRepository<'_> {
    fn publish(&mut self, command: &ProjectCommand) -> Result<(), SinkError> {
        self.apply_command(command)
            .map_err(|err| SinkError::with_source("failed to mirror project command", err))
    }
}

fn parse_project_row(row: &Row<'_>) -> ProjectRepoResult<Project> {
    let id_text: String = row.get("project_uuid")?;
    let id = parse_uuid(&id_text, "projects.project_uuid")?;
    let parent = row
        .get::<_, Option<String>>("parent_uuid")?
        .map(|value| parse_uuid(&value, "projects.parent_uuid"))
        .transpose()?;
    let archived = match row.get::<_, i64>("is_archived")? {
        0 => false,
        1 => true,
        other => {
            return Err(ProjectRepoError::InvalidData(format!(
                "invalid is_archived value `{other}` in projects.is_archived"
            )));
        }
    };

    Ok(Project {
        id,
        name: row.get("name")?,
        parent,
        archived,
    })
}

fn parse_uuid(value: &str, column: &'static str) -> ProjectRepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| ProjectRepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

fn ensure_connection_ready(conn: &Connection) -> ProjectRepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(ProjectRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("PRAGMA table_info(projects);")?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(1)?);
    }
    for column in PROJECT_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(ProjectRepoError::MissingRequiredColumn(column));
        }
    }
    Ok(())
}
