use rusqlite::Connection;
use thyme_core::db::migrations::latest_version;
use thyme_core::db::{open_db, open_db_in_memory, DbError};
use thyme_core::{
    MutationCoordinator, ProjectCommand, ProjectRepoError, ProjectRepository, ProjectStore,
    RecordingSink, SqliteProjectRepository,
};
use uuid::Uuid;

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'projects'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("thyme.db");

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert!(path.exists());
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteProjectRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        ProjectRepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

#[test]
fn coordinator_commands_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thyme.db");

    let (root_id, child_id, leaf_id) = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteProjectRepository::try_new(&conn).unwrap();
        let mut coordinator =
            MutationCoordinator::new(ProjectStore::new(), repo, RecordingSink::new());

        let root = coordinator.create("Root", None).unwrap();
        let child = coordinator.create("Child", Some(root.id)).unwrap();
        let leaf = coordinator.create("Leaf", Some(child.id)).unwrap();
        let gone = coordinator.create("Gone", None).unwrap();

        coordinator.rename(child.id, "Renamed child").unwrap();
        coordinator.reparent(leaf.id, Some(root.id)).unwrap();
        coordinator.request_archive(child.id).unwrap();
        coordinator.confirm(child.id).unwrap();
        coordinator.request_remove(gone.id).unwrap();
        coordinator.confirm(gone.id).unwrap();

        (root.id, child.id, leaf.id)
    };

    let conn = open_db(&path).unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();
    let loaded = repo.load_projects().unwrap();

    assert_eq!(
        loaded.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![root_id, child_id, leaf_id]
    );
    assert_eq!(loaded[1].name, "Renamed child");
    assert!(loaded[1].archived);
    assert_eq!(loaded[2].parent, Some(root_id));

    let store = ProjectStore::from_projects(loaded).unwrap();
    assert_eq!(store.len(), 3);
}

#[test]
fn mirroring_unknown_project_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    let err = repo
        .apply_command(&ProjectCommand::Removed { id: missing })
        .unwrap_err();
    assert!(matches!(err, ProjectRepoError::NotFound(id) if id == missing));
}

#[test]
fn invalid_persisted_uuid_is_rejected_on_load() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO projects (project_uuid, name, parent_uuid, is_archived, position)
         VALUES ('not-a-uuid', 'Bad id', NULL, 0, 0);",
        [],
    )
    .unwrap();

    let repo = SqliteProjectRepository::try_new(&conn).unwrap();
    let err = repo.load_projects().unwrap_err();
    assert!(matches!(
        err,
        ProjectRepoError::InvalidData(ref message) if message.contains("not-a-uuid")
    ));
}
