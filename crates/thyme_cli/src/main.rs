//! Command line front end for the project hierarchy.
//!
//! # Responsibility
//! - Wire config, logging, the SQLite mirror and the coordinator together.
//! - Print the indented hierarchy after every command.
//!
//! Usage:
//! `thyme_cli [tree|all|add <name> [parent]|rename <id> <name>|move <id> <parent|root>|archive <id>|remove <id>]`

use log::info;
use std::error::Error;
use std::process::ExitCode;

use thyme_core::db::{open_db, open_db_in_memory};
use thyme_core::{
    init_logging_from_config, AlertSink, CoreConfig, HierarchyRow, MutationCoordinator,
    ProjectId, ProjectRepository, ProjectStore, RemoveRequest, ReparentOutcome,
    SqliteProjectRepository,
};

/// Prints alerts to stderr.
struct StderrAlerts;

impl AlertSink for StderrAlerts {
    fn alert(&mut self, message: &str) {
        eprintln!("! {message}");
    }
}

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env();
    init_logging_from_config(&config)?;

    let conn = match config.db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repo = SqliteProjectRepository::try_new(&conn)?;
    let store = ProjectStore::from_projects(repo.load_projects()?)?;
    let mut coordinator = MutationCoordinator::new(store, repo, StderrAlerts);

    let command = args.first().map(String::as_str).unwrap_or("tree");
    let mut show_archived = false;
    let rest = args.get(1..).unwrap_or(&[]);
    match (command, rest) {
        ("tree", []) => {}
        ("all", []) => show_archived = true,
        ("add", [name]) => {
            let project = coordinator.create(name.as_str(), None)?;
            println!("created {}", project.id);
        }
        ("add", [name, parent]) => {
            let project = coordinator.create(name.as_str(), Some(parse_id(parent)?))?;
            println!("created {}", project.id);
        }
        ("rename", [id, name]) => {
            coordinator.rename(parse_id(id)?, name.as_str())?;
        }
        ("move", [id, parent]) => {
            let parent = match parent.as_str() {
                "root" => None,
                other => Some(parse_id(other)?),
            };
            if coordinator.reparent(parse_id(id)?, parent)? == ReparentOutcome::RejectedCycle {
                println!("unchanged: target parent is inside the project's subtree");
            }
        }
        ("archive", [id]) => {
            let id = parse_id(id)?;
            coordinator.request_archive(id)?;
            coordinator.confirm(id)?;
        }
        ("remove", [id]) => {
            let id = parse_id(id)?;
            if coordinator.request_remove(id)? == RemoveRequest::Pending {
                coordinator.confirm(id)?;
            }
        }
        _ => return Err(format!("unrecognized command: {}", args.join(" ")).into()),
    }
    info!(
        "event=cli_command module=cli status=ok command={} revision={}",
        command,
        coordinator.store().revision()
    );

    let rows = if show_archived {
        coordinator.rows().collect::<Vec<_>>()
    } else {
        coordinator.active_rows().collect::<Vec<_>>()
    };
    for row in rows {
        println!("{}", format_row(&row));
    }
    Ok(())
}

fn parse_id(value: &str) -> Result<ProjectId, Box<dyn Error>> {
    ProjectId::parse_str(value.trim())
        .map_err(|err| format!("invalid project id `{value}`: {err}").into())
}

fn format_row(row: &HierarchyRow<'_>) -> String {
    let marker = if row.project.archived { " [archived]" } else { "" };
    format!(
        "{}{}{}  ({})",
        "  ".repeat(row.level),
        row.project.name,
        marker,
        row.project.id
    )
}
