mod config;
mod view;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use upnext_core::{
    AddTaskError, ExpiryPolicy, FileUserDataRepository, Task, TaskId, TaskLifecycleService,
    UserDataRepository,
};

use crate::config::Configuration;

#[derive(Parser)]
#[command(name = "upnext")]
#[command(about = "Track upcoming tasks; completed ones clear themselves after a day", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a task (usage: add "Call mom" --due "tmr 9am")
    Add {
        /// What needs doing
        description: Option<String>,
        /// When it is due: "tmr 9am", "fri", "2025-03-01 17:00"... (default: today 23:59)
        #[arg(short, long, default_value = "")]
        due: String,
    },
    /// List upcoming tasks
    List,
    /// List completed tasks, purging expired ones first
    Completed,
    /// Mark a task as done
    Done { id: u64 },
    /// Move a completed task back to upcoming
    Undo { id: u64 },
    /// Remove a completed task from the completed list (it goes back to upcoming)
    Remove { id: u64 },
    /// Drop completed tasks whose retention has run out
    Purge,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("upnext=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = Configuration::load()?;
    debug!(?cfg, "configuration loaded");

    let repo = FileUserDataRepository::new(cfg.data_dir.clone())?;
    let mut data = repo.load()?;
    let expiry = ExpiryPolicy::new(Duration::hours(i64::from(cfg.retention_hours)));
    let mut service = TaskLifecycleService::from_user_data(&data, expiry)
        .with_context(|| format!("{} is inconsistent", repo.path().display()))?;

    let now = wall_clock();
    let outcome = run(&mut service, cli.command.unwrap_or(Commands::List), now);

    service.write_into(&mut data);
    repo.save(&data)?;
    outcome
}

fn run(service: &mut TaskLifecycleService, command: Commands, now: NaiveDateTime) -> Result<()> {
    match command {
        Commands::Add { description, due } => {
            match service.add_task(description.as_deref().unwrap_or(""), &due, now) {
                Ok(Some(task)) => {
                    println!("Task added: {} (ID: {})", task.description, task.id);
                    println!("  Due: {}", task.due_label());
                }
                Ok(None) => println!("Nothing to add."),
                Err(AddTaskError::Internal(violation)) => return Err(violation.into()),
                Err(e) => println!("Error: {}", e),
            }
        }
        Commands::List => {
            println!("{}", view::render_upcoming(&service.upcoming_views()));
        }
        Commands::Completed => {
            purge(service, now)?;
            println!("{}", view::render_completed(&service.completed_views(now)));
        }
        Commands::Done { id } => match service.complete_task(TaskId(id), now) {
            Ok(task) => println!("Done: {}", task.description),
            Err(e) => println!("Error: {}", e),
        },
        Commands::Undo { id } => match service.reopen_task(TaskId(id)) {
            Ok(task) => println!("Reopened: {}", task.description),
            Err(e) => println!("Error: {}", e),
        },
        Commands::Remove { id } => match service.remove_task(TaskId(id)) {
            Ok(task) => println!("Moved back to upcoming: {}", task.description),
            Err(e) => println!("Error: {}", e),
        },
        Commands::Purge => {
            let purged = purge(service, now)?;
            println!("Purged {} completed task(s).", purged.len());
        }
    }
    Ok(())
}

/// Debug builds refuse to purge over broken state; release builds log it and
/// carry on.
fn purge(service: &mut TaskLifecycleService, now: NaiveDateTime) -> Result<Vec<Task>> {
    if cfg!(debug_assertions) {
        return Ok(service.try_purge_expired(now)?);
    }
    Ok(service.purge_expired(now))
}

/// Local wall-clock time; the engine works in naive local time.
fn wall_clock() -> NaiveDateTime {
    Local::now().naive_local()
}
