//! Command-line front end for Horizon goals.
//!
//! # Responsibility
//! - Drive the same goal use-cases the mobile app calls, against a local
//!   SQLite goal database.
//! - Keep output line-oriented for scripting.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use horizon_core::{
    default_log_level, init_logging, resolve_db_path, Goal, GoalService, GoalType, SqliteKvStore,
    DB_PATH_ENV,
};

/// Track goals for today, this week, this month and this year.
#[derive(Parser)]
#[command(name = "horizon", version, about)]
struct Cli {
    /// Goal database file.
    #[arg(long, env = DB_PATH_ENV)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List goals of one horizon.
    List { kind: GoalType },
    /// Add a goal.
    Add {
        kind: GoalType,
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Flip completion of a goal.
    Toggle { kind: GoalType, id: String },
    /// Replace title and description of a goal.
    Edit {
        kind: GoalType,
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a goal.
    Delete { kind: GoalType, id: String },
    /// Remove every goal of one horizon.
    Clear { kind: GoalType },
    /// Remove every goal of every horizon.
    ClearAll,
    /// Show goal counts per horizon.
    Stats,
    /// Check core linkage.
    Ping,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    if let Commands::Ping = cli.command {
        println!("horizon_core ping={}", horizon_core::ping());
        println!("horizon_core version={}", horizon_core::core_version());
        return Ok(());
    }

    let db_path = resolve_db_path(cli.db.as_deref());
    let store = SqliteKvStore::open(&db_path)
        .with_context(|| format!("failed to open goal database `{}`", db_path.display()))?;
    let service = GoalService::with_store(store);

    run(&service, cli.command)
}

fn run(service: &GoalService<SqliteKvStore>, command: Commands) -> Result<()> {
    match command {
        Commands::List { kind } => {
            let goals = service.list_goals(kind);
            let progress = service.progress(kind);
            println!("{kind}: {}/{} completed", progress.completed, progress.total);
            for goal in &goals {
                print_goal(goal);
            }
        }
        Commands::Add {
            kind,
            title,
            description,
        } => {
            let goal = service.create_goal(kind, &title, description.as_deref())?;
            println!("created {}", goal.id);
        }
        Commands::Toggle { kind, id } => {
            let goal = service.toggle_goal(kind, &id)?;
            print_goal(&goal);
        }
        Commands::Edit {
            kind,
            id,
            title,
            description,
        } => {
            let goal = service.edit_goal(kind, &id, &title, description.as_deref())?;
            print_goal(&goal);
        }
        Commands::Delete { kind, id } => {
            if service.delete_goal(kind, &id)? {
                println!("deleted {id}");
            } else {
                println!("no goal {id} in {kind}");
            }
        }
        Commands::Clear { kind } => {
            service.clear_goals(kind)?;
            println!("cleared {kind}");
        }
        Commands::ClearAll => {
            service.clear_all_goals()?;
            println!("cleared all horizons");
        }
        Commands::Stats => {
            let stats = service.storage_stats();
            println!(
                "today={} week={} month={} year={} total={}",
                stats.today, stats.week, stats.month, stats.year, stats.total
            );
        }
        Commands::Ping => bail!("ping is handled before opening the database"),
    }
    Ok(())
}

fn print_goal(goal: &Goal) {
    let mark = if goal.completed { "x" } else { " " };
    match &goal.description {
        Some(description) => println!("[{mark}] {} {} ({description})", goal.id, goal.title),
        None => println!("[{mark}] {} {}", goal.id, goal.title),
    }
}
