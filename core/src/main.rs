//! Tickler - command-line todo list.
//!
//! A thin front end over [`TodoManager`]: each invocation loads the stored
//! collection, applies one command, and flushes the pending write before
//! exiting.
//!
//! # Commands
//!
//! - `tickler add <title>`: Add a todo
//! - `tickler list`: Show todos, optionally searched, filtered and sorted
//! - `tickler toggle <id>`: Complete or reopen a todo
//! - `tickler edit <id>`: Change title, notes or due date
//! - `tickler rm <id>`: Delete a todo
//! - `tickler import <file>` / `tickler export [file]`: Bulk replace or dump
//! - `tickler theme [mode]`: Show or set the theme preference
//!
//! # Environment Variables
//!
//! See the [`config`](tickler_core::config) module for available configuration options.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tickler_core::config::Config;
use tickler_core::persistence::{read_collection_file, write_collection_file, Persistence};
use tickler_core::storage::FileStore;
use tickler_core::types::{FilterKind, NewTodo, SortKind, ThemeMode, Todo, TodoPatch};
use tickler_core::validation::{validate_notes, validate_title};
use tickler_core::TodoManager;

/// Tickler - a small personal todo list.
#[derive(Parser, Debug)]
#[command(name = "tickler")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    TICKLER_DATA_DIR           Data directory (default: ~/.tickler)
    TICKLER_SAVE_DEBOUNCE_MS   Write debounce window (default: 300)
    RUST_LOG                   Log filter (default: warn)

EXAMPLES:
    # Add a todo due next Friday evening
    tickler add \"Renew passport\" --due 2024-05-10T18:00:00Z

    # Open todos mentioning milk, soonest due first
    tickler list --filter active --sort dueDate --query milk

    # Switch to the dark theme
    tickler theme dark
")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new todo.
    Add {
        title: String,

        #[arg(short, long)]
        notes: Option<String>,

        /// Due date as an RFC 3339 timestamp.
        #[arg(short, long)]
        due: Option<DateTime<Utc>>,

        /// Add the todo as already completed.
        #[arg(long)]
        done: bool,
    },

    /// List todos.
    List {
        /// Case-insensitive text to look for in titles and notes.
        #[arg(short, long, default_value = "")]
        query: String,

        /// One of: all, active, completed.
        #[arg(short, long, default_value_t = FilterKind::All)]
        filter: FilterKind,

        /// One of: default, dueDate, alphabetical.
        #[arg(short, long, default_value_t = SortKind::Default)]
        sort: SortKind,
    },

    /// Mark a todo completed, or reopen it.
    Toggle { id: String },

    /// Change fields of a todo.
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        #[arg(long)]
        clear_notes: bool,

        /// Due date as an RFC 3339 timestamp.
        #[arg(short, long, conflicts_with = "clear_due")]
        due: Option<DateTime<Utc>>,

        #[arg(long)]
        clear_due: bool,
    },

    /// Delete a todo.
    Rm { id: String },

    /// Replace the whole collection with the todos in a JSON file.
    Import { file: PathBuf },

    /// Write the collection as JSON to a file, or stdout.
    Export { file: Option<PathBuf> },

    /// Show the theme preference, or set it to light, dark or system.
    Theme { mode: Option<ThemeMode> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    runtime.block_on(run(cli.command))
}

/// Loads the collection, runs one command, and flushes pending writes.
async fn run(command: Command) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        data_dir = %config.data_dir.display(),
        debounce_ms = config.save_debounce.as_millis(),
        "Configuration loaded"
    );

    let store = Arc::new(FileStore::new(&config.data_dir));
    let persistence = Persistence::with_debounce(store, config.save_debounce);
    let mut manager = TodoManager::new(persistence);
    manager.initialize().await;

    let result = execute(command, &mut manager).await;
    manager.flush().await;
    result
}

async fn execute(command: Command, manager: &mut TodoManager) -> Result<()> {
    match command {
        Command::Add {
            title,
            notes,
            due,
            done,
        } => {
            validate_title(&title)?;
            if let Some(notes) = &notes {
                validate_notes(notes)?;
            }

            let data = NewTodo {
                title: title.trim().to_string(),
                notes,
                due_date: due,
                completed: done,
                completed_at: None,
            };
            let id = manager.add(data);
            println!("{id}");
        }

        Command::List {
            query,
            filter,
            sort,
        } => {
            manager.set_query(query);
            manager.set_filter(filter);
            manager.set_sort(sort);

            let now = Utc::now();
            for todo in manager.visible_todos() {
                println!("{}", format_line(todo, now));
            }
        }

        Command::Toggle { id } => {
            if !manager.toggle_complete(&id) {
                bail!("no todo with id {id}");
            }
        }

        Command::Edit {
            id,
            title,
            notes,
            clear_notes,
            due,
            clear_due,
        } => {
            if let Some(title) = &title {
                validate_title(title)?;
            }
            if let Some(notes) = &notes {
                validate_notes(notes)?;
            }

            let patch = TodoPatch {
                title: title.map(|t| t.trim().to_string()),
                notes: if clear_notes { Some(None) } else { notes.map(Some) },
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                completed: None,
            };
            if patch.is_empty() {
                bail!("nothing to change; pass --title, --notes, --due or a --clear flag");
            }
            if !manager.update(&id, patch) {
                bail!("no todo with id {id}");
            }
        }

        Command::Rm { id } => {
            if !manager.delete(&id) {
                bail!("no todo with id {id}");
            }
        }

        Command::Import { file } => {
            let todos = read_collection_file(&file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            manager.replace_all(todos);
            println!("Imported {} todos", manager.todos().len());
        }

        Command::Export { file } => match file {
            Some(path) => {
                write_collection_file(&path, manager.todos())
                    .with_context(|| format!("Failed to export to {}", path.display()))?;
            }
            None => println!("{}", serde_json::to_string_pretty(manager.todos())?),
        },

        Command::Theme { mode } => match mode {
            Some(mode) => manager.persistence().save_theme_preference(mode).await,
            None => println!("{}", manager.persistence().load_theme_preference().await),
        },
    }

    Ok(())
}

/// One line of `list` output: status box, id, title, and due date tags.
fn format_line(todo: &Todo, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "[{}] {}  {}",
        if todo.completed { "x" } else { " " },
        todo.id,
        todo.title
    );

    if let Some(due) = todo.due_date {
        line.push_str(&format!("  (due {})", due.format("%b %-d, %Y %-I:%M %p")));
        if todo.is_overdue(now) {
            line.push_str(" OVERDUE");
        }
    }

    line
}

/// Initializes the logging subsystem. Logs go to stderr so command output
/// on stdout stays clean.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}
