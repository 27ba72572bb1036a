//! CLI entry point for taskdeck.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use taskdeck_app::{AppConfig, BackendConfig, TaskService};
use taskdeck_store_http::HttpStore;

mod commands;
mod tui;

/// Task dashboard backed by a hosted record API.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: tasks, categories and productivity stats from your terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a task.
    Add {
        /// Title; quick-add default applies when omitted.
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Category name or id.
        #[arg(short = 'c', long)]
        category: Option<String>,
        /// low, medium or high.
        #[arg(short = 'p', long)]
        priority: Option<String>,
        /// Due date as yyyy-mm-dd.
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks, optionally filtered.
    Ls {
        /// Category name or id.
        #[arg(short = 'c', long)]
        category: Option<String>,
        /// low, medium or high.
        #[arg(short = 'p', long)]
        priority: Option<String>,
        /// today, overdue or upcoming.
        #[arg(long)]
        due: Option<String>,
        /// completed or pending.
        #[arg(long)]
        status: Option<String>,
        /// Substring matched against title and description.
        #[arg(long)]
        text: Option<String>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one task in full.
    Show {
        /// Task id.
        id: String,
    },

    /// Edit fields of an existing task.
    Edit {
        /// Task id.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Category name or id.
        #[arg(short = 'c', long)]
        category: Option<String>,
        /// low, medium or high.
        #[arg(short = 'p', long)]
        priority: Option<String>,
        /// Due date as yyyy-mm-dd.
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
    },

    /// Toggle completion of a task.
    Done {
        /// Task id.
        id: String,
    },

    /// Delete one or more tasks.
    Rm {
        /// Task ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Search tasks by title or description.
    Search {
        /// Query text; blank matches everything.
        query: String,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show productivity statistics.
    Stats {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Manage categories.
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Launch the interactive dashboard.
    Tui,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// List categories with task counts.
    Ls {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Create a category.
    Add {
        /// Name; defaults apply when omitted.
        name: Option<String>,
        /// Hex color such as #6366F1.
        #[arg(long)]
        color: Option<String>,
        /// Icon name.
        #[arg(long)]
        icon: Option<String>,
    },

    /// Edit a category.
    Edit {
        /// Category id.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },

    /// Delete a category.
    Rm {
        /// Category id.
        id: String,
    },
}

/// Rendering for list-like command output.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable table.
    Table,
    /// Pretty-printed JSON.
    Json,
}

fn main() -> Result<()> {
    let Cli { command } = Cli::parse();
    let command = command.unwrap_or(Command::Tui);

    if should_install_tracing(&command) {
        install_tracing();
    }

    let config = AppConfig::load(".")?;
    execute_command(command, config)
}

fn execute_command(command: Command, config: AppConfig) -> Result<()> {
    let store = open_store(&config.backend)?;
    match command {
        Command::Tui => tui::run(store, config.defaults),
        other => {
            let service = TaskService::new(store, config.defaults);
            commands::run(other, &service)
        }
    }
}

fn open_store(backend: &BackendConfig) -> Result<HttpStore> {
    let base_url = backend.base_url.as_deref().context(
        "backend.base_url is not configured; set it in taskdeck.toml or TASKDECK_BACKEND_URL",
    )?;
    HttpStore::with_options(base_url, backend.token.clone(), backend.timeout()).map_err(Into::into)
}

const fn should_install_tracing(command: &Command) -> bool {
    !matches!(command, Command::Tui)
}

fn install_tracing() {
    // RUST_LOG overrides the default info level.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
