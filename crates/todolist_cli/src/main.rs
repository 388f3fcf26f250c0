//! Command-line driver for the task list.
//!
//! Every command is translated into the same UI events a graphical surface
//! would send, so the CLI exercises the full view/store path.

mod text_renderer;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use text_renderer::{format_footer, format_list, LastFrame};
use todolist_core::{
    init_logging, AppConfig, EventOutcome, Key, SqliteSlotStorage, TaskFilter, TaskId, TaskStore,
    TodoView, UiEvent,
};

const DEFAULT_DB_FILE_NAME: &str = "todolist.sqlite3";

type CliView = TodoView<SqliteSlotStorage, LastFrame>;

#[derive(Debug, Parser)]
#[command(name = "todolist", version, about = "Keep a simple task list")]
struct Cli {
    /// SQLite file holding the list (overrides TODOLIST_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Storage slot name (overrides TODOLIST_STORAGE_KEY)
    #[arg(long, global = true)]
    key: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a task
    Add { title: String },
    /// Show tasks
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    /// Mark a task completed
    Done { id: String },
    /// Mark a task not completed
    Undo { id: String },
    /// Change a task's title (an empty title deletes it)
    Rename { id: String, title: String },
    /// Delete a task
    Rm { id: String },
    /// Complete every task (or reopen every task with --off)
    ToggleAll {
        #[arg(long)]
        off: bool,
    },
    /// Delete all completed tasks
    ClearCompleted,
    /// Print counts only
    Stats,
    /// Check core linkage
    Ping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FilterArg {
    All,
    Active,
    Completed,
}

impl From<FilterArg> for TaskFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => TaskFilter::All,
            FilterArg::Active => TaskFilter::Active,
            FilterArg::Completed => TaskFilter::Completed,
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("todolist: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Ping = cli.command {
        println!("todolist_core ping={}", todolist_core::ping());
        println!("todolist_core version={}", todolist_core::core_version());
        return Ok(());
    }

    let mut config = AppConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(key) = cli.key {
        config.storage_key = key;
    }
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }
    config.validate().map_err(|err| err.to_string())?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }

    let db_path = config
        .db_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));
    let storage = SqliteSlotStorage::open(&db_path).map_err(|err| err.to_string())?;
    let store = TaskStore::open_with_key(storage, config.storage_key.as_str());
    let mut view = TodoView::attach(store, LastFrame::default());
    info!(
        "event=cli_start module=cli status=ok key={} count={}",
        config.storage_key,
        view.store().size()
    );

    execute(&mut view, cli.command)
}

fn execute(view: &mut CliView, command: Command) -> Result<(), String> {
    match command {
        Command::Add { title } => {
            let outcome = send(
                view,
                UiEvent::NewTodoKey {
                    key: Key::Enter,
                    text: title,
                },
            )?;
            match outcome {
                EventOutcome::TodoAdded(id) => println!("{id}"),
                _ => return Err("title cannot be empty".to_string()),
            }
        }
        Command::List { filter } => {
            send(
                view,
                UiEvent::FragmentChanged {
                    fragment: format!("#{}", TaskFilter::from(filter).token()),
                },
            )?;
            print_frame(view, format_list);
        }
        Command::Done { id } => {
            let id = resolve_id(view, &id)?;
            send(view, UiEvent::CheckboxChanged { id, checked: true })?;
        }
        Command::Undo { id } => {
            let id = resolve_id(view, &id)?;
            send(view, UiEvent::CheckboxChanged { id, checked: false })?;
        }
        Command::Rename { id, title } => {
            let id = resolve_id(view, &id)?;
            send(view, UiEvent::EditBlurred { id, text: title })?;
        }
        Command::Rm { id } => {
            let id = resolve_id(view, &id)?;
            send(view, UiEvent::DeleteClicked { id })?;
        }
        Command::ToggleAll { off } => {
            send(view, UiEvent::ToggleAllChanged { checked: !off })?;
        }
        Command::ClearCompleted => {
            send(view, UiEvent::ClearCompletedClicked)?;
        }
        Command::Stats => print_frame(view, format_footer),
        Command::Ping => {}
    }
    Ok(())
}

fn send(view: &mut CliView, event: UiEvent) -> Result<EventOutcome, String> {
    view.handle(event)
        .into_result()
        .map_err(|err| err.to_string())
}

fn print_frame(view: &CliView, format: fn(&todolist_core::RenderModel) -> String) {
    if let Some(frame) = view.renderer().frame() {
        print!("{}", format(frame));
    }
}

/// Accepts a full id or an unambiguous prefix of one.
fn resolve_id(view: &CliView, input: &str) -> Result<TaskId, String> {
    let exact = TaskId::from(input);
    if view.store().get(&exact).is_some() {
        return Ok(exact);
    }

    let mut matches = view
        .store()
        .iter()
        .filter(|task| !input.is_empty() && task.id.as_str().starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id.clone()),
        (None, _) => Err(format!("no task matches `{input}`")),
        (Some(_), Some(_)) => Err(format!("`{input}` matches more than one task")),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, FilterArg};
    use clap::Parser;

    #[test]
    fn list_filter_defaults_to_all() {
        let cli = Cli::try_parse_from(["todolist", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List { filter: FilterArg::All }));
    }

    #[test]
    fn list_filter_accepts_known_names_only() {
        let cli = Cli::try_parse_from(["todolist", "list", "--filter", "active"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::List {
                filter: FilterArg::Active
            }
        ));
        assert!(Cli::try_parse_from(["todolist", "list", "--filter", "actve"]).is_err());
    }
}
