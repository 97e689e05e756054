use clap::{Arg, ArgMatches, Command};
use color_eyre::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

mod adapters;
mod application;
mod domain;
mod ports;

use adapters::{
    api::{HttpTaskStore, TodoClient},
    config::FileConfigStore,
    effects::{Celebrations, EffectsEngine, SoundBoard, TerminalBell},
    tui::{run_tui, App},
};
use application::{AppResult, Change, Intent, StateManager, TaskService};
use domain::{DomainError, TaskFilter, TaskId};
use ports::{AppConfig, ConfigStore, NoopEffects, TaskStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize color-eyre for better error reporting
    color_eyre::install()?;

    // Initialize logging to file
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("todo-tui.log")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Parse command line arguments
    let matches = Command::new("todo-tui")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A terminal to-do list backed by a todo REST server")
        .long_about("A keyboard-driven to-do list for the terminal.\n\nRun without a subcommand to open the interactive list.\nSubcommands talk to the server directly and print JSON.")
        .arg(
            Arg::new("server")
                .long("server")
                .value_name("URL")
                .help("Todo server base URL (can also be set via TODO_SERVER_URL env var)")
                .global(true)
        )
        .subcommand(
            Command::new("list")
                .about("List tasks as JSON")
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .short('f')
                        .value_name("FILTER")
                        .help("all, active or completed")
                        .default_value("all")
                )
        )
        .subcommand(
            Command::new("add")
                .about("Add a task")
                .arg(Arg::new("text").help("Task text").required(true).index(1))
        )
        .subcommand(
            Command::new("done")
                .about("Mark a task completed")
                .arg(Arg::new("id").help("Task ID").required(true).index(1))
        )
        .subcommand(
            Command::new("undo")
                .about("Mark a task active again")
                .arg(Arg::new("id").help("Task ID").required(true).index(1))
        )
        .subcommand(
            Command::new("edit")
                .about("Replace a task's text")
                .arg(Arg::new("id").help("Task ID").required(true).index(1))
                .arg(Arg::new("text").help("New text").required(true).index(2))
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a task")
                .arg(Arg::new("id").help("Task ID").required(true).index(1))
        )
        .subcommand(Command::new("clear-completed").about("Delete every completed task"))
        .get_matches();

    // Load configuration
    let config_store = Arc::new(FileConfigStore::new()?);
    let mut config = match config_store.load_config().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring unreadable config: {}", e);
            AppConfig::default()
        }
    };

    // Override with command line arguments or environment variables
    if let Some(server) = matches.get_one::<String>("server") {
        config.server_url = server.clone();
    } else if let Ok(server) = std::env::var("TODO_SERVER_URL") {
        config.server_url = server;
    }
    tracing::info!("Using todo server at {}", config.server_url);

    // Create dependencies
    let client = TodoClient::new(&config.server_url)?;
    let store: Arc<dyn TaskStore> = Arc::new(HttpTaskStore::new(client));

    match matches.subcommand() {
        Some((name, sub_matches)) => {
            let service = Arc::new(TaskService::new(store, Arc::new(NoopEffects)));
            let mut state_manager = StateManager::new(service);

            if let Err(e) = run_command(&mut state_manager, name, sub_matches).await {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
        }
        None => {
            // Default behavior - run TUI
            let (effects_tx, effects_rx) = mpsc::unbounded_channel();
            let service = Arc::new(TaskService::new(store, Arc::new(effects_tx)));
            let state_manager = StateManager::new(service);

            let effects = EffectsEngine::new(
                SoundBoard::new(Arc::new(TerminalBell), config.sounds_enabled),
                Celebrations::new(),
                config.celebrations_enabled,
            );

            let app = App::new(state_manager, effects, effects_rx, config, config_store);

            if let Err(e) = run_tui(app).await {
                eprintln!("❌ Application error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run_command(
    state_manager: &mut StateManager,
    name: &str,
    matches: &ArgMatches,
) -> AppResult<()> {
    // clap enforces the required positionals
    let id = || TaskId::from(matches.get_one::<String>("id").cloned().unwrap_or_default());
    let text = || matches.get_one::<String>("text").cloned().unwrap_or_default();

    let change = match name {
        "list" => {
            let filter: TaskFilter = matches
                .get_one::<String>("filter")
                .map(|f| f.parse())
                .transpose()?
                .unwrap_or_default();

            state_manager.initialize().await?;
            state_manager.commit(Change::FilterChanged(filter));
            print_json(&state_manager.tasks().visible())?;
            return Ok(());
        }
        "add" => state_manager.dispatch(Intent::Add { text: text() }).await?,
        "done" => {
            state_manager
                .dispatch(Intent::SetCompleted { id: id(), completed: true })
                .await?
        }
        "undo" => {
            state_manager
                .dispatch(Intent::SetCompleted { id: id(), completed: false })
                .await?
        }
        "edit" => {
            state_manager
                .dispatch(Intent::Edit { id: id(), text: text() })
                .await?
        }
        "rm" => state_manager.dispatch(Intent::Delete { id: id() }).await?,
        "clear-completed" => {
            state_manager.initialize().await?;
            let ids = state_manager.tasks().completed_ids();
            state_manager.dispatch(Intent::ClearCompleted { ids }).await?
        }
        other => {
            return Err(application::AppError::Application(format!(
                "Unknown command: {other}"
            )))
        }
    };

    match change {
        Some(Change::Created(task)) | Some(Change::Updated(task)) => print_json(&task),
        Some(Change::Deleted(id)) => print_json(&serde_json::json!({ "deleted": id })),
        Some(Change::Cleared(ids)) => print_json(&serde_json::json!({ "deleted": ids })),
        Some(_) => Ok(()),
        None if name == "clear-completed" => print_json(&serde_json::json!({ "deleted": [] })),
        None => Err(DomainError::EmptyText.into()),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| application::AppError::Application(e.to_string()))?;
    println!("{json}");
    Ok(())
}
