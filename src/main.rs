//! Prompt Studio command-line host.
//!
//! Every subcommand prints its `CommandResponse` as JSON on stdout; logs go
//! to stderr.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use prompt_studio::commands::{self, settings};
use prompt_studio::models::settings::ConfigUpdate;
use prompt_studio::storage::{ConfigService, Database, KeyValueStore};
use prompt_studio::utils::paths::database_path;
use prompt_studio::{AppState, CommandResponse, LibraryFilter};
use prompt_studio_core::{PromptDocumentPatch, TemplateCategory, TemplateMetadata};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prompt-studio")]
#[command(version, about = "Guided editor for image/video generation prompt documents", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.prompt-studio/config.json)
    #[arg(long, global = true, env = "PROMPT_STUDIO_CONFIG")]
    config: Option<PathBuf>,

    /// Database file (overrides the config file)
    #[arg(long, global = true, env = "PROMPT_STUDIO_DATABASE")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enter the passcode
    Unlock { code: String },
    /// Forget the passcode
    Lock,
    /// Show the gate status
    Gate,
    /// Storage and gate health
    Health,
    /// Print the current document
    Show,
    /// Merge a partial document given as JSON
    Update { patch: String },
    /// Restore the default document and return to the welcome screen
    Reset,
    /// Export the current document as plain JSON
    Export {
        /// Write `prompt-<epoch-ms>.json` into this directory instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the current document with a JSON file
    ImportJson { file: PathBuf },
    /// Move through the wizard
    #[command(subcommand)]
    Wizard(WizardCommand),
    /// Manage the template library
    #[command(subcommand)]
    Templates(TemplateCommand),
    /// Manage named presets
    #[command(subcommand)]
    Presets(PresetCommand),
    /// Show or change config.json
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum WizardCommand {
    /// Current screen
    Screen,
    /// Leave the welcome screen
    Start,
    Next,
    Back,
    /// Jump to a step index (-1 is the welcome screen)
    Jump {
        #[arg(allow_negative_numbers = true)]
        index: i32,
    },
    OpenLibrary,
    CloseLibrary,
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// Search built-in and user templates
    List {
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        category: Option<TemplateCategory>,
        #[arg(long)]
        favorites: bool,
    },
    /// Recently loaded user templates
    Recent,
    /// Save the current document as a template
    Save(SaveTemplateArgs),
    Delete { id: String },
    Favorite { id: String },
    /// Load a template into the editor
    Load { id: String },
    /// Load a template and jump to the first step
    Select { id: String },
    /// Export a template file
    Export {
        id: String,
        /// Write `<name>.promptstudio` into this directory instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import a `.json` or `.promptstudio` template file
    Import { file: PathBuf },
}

#[derive(Args)]
struct SaveTemplateArgs {
    #[arg(short, long)]
    name: String,
    #[arg(short, long)]
    description: String,
    #[arg(short, long, default_value = "custom")]
    category: TemplateCategory,
    #[arg(short, long = "tag")]
    tags: Vec<String>,
}

#[derive(Subcommand)]
enum PresetCommand {
    List,
    Save { name: String },
    Load { name: String },
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        passcode: Option<String>,
        #[arg(long)]
        max_attempts: Option<u32>,
        #[arg(long)]
        lockout_minutes: Option<u32>,
        #[arg(long)]
        database_file: Option<PathBuf>,
    },
    Reset,
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(error) => {
            tracing::error!(error = %error, "prompt-studio failed");
            eprintln!("Error: {error:#}");
            process::exit(2);
        }
    }
}

/// Returns whether the command succeeded.
async fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    init_tracing();

    let mut config = match &cli.config {
        Some(path) => ConfigService::open(path),
        None => ConfigService::new(),
    }
    .context("failed to load configuration")?;

    let database_file = match cli
        .database
        .clone()
        .or_else(|| config.get_config().database_file.clone())
    {
        Some(path) => path,
        None => database_path().context("failed to resolve database path")?,
    };
    let storage: Arc<dyn KeyValueStore> = Arc::new(
        Database::open(&database_file)
            .with_context(|| format!("failed to open database {}", database_file.display()))?,
    );

    let state = AppState::new();
    state
        .initialize(storage, config.get_config())
        .await
        .context("failed to initialize application state")?;

    dispatch(&state, &mut config, cli.command).await
}

async fn dispatch(
    state: &AppState,
    config: &mut ConfigService,
    command: Command,
) -> anyhow::Result<bool> {
    match command {
        Command::Unlock { code } => print(commands::unlock(state, &code).await),
        Command::Lock => print(commands::lock(state).await),
        Command::Gate => print(commands::get_gate_status(state).await),
        Command::Health => print(commands::get_health(state).await),
        Command::Show => print(commands::get_document(state).await),
        Command::Update { patch } => {
            let patch: PromptDocumentPatch =
                serde_json::from_str(&patch).context("patch is not a valid partial document")?;
            print(commands::update_document(state, patch).await)
        }
        Command::Reset => print(commands::reset_document(state).await),
        Command::Export { out: Some(dir) } => print(commands::export_json_file(state, &dir).await),
        Command::Export { out: None } => print_raw(commands::export_json(state).await),
        Command::ImportJson { file } => print(commands::import_json_file(state, &file).await),
        Command::Wizard(command) => wizard(state, command).await,
        Command::Templates(command) => templates(state, command).await,
        Command::Presets(command) => presets(state, command).await,
        Command::Settings(command) => settings_command(state, config, command).await,
    }
}

async fn wizard(state: &AppState, command: WizardCommand) -> anyhow::Result<bool> {
    match command {
        WizardCommand::Screen => print(commands::get_screen(state).await),
        WizardCommand::Start => print(commands::start_creating(state).await),
        WizardCommand::Next => print(commands::next_step(state).await),
        WizardCommand::Back => print(commands::previous_step(state).await),
        WizardCommand::Jump { index } => print(commands::jump_to_step(state, index).await),
        WizardCommand::OpenLibrary => print(commands::open_library(state).await),
        WizardCommand::CloseLibrary => print(commands::close_library(state).await),
    }
}

async fn templates(state: &AppState, command: TemplateCommand) -> anyhow::Result<bool> {
    match command {
        TemplateCommand::List {
            query,
            category,
            favorites,
        } => {
            let filter = LibraryFilter {
                query,
                category,
                favorites_only: favorites,
            };
            print(commands::list_templates(state, filter).await)
        }
        TemplateCommand::Recent => print(commands::recent_templates(state).await),
        TemplateCommand::Save(args) => {
            let metadata = TemplateMetadata {
                name: args.name,
                description: args.description,
                category: args.category,
                tags: args.tags,
            };
            print(commands::save_as_template(state, metadata).await)
        }
        TemplateCommand::Delete { id } => print(commands::delete_template(state, &id).await),
        TemplateCommand::Favorite { id } => print(commands::toggle_favorite(state, &id).await),
        TemplateCommand::Load { id } => print(commands::load_template(state, &id).await),
        TemplateCommand::Select { id } => print(commands::select_template(state, &id).await),
        TemplateCommand::Export { id, out: Some(dir) } => {
            print(commands::export_template_file(state, &id, &dir).await)
        }
        TemplateCommand::Export { id, out: None } => {
            match commands::export_template(state, &id).await {
                CommandResponse {
                    data: Some(export), ..
                } => {
                    println!("{}", export.contents);
                    Ok(true)
                }
                failed => print(failed),
            }
        }
        TemplateCommand::Import { file } => {
            print(commands::import_template_file(state, &file).await)
        }
    }
}

async fn presets(state: &AppState, command: PresetCommand) -> anyhow::Result<bool> {
    match command {
        PresetCommand::List => print(commands::list_presets(state).await),
        PresetCommand::Save { name } => print(commands::save_preset(state, &name).await),
        PresetCommand::Load { name } => print(commands::load_preset(state, &name).await),
    }
}

async fn settings_command(
    state: &AppState,
    config: &mut ConfigService,
    command: SettingsCommand,
) -> anyhow::Result<bool> {
    match command {
        SettingsCommand::Show => print(settings::get_settings(state, config).await),
        SettingsCommand::Set {
            passcode,
            max_attempts,
            lockout_minutes,
            database_file,
        } => {
            let update = ConfigUpdate {
                passcode,
                max_attempts,
                lockout_minutes,
                database_file,
            };
            print(settings::update_settings(state, config, update).await)
        }
        SettingsCommand::Reset => print(settings::reset_settings(state, config).await),
    }
}

/// Print a response envelope as pretty JSON
fn print<T: Serialize>(response: CommandResponse<T>) -> anyhow::Result<bool> {
    let json = serde_json::to_string_pretty(&response).context("failed to serialize response")?;
    println!("{}", json);
    Ok(response.success)
}

/// Print a string payload verbatim, or the error envelope
fn print_raw(response: CommandResponse<String>) -> anyhow::Result<bool> {
    match response {
        CommandResponse {
            data: Some(text), ..
        } => {
            println!("{}", text);
            Ok(true)
        }
        failed => print(failed),
    }
}

/// Logs to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("prompt_studio=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
