//! PowerPredict application binary - composition root.
//!
//! Ties the PowerPredict crates together into a single executable:
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Install the tracing subscriber
//! 3. Run one of the subcommands:
//!    - `serve`: the axum REST API
//!    - `estimate`: print a bill for a JSON appliance list
//!    - `chat`: an interactive terminal session with the energy assistant

mod cli;
mod report;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use powerpredict_api::routes;
use powerpredict_api::state::AppState;
use powerpredict_billing::ApplianceRegistry;
use powerpredict_chat::{
    ask_or_apologize, ChatSession, CompletionService, OpenAiAssistant, TurnOrigin,
    UNAVAILABLE_MESSAGE,
};
use powerpredict_core::config::{AssistantConfig, PowerPredictConfig};
use powerpredict_core::types::Appliance;

use cli::{CliArgs, Command, SettingsArgs};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Load an appliance list from a JSON file.
fn load_appliances(path: &Path) -> AppResult<ApplianceRegistry> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let appliances: Vec<Appliance> = serde_json::from_str(&content)
        .map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;
    let registry = ApplianceRegistry::from_appliances(appliances)?;
    tracing::info!(path = %path.display(), count = registry.len(), "Appliances loaded");
    Ok(registry)
}

/// Build the fallback assistant when enabled and a key is available.
fn build_assistant(config: &AssistantConfig) -> Option<Arc<dyn CompletionService>> {
    if !config.enabled {
        tracing::debug!("Fallback assistant disabled in config");
        return None;
    }
    match OpenAiAssistant::from_config(config) {
        Ok(assistant) => {
            tracing::info!(model = %assistant.model(), "Fallback assistant ready");
            Some(Arc::new(assistant))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Fallback assistant unavailable");
            None
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

async fn run_serve(args: &CliArgs, mut config: PowerPredictConfig) -> AppResult<()> {
    config.server.port = args.resolve_port(config.server.port);
    if let Command::Serve { host: Some(ref host), .. } = args.command {
        config.server.host = host.clone();
    }

    let mut state = AppState::new(config.clone());
    if let Some(assistant) = build_assistant(&config.assistant) {
        state = state.with_assistant(assistant);
    }

    routes::start_server(&config, state).await?;
    Ok(())
}

fn run_estimate(
    path: &Path,
    settings: &SettingsArgs,
    config: &PowerPredictConfig,
) -> AppResult<()> {
    let registry = load_appliances(path)?;
    let settings = settings.apply(&config.billing.default_settings);

    match registry.calculate(&settings)? {
        Some(calc) => print!("{}", report::render_bill(&calc, &settings)),
        None => println!("No appliances to estimate."),
    }
    Ok(())
}

async fn run_chat(
    appliances: Option<&Path>,
    settings: &SettingsArgs,
    config: &PowerPredictConfig,
) -> AppResult<()> {
    let registry = match appliances {
        Some(path) => load_appliances(path)?,
        None => ApplianceRegistry::new(),
    };
    let settings = settings.apply(&config.billing.default_settings);
    let bill = registry.calculate(&settings)?;
    let assistant = build_assistant(&config.assistant);

    let mut session = ChatSession::new(config.chat.clone());
    if let Some(greeting) = session.open_and_greet().await {
        println!("{}", report::render_message(greeting));
    }
    println!("(type a question, a suggestion number, /ask <question>, /clear or /quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        if input == "/quit" {
            break;
        }
        if input == "/clear" {
            session.clear();
            println!("(transcript cleared)");
            continue;
        }

        if let Some(question) = cli::ask_command(input) {
            let turn = match session.begin_turn(question, TurnOrigin::Typed) {
                Ok(turn) => turn,
                Err(e) => {
                    println!("({})", e);
                    continue;
                }
            };
            let reply = match assistant.as_deref() {
                Some(service) => ask_or_apologize(service, &turn.query).await,
                None => UNAVAILABLE_MESSAGE.to_string(),
            };
            if let Some(message) = session.complete_turn_with_reply(turn, reply) {
                println!("{}", report::render_message(message));
            }
            continue;
        }

        // A bare number picks a chip from the last bot message.
        let chip = input.parse::<usize>().ok().and_then(|n| {
            session
                .messages()
                .iter()
                .rev()
                .find(|m| m.is_bot)
                .and_then(|m| m.suggestions.as_ref())
                .and_then(|s| s.get(n.checked_sub(1)?).cloned())
        });
        let (text, origin) = match chip {
            Some(ref chip) => {
                println!("[you] {}", chip);
                (chip.as_str(), TurnOrigin::Suggestion)
            }
            None => (input, TurnOrigin::Typed),
        };

        match session.send(text, origin, bill.as_ref(), registry.list()).await {
            Ok(reply) => println!("{}", report::render_message(reply)),
            Err(e) => println!("({})", e),
        }
    }

    session.close();
    Ok(())
}

// =============================================================================
// Entry point
// =============================================================================

#[tokio::main]
async fn main() -> AppResult<()> {
    let args = CliArgs::parse();

    // Config is read before tracing so its log level can seed the filter.
    let config_file = args.resolve_config_path();
    let loaded = PowerPredictConfig::load(&config_file);
    let config_level = loaded.as_ref().ok().map(|c| c.general.log_level.clone());

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(args.resolve_log_level(config_level.as_deref()))
            }),
        )
        .init();

    tracing::info!("Starting PowerPredict v{}", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            if config_file.exists() {
                tracing::warn!(
                    path = %config_file.display(),
                    error = %e,
                    "Failed to load config. Using defaults."
                );
            } else {
                tracing::debug!(path = %config_file.display(), "No config file, using defaults");
            }
            PowerPredictConfig::default()
        }
    };

    match &args.command {
        Command::Serve { .. } => run_serve(&args, config).await,
        Command::Estimate {
            appliances,
            settings,
        } => run_estimate(appliances, settings, &config),
        Command::Chat {
            appliances,
            settings,
        } => run_chat(appliances.as_deref(), settings, &config).await,
    }
}
