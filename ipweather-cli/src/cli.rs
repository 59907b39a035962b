use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use ipweather_core::{Config, Orchestrator, UiState};
use std::process::ExitCode;
use tokio::sync::watch;

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "ipweather",
    version,
    about = "Current weather wherever your public IP says you are"
)]
pub struct Cli {
    /// Defaults to `show`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Look up your location and show the current weather.
    Show {
        /// API key for this run only; overrides config and OPENWEATHER_API_KEY.
        #[arg(long)]
        api_key: Option<String>,

        /// Print the final state as JSON instead of a card.
        #[arg(long)]
        json: bool,
    },

    /// Print where the config file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command.unwrap_or(Command::Show {
            api_key: None,
            json: false,
        }) {
            Command::Configure => configure(),
            Command::Show { api_key, json } => show(api_key, json).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut cfg = Config::load_file()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    cfg.set_api_key(api_key.to_string());
    let path = cfg.save()?;

    println!("Saved to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

async fn show(api_key: Option<String>, json: bool) -> anyhow::Result<ExitCode> {
    let config = Config::load()?.with_api_key_override(api_key);
    tracing::debug!(
        api_key_set = config.api_key.is_some(),
        endpoints = ?config.endpoints,
        "loaded configuration"
    );

    let orchestrator = Orchestrator::from_config(&config)?;

    let renderer = (!json).then(|| {
        tokio::spawn(follow(orchestrator.subscribe(), |text| println!("{text}")))
    });

    let state = orchestrator.run().await;
    // Closing the channel ends the renderer.
    drop(orchestrator);

    if let Some(renderer) = renderer {
        renderer.await?;
    } else {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }

    Ok(match state {
        UiState::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

/// Emit the rendering of every distinct state until the orchestrator goes away.
async fn follow(mut rx: watch::Receiver<UiState>, mut emit: impl FnMut(String)) {
    let mut shown = rx.borrow_and_update().clone();
    emit(render(&shown));

    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        if state != shown {
            emit(render(&state));
            shown = state;
        }
    }

    let last = rx.borrow().clone();
    if last != shown {
        emit(render(&last));
    }
}
