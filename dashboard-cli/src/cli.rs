use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dashboard_core::{Config, DashboardController, Phase, PlaceCandidate, SessionState, provider};
use inquire::{InquireError, Password, Select, Text};
use std::fmt;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather for a city name.
    Show {
        /// City name, optionally with a country code ("Paris,FR").
        city: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show weather for the device position from the config file.
    Here {
        #[arg(long)]
        json: bool,
    },

    /// List place suggestions for partial text.
    Suggest {
        text: String,
    },

    /// List popular cities, or show weather for one of them.
    Popular {
        /// 1-based position in the list.
        index: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Search, pick and refresh interactively.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json } => {
                let ctrl = controller()?;
                ctrl.search_typed(&city).await;
                finish(&ctrl.state(), json)
            }
            Command::Here { json } => {
                let ctrl = controller()?;
                ctrl.use_current_location().await;
                finish(&ctrl.state(), json)
            }
            Command::Suggest { text } => suggest(&text).await,
            Command::Popular { index: None, .. } => {
                let config = Config::load()?;
                print!("{}", render::candidates(&config.popular_cities()));
                Ok(())
            }
            Command::Popular { index: Some(index), json } => {
                let ctrl = controller()?;
                let loaded = match index.checked_sub(1) {
                    Some(i) => ctrl.select_popular(i).await,
                    None => false,
                };
                if !loaded {
                    bail!(
                        "No popular city #{index}. Run `weather-dashboard popular` to see the list."
                    );
                }
                finish(&ctrl.state(), json)
            }
            Command::Interactive => interactive(&controller()?).await,
        }
    }
}

fn controller() -> Result<DashboardController> {
    let config = Config::load()?;
    tracing::debug!(
        api_base = config.api_base.as_deref().unwrap_or(provider::openweather::DEFAULT_BASE_URL),
        "Building dashboard controller"
    );
    DashboardController::from_config(&config)
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty.");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Print the dashboard; a final error phase becomes a non-zero exit.
fn finish(state: &SessionState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&render::json(state))?);
    } else {
        print!("{}", render::dashboard(state));
    }

    match state.error() {
        Some(err) => bail!("{}", err),
        None => Ok(()),
    }
}

async fn suggest(text: &str) -> Result<()> {
    if !provider::is_searchable(text) {
        println!("Type at least {} characters to get suggestions.", provider::MIN_QUERY_CHARS);
        return Ok(());
    }

    let ctrl = controller()?;
    ctrl.edit_query(text).await;

    let state = ctrl.state();
    if state.suggestions_visible {
        print!("{}", render::candidates(&state.candidates));
    } else {
        println!("No suggestions for '{text}'.");
    }

    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Search,
    Popular,
    CurrentLocation,
    Retry,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::Search => "Search for a city",
            MenuItem::Popular => "Popular cities",
            MenuItem::CurrentLocation => "Use current location",
            MenuItem::Retry => "Retry",
            MenuItem::Quit => "Quit",
        })
    }
}

enum Pick {
    Candidate(PlaceCandidate),
    Exact(String),
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pick::Candidate(candidate) => write!(f, "{candidate}"),
            Pick::Exact(text) => write!(f, "Search for \"{text}\""),
        }
    }
}

async fn interactive(ctrl: &DashboardController) -> Result<()> {
    loop {
        let mut menu = vec![MenuItem::Search, MenuItem::Popular, MenuItem::CurrentLocation];
        if matches!(ctrl.state().phase, Phase::Error(_)) {
            menu.push(MenuItem::Retry);
        }
        menu.push(MenuItem::Quit);

        let Some(item) = cancellable(Select::new("What next?", menu).prompt())? else {
            return Ok(());
        };

        match item {
            MenuItem::Search => {
                let Some(text) = cancellable(Text::new("City:").prompt())? else {
                    continue;
                };
                search_with_suggestions(ctrl, &text).await?;
            }
            MenuItem::Popular => {
                let cities = ctrl.popular_cities().to_vec();
                let Some(city) = cancellable(Select::new("City:", cities).prompt())? else {
                    continue;
                };
                ctrl.select_candidate(city).await;
            }
            MenuItem::CurrentLocation => ctrl.use_current_location().await,
            MenuItem::Retry => ctrl.retry().await,
            MenuItem::Quit => return Ok(()),
        }

        println!();
        print!("{}", render::dashboard(&ctrl.state()));
        println!();
    }
}

async fn search_with_suggestions(ctrl: &DashboardController, text: &str) -> Result<()> {
    ctrl.edit_query(text).await;

    let state = ctrl.state();
    if !state.suggestions_visible {
        ctrl.search_typed(text).await;
        return Ok(());
    }

    let mut picks: Vec<Pick> = state.candidates.into_iter().map(Pick::Candidate).collect();
    picks.push(Pick::Exact(text.trim().to_string()));

    match cancellable(Select::new("Did you mean:", picks).prompt())? {
        Some(Pick::Candidate(candidate)) => ctrl.select_candidate(candidate).await,
        Some(Pick::Exact(name)) => ctrl.search_typed(&name).await,
        None => {}
    }

    Ok(())
}

/// Escape or Ctrl-C on a prompt yields `None` instead of an error.
fn cancellable<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Prompt failed"),
    }
}
