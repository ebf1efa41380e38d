use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::{io, process::ExitCode};
use tracing::info;
use weather_core::{ApiKey, Config, OpenWeatherProvider, Units, WeatherProvider, WeatherReport};

use crate::{
    prompter::{InquirePrompter, Prompter},
    session::{self, SessionEnd},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather from OpenWeatherMap")]
pub struct Cli {
    /// Without a subcommand, start the interactive session.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an OpenWeatherMap API key in the config file.
    Configure,

    /// Show current weather for a single city and exit.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,

        /// "C" or "F"; prompts when absent.
        #[arg(long, short)]
        units: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        let mut prompter = InquirePrompter::new();

        match self.command {
            None => {
                let provider = OpenWeatherProvider::new()?;
                let mut out = io::stdout();

                let end =
                    session::start(ApiKey::load(), &provider, &mut prompter, &mut out).await?;

                Ok(match end {
                    SessionEnd::Farewell => ExitCode::SUCCESS,
                    SessionEnd::MissingCredential => ExitCode::FAILURE,
                })
            }
            Some(Command::Configure) => {
                configure(&mut prompter)?;
                Ok(ExitCode::SUCCESS)
            }
            Some(Command::Show { city, units }) => {
                let api_key = ApiKey::load()?;
                let provider = OpenWeatherProvider::new()?;

                show(&provider, &api_key, &city, units.as_deref(), &mut prompter).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn configure<P: Prompter>(prompter: &mut P) -> Result<()> {
    let key = prompter
        .secret("OpenWeatherMap API key:")?
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| anyhow!("No API key entered; configuration unchanged."))?;

    let mut config = Config::load()?;
    config.set_api_key(key);
    let path = config.save()?;

    info!(path = %path.display(), "saved API key");
    println!("API key saved to {}", path.display());
    Ok(())
}

async fn show<P: Prompter>(
    provider: &dyn WeatherProvider,
    api_key: &ApiKey,
    city: &str,
    units: Option<&str>,
    prompter: &mut P,
) -> Result<()> {
    let mut out = io::stdout();

    let units = match units {
        Some(choice) => Units::from_choice(choice)
            .ok_or_else(|| anyhow!("Unknown units '{choice}'. Use C or F."))?,
        None => match session::select_units(prompter, &mut out)? {
            Some(units) => units,
            None => bail!("No units selected."),
        },
    };

    let data = provider
        .current_weather(city, api_key, units)
        .await
        .with_context(|| format!("Failed to fetch weather for '{city}'"))?;

    WeatherReport::from_json(&data).render(&mut out, units.symbol())?;
    Ok(())
}
