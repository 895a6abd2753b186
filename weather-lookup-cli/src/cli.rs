use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use weather_lookup_core::{
    Config, WeatherProvider, WeatherView, WeatherWidget, provider_from_config, render,
};

use crate::session;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-lookup", version, about = "Look up current weather by city")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Defaults to the interactive session.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Settings that take precedence over the config file.
#[derive(Debug, Args)]
pub struct Overrides {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// OpenWeather API key.
    #[arg(long, global = true, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Weather API root, e.g. "https://api.openweathermap.org/data/2.5".
    #[arg(long, global = true, env = "OPENWEATHER_BASE_URL")]
    pub base_url: Option<String>,

    /// Icon CDN root, e.g. "https://openweathermap.org/img/wn".
    #[arg(long, global = true)]
    pub icon_base_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and endpoints in the config file.
    Configure {
        /// HTTP timeout in seconds for weather requests.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Show current weather for a city.
    Show {
        /// City name.
        city: String,

        /// Print the rendered view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Type a city per line; `:q` or end of input to quit.
    Interactive,
}

impl Overrides {
    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    fn apply(&self, config: &mut Config) {
        if let Some(key) = &self.api_key {
            config.set_api_key(key.clone());
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(url) = &self.icon_base_url {
            config.icon_base_url = url.clone();
        }
    }

    fn save_config(&self, config: &Config) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => {
                config.save_to(path)?;
                Ok(path.clone())
            }
            None => config.save(),
        }
    }

    /// Config file merged with the command-line and environment overrides.
    fn effective_config(&self) -> anyhow::Result<Config> {
        let mut config = self.load_config()?;
        self.apply(&mut config);
        Ok(config)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure { timeout_secs } => {
                configure(&self.overrides, timeout_secs)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, json } => show(&self.overrides, city, json).await,
            Command::Interactive => {
                let config = self.overrides.effective_config()?;
                let provider = Arc::from(provider_from_config(&config)?);
                session::run(provider, config.icon_base_url).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn configure(overrides: &Overrides, timeout_secs: Option<u64>) -> anyhow::Result<()> {
    let mut config = overrides.effective_config()?;

    if overrides.api_key.is_none() {
        let key = inquire::Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?;
        config.set_api_key(key.trim().to_string());
    }
    if timeout_secs.is_some() {
        config.timeout_secs = timeout_secs;
    }

    config.require_api_key()?;
    let path = overrides.save_config(&config)?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

/// One search; blank input is rejected before a provider is needed.
async fn show(overrides: &Overrides, city: String, json: bool) -> anyhow::Result<ExitCode> {
    let config = overrides.effective_config()?;

    let mut widget = WeatherWidget::new();
    widget.set_query(city);

    if let Some(ticket) = widget.begin_search() {
        let provider = provider_from_config(&config)?;
        let outcome = provider.current_weather(ticket.city()).await;
        widget.complete(&ticket, outcome);
    }

    let view = render(&widget, &config.icon_base_url);
    print_view(&view, json)?;

    Ok(if view.error_banner.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_view(view: &WeatherView, json: bool) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(view).context("Failed to serialize view")?;
        println!("{out}");
    } else {
        print!("{view}");
    }
    Ok(())
}
