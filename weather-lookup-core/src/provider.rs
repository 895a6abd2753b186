use crate::{Config, WeatherError, WeatherResult, provider::openweather::OpenWeatherProvider};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod openweather;

/// Source of current weather for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for `city`. `city` is expected to be non-blank.
    async fn current_weather(&self, city: &str) -> Result<WeatherResult, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;

    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    let http = builder.build().context("Failed to initialize HTTP client")?;

    let provider = OpenWeatherProvider::new(api_key.to_owned())
        .with_base_url(config.base_url.clone())
        .with_client(http);

    Ok(Box::new(provider))
}
