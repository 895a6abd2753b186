//! Core library for the `weather-lookup` widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider behind the [`WeatherProvider`] seam
//! - The widget state machine (query, result, error)
//! - A pure render function producing a [`WeatherView`]
//!
//! It is used by `weather-lookup-cli`, but the widget and view carry no
//! terminal assumptions and can be hosted elsewhere.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod view;
pub mod widget;

pub use config::Config;
pub use error::{EMPTY_INPUT_MESSAGE, FETCH_FAILED_MESSAGE, WeatherError};
pub use model::WeatherResult;
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use view::{WeatherCard, WeatherView, render};
pub use widget::{SearchPhase, SearchTicket, WeatherWidget};
