use thiserror::Error;

/// Shown when a search is started with an empty or whitespace-only query.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a city name";

/// Shown for every failure that happens once a request has been attempted.
pub const FETCH_FAILED_MESSAGE: &str = "Could not fetch weather. Check the city name.";

/// Everything that can go wrong during one search.
///
/// Only [`WeatherError::EmptyInput`] keeps its own user-facing text; every
/// other kind collapses to [`FETCH_FAILED_MESSAGE`]. The detailed `Display`
/// output is meant for logs.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{}", EMPTY_INPUT_MESSAGE)]
    EmptyInput,

    /// The API answered with a non-success status.
    #[error("Weather service rejected the request with status {status}: {message}")]
    RemoteRejection { status: u16, message: String },

    /// The API answered with a success status but an unusable body.
    #[error("Invalid weather data received: {0}")]
    MalformedResponse(String),

    #[error("Failed to reach the weather service: {0}")]
    Transport(#[from] reqwest::Error),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::EmptyInput => EMPTY_INPUT_MESSAGE,
            WeatherError::RemoteRejection { .. }
            | WeatherError::MalformedResponse(_)
            | WeatherError::Transport(_) => FETCH_FAILED_MESSAGE,
        }
    }
}
