use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{WeatherError, WeatherResult, config::DEFAULT_BASE_URL};

use super::WeatherProvider;

/// Used when a failure body has no usable `message`.
const FALLBACK_REJECTION_MESSAGE: &str = "City not found";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the provider at another API root, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_current(&self, city: &str) -> Result<WeatherResult, WeatherError> {
        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));

        debug!("requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::RemoteRejection {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::MalformedResponse(format!(
                "Failed to parse OpenWeather current JSON: {e} (body: {})",
                truncate_body(&body)
            ))
        })?;

        parsed.into_result()
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

/// `main` and `weather` are optional so their absence can be told apart
/// from a body that is not weather JSON at all. Only those two blocks are
/// required; a missing `name` renders as an empty place name.
#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
}

impl OwCurrentResponse {
    fn into_result(self) -> Result<WeatherResult, WeatherError> {
        let main = self
            .main
            .ok_or_else(|| WeatherError::MalformedResponse("missing `main` block".to_string()))?;

        let conditions = self
            .weather
            .and_then(|list| list.into_iter().next())
            .ok_or_else(|| {
                WeatherError::MalformedResponse("missing or empty `weather` block".to_string())
            })?;

        Ok(WeatherResult {
            city: self.name,
            temperature_c: main.temp,
            humidity_pct: main.humidity,
            description: conditions.description,
            icon_code: conditions.icon,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherResult, WeatherError> {
        self.fetch_current(city).await
    }
}

fn rejection_message(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| FALLBACK_REJECTION_MESSAGE.to_string())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<WeatherResult, WeatherError> {
        serde_json::from_str::<OwCurrentResponse>(body)
            .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?
            .into_result()
    }

    #[test]
    fn extracts_the_five_display_fields() {
        let body = r#"{
            "name": "Paris",
            "main": {"temp": 18.5, "feels_like": 17.9, "humidity": 60},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "dt": 1700000000
        }"#;

        let result = parse(body).expect("well-formed body");
        assert_eq!(
            result,
            WeatherResult {
                city: "Paris".to_string(),
                temperature_c: 18.5,
                humidity_pct: 60.0,
                description: "clear sky".to_string(),
                icon_code: "01d".to_string(),
            }
        );
    }

    #[test]
    fn uses_first_weather_entry() {
        let body = r#"{
            "name": "Oslo",
            "main": {"temp": -2, "humidity": 80},
            "weather": [
                {"description": "light snow", "icon": "13n"},
                {"description": "mist", "icon": "50n"}
            ]
        }"#;

        let result = parse(body).expect("well-formed body");
        assert_eq!(result.description, "light snow");
        assert_eq!(result.icon_code, "13n");
        assert_eq!(result.temperature_c, -2.0);
    }

    #[test]
    fn fractional_humidity_is_accepted() {
        let body = r#"{
            "name": "Lima",
            "main": {"temp": 21.0, "humidity": 60.5},
            "weather": [{"description": "mist", "icon": "50d"}]
        }"#;

        let result = parse(body).expect("well-formed body");
        assert_eq!(result.humidity_pct, 60.5);
    }

    #[test]
    fn whole_float_humidity_is_accepted() {
        let body = r#"{
            "name": "Lima",
            "main": {"temp": 21.0, "humidity": 60.0},
            "weather": [{"description": "mist", "icon": "50d"}]
        }"#;

        assert_eq!(parse(body).expect("well-formed body").humidity_pct, 60.0);
    }

    #[test]
    fn missing_name_is_not_malformed() {
        let body = r#"{
            "main": {"temp": 3.5, "humidity": 70},
            "weather": [{"description": "overcast clouds", "icon": "04n"}]
        }"#;

        let result = parse(body).expect("name is optional");
        assert_eq!(result.city, "");
        assert_eq!(result.description, "overcast clouds");
    }

    #[test]
    fn missing_main_is_malformed() {
        let body = r#"{"name": "Paris", "weather": [{"description": "x", "icon": "01d"}]}"#;
        let err = parse(body).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(ref m) if m.contains("main")));
    }

    #[test]
    fn missing_or_empty_weather_is_malformed() {
        let missing = r#"{"name": "Paris", "main": {"temp": 1.0, "humidity": 2}}"#;
        let empty = r#"{"name": "Paris", "main": {"temp": 1.0, "humidity": 2}, "weather": []}"#;

        assert!(matches!(parse(missing), Err(WeatherError::MalformedResponse(_))));
        assert!(matches!(parse(empty), Err(WeatherError::MalformedResponse(_))));
    }

    #[test]
    fn rejection_message_prefers_body_message() {
        assert_eq!(
            rejection_message(r#"{"cod": "404", "message": "city not found"}"#),
            "city not found"
        );
    }

    #[test]
    fn rejection_message_falls_back() {
        assert_eq!(rejection_message(r#"{"cod": "500"}"#), "City not found");
        assert_eq!(rejection_message(r#"{"message": ""}"#), "City not found");
        assert_eq!(rejection_message("<html>bad gateway</html>"), "City not found");
    }

    #[test]
    fn truncate_body_limits_long_bodies() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
