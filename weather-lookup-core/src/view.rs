use serde::Serialize;
use std::fmt;

use crate::widget::{SearchPhase, WeatherWidget};

pub const TITLE: &str = "Weather App";
pub const SEARCH_PROMPT: &str = "Enter city name";

/// Everything the widget shows, derived from its state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub title: &'static str,
    pub prompt: &'static str,
    pub query: String,
    /// A request is in flight; neither block below is shown.
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<WeatherCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherCard {
    pub city: String,
    pub icon_url: String,
    pub temperature: String,
    pub humidity: String,
    pub description: String,
}

pub fn render(widget: &WeatherWidget, icon_base_url: &str) -> WeatherView {
    let card = widget.result().map(|result| WeatherCard {
        city: result.city.clone(),
        icon_url: result.icon_url(icon_base_url),
        temperature: format!("{} °C", result.temperature_c),
        humidity: format!("{} %", result.humidity_pct),
        description: result.description.clone(),
    });

    WeatherView {
        title: TITLE,
        prompt: SEARCH_PROMPT,
        query: widget.query().to_string(),
        loading: widget.phase() == SearchPhase::Fetching,
        error_banner: widget.error().map(str::to_string),
        card,
    }
}

impl fmt::Display for WeatherView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}: {}", self.prompt, self.query)?;

        if self.loading {
            writeln!(f, "Searching...")?;
        }

        if let Some(error) = &self.error_banner {
            writeln!(f, "! {error}")?;
        }

        if let Some(card) = &self.card {
            writeln!(f, "{}", card.city)?;
            writeln!(f, "  Icon: {}", card.icon_url)?;
            writeln!(f, "  Temperature: {}", card.temperature)?;
            writeln!(f, "  Humidity: {}", card.humidity)?;
            writeln!(f, "  Description: {}", card.description)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WeatherError, WeatherResult};

    const ICONS: &str = "https://openweathermap.org/img/wn";

    fn widget_with(outcome: Result<WeatherResult, WeatherError>) -> WeatherWidget {
        let mut widget = WeatherWidget::new();
        widget.set_query("Paris");
        let ticket = widget.begin_search().expect("ticket");
        widget.complete(&ticket, outcome);
        widget
    }

    fn paris() -> WeatherResult {
        WeatherResult {
            city: "Paris".to_string(),
            temperature_c: 18.5,
            humidity_pct: 60.0,
            description: "clear sky".to_string(),
            icon_code: "01d".to_string(),
        }
    }

    #[test]
    fn initial_view_has_neither_block() {
        let view = render(&WeatherWidget::new(), ICONS);

        assert_eq!(view.title, "Weather App");
        assert!(!view.loading);
        assert!(view.error_banner.is_none());
        assert!(view.card.is_none());
    }

    #[test]
    fn fetching_view_has_neither_block() {
        let mut widget = WeatherWidget::new();
        widget.set_query("Paris");
        widget.begin_search();

        let view = render(&widget, ICONS);
        assert!(view.loading);
        assert!(view.error_banner.is_none());
        assert!(view.card.is_none());
    }

    #[test]
    fn success_view_shows_card_with_units() {
        let view = render(&widget_with(Ok(paris())), ICONS);

        let card = view.card.expect("card");
        assert_eq!(card.city, "Paris");
        assert_eq!(card.icon_url, "https://openweathermap.org/img/wn/01d@2x.png");
        assert_eq!(card.temperature, "18.5 °C");
        assert_eq!(card.humidity, "60 %");
        assert_eq!(card.description, "clear sky");
        assert!(view.error_banner.is_none());
    }

    #[test]
    fn whole_degrees_render_without_fraction() {
        let result = WeatherResult {
            temperature_c: 18.0,
            ..paris()
        };
        let view = render(&widget_with(Ok(result)), ICONS);

        assert_eq!(view.card.expect("card").temperature, "18 °C");
    }

    #[test]
    fn humidity_renders_whole_and_fractional_values() {
        let whole = render(&widget_with(Ok(paris())), ICONS);
        assert_eq!(whole.card.expect("card").humidity, "60 %");

        let result = WeatherResult {
            humidity_pct: 60.5,
            ..paris()
        };
        let fractional = render(&widget_with(Ok(result)), ICONS);
        assert_eq!(fractional.card.expect("card").humidity, "60.5 %");
    }

    #[test]
    fn failure_view_shows_banner_only() {
        let view = render(
            &widget_with(Err(WeatherError::MalformedResponse("x".into()))),
            ICONS,
        );

        assert_eq!(
            view.error_banner.as_deref(),
            Some("Could not fetch weather. Check the city name.")
        );
        assert!(view.card.is_none());
    }

    #[test]
    fn text_rendering_lists_card_lines() {
        let text = render(&widget_with(Ok(paris())), ICONS).to_string();

        assert!(text.starts_with("Weather App\n"));
        assert!(text.contains("Enter city name: Paris\n"));
        assert!(text.contains("Temperature: 18.5 °C"));
        assert!(text.contains("Humidity: 60 %"));
        assert!(text.contains("Description: clear sky"));
        assert!(!text.contains("! "));
    }

    #[test]
    fn json_rendering_omits_absent_blocks() {
        let view = render(&WeatherWidget::new(), ICONS);
        let json = serde_json::to_value(&view).expect("serialize");

        assert_eq!(json["title"], "Weather App");
        assert!(json.get("card").is_none());
        assert!(json.get("error_banner").is_none());
    }
}
