use serde::{Deserialize, Serialize};

/// Display-ready weather snapshot for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    /// Place name as resolved by the weather service.
    pub city: String,
    /// Already converted to Celsius by the service (`units=metric`).
    pub temperature_c: f64,
    /// Relative humidity as reported; may be fractional.
    pub humidity_pct: f64,
    pub description: String,
    pub icon_code: String,
}

impl WeatherResult {
    /// Icon image address on the icon CDN, `<base>/<code>@2x.png`.
    pub fn icon_url(&self, icon_base_url: &str) -> String {
        format!("{}/{}@2x.png", icon_base_url.trim_end_matches('/'), self.icon_code)
    }
}
