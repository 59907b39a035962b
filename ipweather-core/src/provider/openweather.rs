use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{LookupError, Step},
    model::{Coordinates, WeatherResult, kelvin_to_celsius},
};

use super::WeatherFetcher;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeather current-conditions endpoint. Temperatures arrive in Kelvin.
#[derive(Debug, Clone)]
pub struct OpenWeatherFetcher {
    http: Client,
    url: String,
    api_key: String,
}

impl OpenWeatherFetcher {
    pub fn new(http: Client, url: &str, api_key: impl Into<String>) -> Self {
        Self {
            http,
            url: url.to_string(),
            api_key: api_key.into(),
        }
    }

    async fn fetch(&self, coords: Coordinates) -> Result<WeatherResult, LookupError> {
        tracing::debug!(url = %self.url, "requesting current weather");

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| LookupError::network(Step::Weather, e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(LookupError::WeatherProvider {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = res
            .text()
            .await
            .map_err(|e| LookupError::network(Step::Weather, e))?;

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| LookupError::parse(Step::Weather, e))?;

        parsed.into_result()
    }
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    weather: Vec<OwWeather>,
    main: OwMain,
}

impl OwCurrentResponse {
    fn into_result(self) -> Result<WeatherResult, LookupError> {
        let icon = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.icon)
            .ok_or_else(|| LookupError::parse(Step::Weather, "no weather conditions listed"))?;

        Ok(WeatherResult {
            city: self.name,
            country_code: self.sys.country,
            condition_icon_id: icon,
            temperature_celsius: kelvin_to_celsius(self.main.temp),
        })
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherFetcher {
    async fn current(&self, coords: Coordinates) -> Result<WeatherResult, LookupError> {
        match self.fetch(coords).await {
            Ok(result) => {
                tracing::info!(city = %result.city, temp = %result.temperature_display(), "fetched weather");
                Ok(result)
            }
            Err(err) => {
                tracing::error!(error = %err, "weather lookup failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_response() {
        let body = r#"{
            "name": "Springfield",
            "sys": { "country": "US", "sunrise": 1 },
            "weather": [{ "id": 800, "icon": "01d" }, { "icon": "02d" }],
            "main": { "temp": 300, "humidity": 40 }
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(body).unwrap();
        let result = parsed.into_result().unwrap();

        assert_eq!(result.city, "Springfield");
        assert_eq!(result.country_code, "US");
        assert_eq!(result.condition_icon_id, "01d");
        assert_eq!(result.temperature_display(), "26.85");
    }

    #[test]
    fn empty_weather_list_is_a_parse_error() {
        let body = r#"{"name":"X","sys":{"country":"FR"},"weather":[],"main":{"temp":280.0}}"#;

        let parsed: OwCurrentResponse = serde_json::from_str(body).unwrap();
        let err = parsed.into_result().unwrap_err();

        assert!(matches!(err, LookupError::Parse { step: Step::Weather, .. }));
    }
}
