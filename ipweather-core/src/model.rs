use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LookupError;

const KELVIN_OFFSET: f64 = 273.15;

/// The caller's public IP address as reported by the echo service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    /// Returns `None` for an empty (or whitespace-only) address.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Parse a plain-text `"<lat>,<lon>"` body.
    ///
    /// Anything other than exactly two finite decimal fields within
    /// latitude/longitude range is rejected with [`LookupError::Geolocation`].
    pub fn parse_latlong(body: &str) -> Result<Self, LookupError> {
        let fields: Vec<&str> = body.trim().split(',').map(str::trim).collect();

        let [lat, lon] = fields.as_slice() else {
            return Err(LookupError::Geolocation(format!(
                "expected \"<latitude>,<longitude>\", got {} field(s) in {:?}",
                fields.len(),
                body.trim(),
            )));
        };

        let parse = |name: &str, value: &str, limit: f64| -> Result<f64, LookupError> {
            let degrees = value
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite())
                .ok_or_else(|| {
                    LookupError::Geolocation(format!("{name} {value:?} is not a decimal number"))
                })?;

            if degrees.abs() > limit {
                return Err(LookupError::Geolocation(format!(
                    "{name} {degrees} is outside [-{limit}, {limit}]"
                )));
            }

            Ok(degrees)
        };

        Ok(Self {
            latitude: parse("latitude", *lat, 90.0)?,
            longitude: parse("longitude", *lon, 180.0)?,
        })
    }
}

/// Current conditions at the caller's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    pub country_code: String,
    pub condition_icon_id: String,
    /// Rounded to two decimals.
    pub temperature_celsius: f64,
}

impl WeatherResult {
    /// Hosted image for the condition icon, e.g. `01d`.
    pub fn icon_url(&self) -> String {
        format!(
            "https://openweathermap.org/img/wn/{}@2x.png",
            self.condition_icon_id
        )
    }

    /// Temperature formatted with exactly two decimals.
    pub fn temperature_display(&self) -> String {
        format!("{:.2}", self.temperature_celsius)
    }
}

impl fmt::Display for WeatherResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}: {}°C ({})",
            self.city,
            self.country_code,
            self.temperature_display(),
            self.condition_icon_id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
}

impl From<&LookupError> for ErrorInfo {
    fn from(err: &LookupError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// What the presentation layer shows. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UiState {
    #[default]
    Loading,
    Succeeded(WeatherResult),
    Failed(ErrorInfo),
}

impl UiState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UiState::Loading)
    }
}

/// Kelvin to Celsius, rounded to two decimal places.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    ((kelvin - KELVIN_OFFSET) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_rejects_blank() {
        assert!(Address::new("").is_none());
        assert!(Address::new("   \n").is_none());
        assert_eq!(Address::new(" 8.8.8.8\n").unwrap().as_str(), "8.8.8.8");
    }

    #[test]
    fn parse_latlong_accepts_two_fields() {
        let coords = Coordinates::parse_latlong("37.751,-97.822\n").unwrap();
        assert_eq!(coords.latitude, 37.751);
        assert_eq!(coords.longitude, -97.822);
    }

    #[test]
    fn parse_latlong_rejects_empty_body() {
        let err = Coordinates::parse_latlong("").unwrap_err();
        assert!(matches!(err, LookupError::Geolocation(_)));
        assert!(err.to_string().contains("1 field(s)"));
    }

    #[test]
    fn parse_latlong_rejects_extra_fields() {
        let err = Coordinates::parse_latlong("1.0,2.0,3.0").unwrap_err();
        assert!(err.to_string().contains("3 field(s)"));
    }

    #[test]
    fn parse_latlong_rejects_non_numeric() {
        let err = Coordinates::parse_latlong("Undefined,Undefined").unwrap_err();
        assert!(matches!(err, LookupError::Geolocation(_)));
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn parse_latlong_rejects_non_finite() {
        let err = Coordinates::parse_latlong("NaN,inf").unwrap_err();
        assert!(matches!(err, LookupError::Geolocation(_)));
        assert!(err.to_string().contains("latitude \"NaN\""));

        let err = Coordinates::parse_latlong("12.5,-infinity").unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }

    #[test]
    fn parse_latlong_rejects_out_of_range() {
        let err = Coordinates::parse_latlong("999,-500").unwrap_err();
        assert!(matches!(err, LookupError::Geolocation(_)));
        assert!(err.to_string().contains("latitude 999 is outside [-90, 90]"));

        let err = Coordinates::parse_latlong("45,-500").unwrap_err();
        assert!(err.to_string().contains("longitude -500 is outside [-180, 180]"));
    }

    #[test]
    fn parse_latlong_accepts_range_bounds() {
        let coords = Coordinates::parse_latlong("-90,180").unwrap();
        assert_eq!(coords.latitude, -90.0);
        assert_eq!(coords.longitude, 180.0);
    }

    #[test]
    fn kelvin_conversion_rounds_to_two_decimals() {
        assert_eq!(kelvin_to_celsius(300.0), 26.85);
        assert_eq!(kelvin_to_celsius(273.15), 0.0);
        assert_eq!(kelvin_to_celsius(288.123), 14.97);
    }

    #[test]
    fn temperature_display_keeps_trailing_zeros() {
        let result = WeatherResult {
            city: "Oslo".into(),
            country_code: "NO".into(),
            condition_icon_id: "13n".into(),
            temperature_celsius: kelvin_to_celsius(283.15),
        };

        assert_eq!(result.temperature_display(), "10.00");
        assert_eq!(
            result.icon_url(),
            "https://openweathermap.org/img/wn/13n@2x.png"
        );
    }

    #[test]
    fn ui_state_serializes_with_tag() {
        let state = UiState::Failed(ErrorInfo {
            message: "boom".into(),
        });
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["message"], "boom");
        assert!(!UiState::Loading.is_terminal());
    }
}
