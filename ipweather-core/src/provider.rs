use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt::Debug;

use crate::{
    Config,
    error::LookupError,
    model::{Address, Coordinates, WeatherResult},
    provider::{ipapi::IpapiGeolocator, ipify::IpifyResolver, openweather::OpenWeatherFetcher},
};

pub mod ipapi;
pub mod ipify;
pub mod openweather;

const USER_AGENT: &str = concat!("ipweather/", env!("CARGO_PKG_VERSION"));

/// Finds the caller's public IP address.
#[async_trait]
pub trait IpResolver: Send + Sync + Debug {
    async fn resolve(&self) -> Result<Address, LookupError>;
}

/// Maps an IP address to coordinates.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self, address: &Address) -> Result<Coordinates, LookupError>;
}

/// Fetches current conditions for a coordinate pair.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn current(&self, coords: Coordinates) -> Result<WeatherResult, LookupError>;
}

/// The three production steps, built from one shared HTTP client.
#[derive(Debug)]
pub struct Providers {
    pub ip: Box<dyn IpResolver>,
    pub geo: Box<dyn Geolocator>,
    pub weather: Box<dyn WeatherFetcher>,
}

impl Providers {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = http_client()?;

        if config.api_key.is_none() {
            tracing::warn!(
                "No OpenWeather API key configured; sending \"null\". \
                 Run `ipweather configure` or set OPENWEATHER_API_KEY."
            );
        }

        Ok(Self {
            ip: Box::new(IpifyResolver::new(http.clone(), &config.endpoints.ip_echo)),
            geo: Box::new(IpapiGeolocator::new(
                http.clone(),
                &config.endpoints.geolocation,
            )),
            weather: Box::new(OpenWeatherFetcher::new(
                http,
                &config.endpoints.weather,
                config.api_key_or_null(),
            )),
        })
    }
}

/// Client shared by all steps. No timeout beyond reqwest's defaults.
pub fn http_client() -> anyhow::Result<Client> {
    use anyhow::Context;

    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Human-readable detail for a non-success response.
pub(crate) fn status_detail(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("request failed with status {status}")
    } else {
        format!(
            "request failed with status {status}: {}",
            truncate_body(body)
        )
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn status_detail_includes_status_and_body() {
        let detail = status_detail(StatusCode::TOO_MANY_REQUESTS, " slow down \n");
        assert_eq!(
            detail,
            "request failed with status 429 Too Many Requests: slow down"
        );

        let detail = status_detail(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(
            detail,
            "request failed with status 500 Internal Server Error"
        );
    }

    #[test]
    fn providers_from_default_config() {
        let providers = Providers::from_config(&Config::default());
        assert!(providers.is_ok());
    }
}
