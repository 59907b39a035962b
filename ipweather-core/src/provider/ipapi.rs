use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{LookupError, Step},
    model::{Address, Coordinates},
    provider::status_detail,
};

use super::Geolocator;

pub const DEFAULT_BASE_URL: &str = "https://ipapi.co";

/// Geolocation through ipapi's plain-text `/<ip>/latlong/` endpoint.
#[derive(Debug, Clone)]
pub struct IpapiGeolocator {
    http: Client,
    base_url: String,
}

impl IpapiGeolocator {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn latlong_url(&self, address: &Address) -> String {
        format!("{}/{}/latlong/", self.base_url, address)
    }

    async fn fetch(&self, address: &Address) -> Result<Coordinates, LookupError> {
        let url = self.latlong_url(address);
        tracing::debug!(%url, "requesting coordinates");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::network(Step::Geolocation, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| LookupError::network(Step::Geolocation, e))?;

        if !status.is_success() {
            return Err(LookupError::network(
                Step::Geolocation,
                status_detail(status, &body),
            ));
        }

        Coordinates::parse_latlong(&body)
    }
}

#[async_trait]
impl Geolocator for IpapiGeolocator {
    async fn locate(&self, address: &Address) -> Result<Coordinates, LookupError> {
        match self.fetch(address).await {
            Ok(coords) => {
                tracing::debug!(
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    "located address"
                );
                Ok(coords)
            }
            Err(err) => {
                tracing::error!(error = %err, "geolocation failed");
                Err(err)
            }
        }
    }
}
