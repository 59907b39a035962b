use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{LookupError, Step},
    model::Address,
    provider::status_detail,
};

use super::IpResolver;

pub const DEFAULT_BASE_URL: &str = "https://api64.ipify.org";

/// IP echo service answering `{"ip": "..."}`.
#[derive(Debug, Clone)]
pub struct IpifyResolver {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct IpifyResponse {
    ip: String,
}

impl IpifyResolver {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    async fn fetch(&self) -> Result<Address, LookupError> {
        tracing::debug!(url = %self.base_url, "requesting public IP address");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("format", "json")])
            .send()
            .await
            .map_err(|e| LookupError::network(Step::IpLookup, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| LookupError::network(Step::IpLookup, e))?;

        if !status.is_success() {
            return Err(LookupError::network(
                Step::IpLookup,
                status_detail(status, &body),
            ));
        }

        let parsed: IpifyResponse =
            serde_json::from_str(&body).map_err(|e| LookupError::parse(Step::IpLookup, e))?;

        Address::new(parsed.ip).ok_or_else(|| {
            LookupError::network(Step::IpLookup, "IP echo service returned an empty address")
        })
    }
}

#[async_trait]
impl IpResolver for IpifyResolver {
    async fn resolve(&self) -> Result<Address, LookupError> {
        match self.fetch().await {
            Ok(address) => {
                tracing::debug!(%address, "resolved public IP address");
                Ok(address)
            }
            Err(err) => {
                tracing::error!(error = %err, "IP lookup failed");
                Err(err)
            }
        }
    }
}
