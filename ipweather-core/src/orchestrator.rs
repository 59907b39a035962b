//! Sequential lookup chain: IP address, then coordinates, then weather.
//!
//! The orchestrator is the only writer of [`UiState`]. Readers follow it
//! through a `tokio::sync::watch` receiver obtained from [`Orchestrator::subscribe`].

use tokio::sync::watch;

use crate::{
    Config,
    error::LookupError,
    model::{ErrorInfo, UiState, WeatherResult},
    provider::{Geolocator, IpResolver, Providers, WeatherFetcher},
};

#[derive(Debug)]
pub struct Orchestrator {
    ip: Box<dyn IpResolver>,
    geo: Box<dyn Geolocator>,
    weather: Box<dyn WeatherFetcher>,
    state: watch::Sender<UiState>,
}

impl Orchestrator {
    pub fn new(
        ip: Box<dyn IpResolver>,
        geo: Box<dyn Geolocator>,
        weather: Box<dyn WeatherFetcher>,
    ) -> Self {
        let (state, _) = watch::channel(UiState::Loading);
        Self {
            ip,
            geo,
            weather,
            state,
        }
    }

    pub fn from_providers(providers: Providers) -> Self {
        Self::new(providers.ip, providers.geo, providers.weather)
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::from_providers(Providers::from_config(config)?))
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// Snapshot of the currently published state.
    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    /// Run the chain once and publish its terminal state.
    ///
    /// A failing step stops the chain; later steps are never invoked.
    pub async fn run(&self) -> UiState {
        self.publish(UiState::Loading);

        let next = match self.lookup().await {
            Ok(result) => UiState::Succeeded(result),
            Err(err) => UiState::Failed(ErrorInfo::from(&err)),
        };

        self.publish(next.clone());
        next
    }

    async fn lookup(&self) -> Result<WeatherResult, LookupError> {
        let address = self.ip.resolve().await?;
        let coords = self.geo.locate(&address).await?;
        self.weather.current(coords).await
    }

    fn publish(&self, state: UiState) {
        self.state.send_replace(state);
    }
}
