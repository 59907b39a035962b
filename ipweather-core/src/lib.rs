//! Core library for the `ipweather` CLI.
//!
//! This crate defines:
//! - The lookup chain (public IP, coordinates, current weather)
//! - The published UI state and its single writer, the [`Orchestrator`]
//! - Configuration & API key handling
//!
//! It is used by `ipweather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod provider;

pub use config::{Config, Endpoints};
pub use error::{LookupError, Step};
pub use model::{Address, Coordinates, ErrorInfo, UiState, WeatherResult};
pub use orchestrator::Orchestrator;
pub use provider::{Geolocator, IpResolver, Providers, WeatherFetcher};
