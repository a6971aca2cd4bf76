//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The OpenWeather API access layer (request building, transport, decode)
//! - Shared domain models (readings, geocoding candidates)
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod api;
pub mod config;
pub mod model;

pub use api::openweather::{Endpoint, Endpoints, OpenWeatherClient};
pub use api::{ApiError, WeatherSource, client_from_config};
pub use config::Config;
pub use model::{Coordinate, GeoCandidate, WeatherReading};
