use std::fmt::Debug;

use async_trait::async_trait;

use crate::{
    Config,
    api::openweather::OpenWeatherClient,
    model::{Coordinate, GeoCandidate, WeatherReading},
};

pub mod openweather;

/// The two failure kinds a caller of the API layer may observe.
///
/// `Transport` means the request never completed an HTTP exchange: DNS, TLS,
/// connection refusal, timeout. The underlying error is surfaced unchanged.
///
/// `Decode` means an exchange completed but the body did not structurally
/// match the requested shape. It carries the HTTP status (0 when no status
/// was ever obtained, i.e. the response came from something other than an
/// HTTP exchange) and a diagnostic describing the mismatch.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode error (HTTP status {status}): {detail}")]
    Decode { status: u16, detail: String },
}

/// The remote operations the app needs from a weather backend.
///
/// Production uses [`OpenWeatherClient`]; tests substitute a fixture-backed
/// implementation instead of stubbing concrete client internals.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Current conditions at a coordinate, in imperial units.
    async fn current_weather(&self, coordinate: Coordinate) -> Result<WeatherReading, ApiError>;

    /// Candidate locations for a free-text query, best match first. An empty
    /// list is a successful answer, not an error.
    async fn geocode(&self, query: &str) -> Result<Vec<GeoCandidate>, ApiError>;

    /// The single candidate for a postal code. A payload that is not one
    /// object surfaces as a decode failure.
    async fn geocode_zip(&self, zip: &str) -> Result<GeoCandidate, ApiError>;
}

/// Construct the production client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key.as_deref().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `weather configure` and enter your OpenWeather API key."
        )
    })?;

    Ok(OpenWeatherClient::new(api_key.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = client_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("Hint: run `weather configure`"));
    }

    #[test]
    fn client_from_config_works_when_key_is_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(client_from_config(&cfg).is_ok());
    }
}
