use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::model::{Coordinate, GeoCandidate, WeatherReading};

use super::{ApiError, WeatherSource};

const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const GEOCODE_DIRECT_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
const GEOCODE_ZIP_URL: &str = "https://api.openweathermap.org/geo/1.0/zip";

/// The credential query parameter attached to every outbound request.
const API_KEY_PARAM: &str = "appid";

/// The three remote operations the client supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Current conditions by coordinate.
    Weather,
    /// Free-text location query, zero or more candidates.
    GeocodeDirect,
    /// Postal code, exactly one candidate.
    GeocodeZip,
}

/// Base URLs for the three endpoints. `Default` is production; tests point
/// these at a local mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub weather: Url,
    pub geocode_direct: Url,
    pub geocode_zip: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        // The bases are compile-time constants; a parse failure here is a
        // code defect, not a runtime condition.
        Self {
            weather: Url::parse(WEATHER_URL).expect("weather base URL is well-formed"),
            geocode_direct: Url::parse(GEOCODE_DIRECT_URL)
                .expect("geocode base URL is well-formed"),
            geocode_zip: Url::parse(GEOCODE_ZIP_URL).expect("zip base URL is well-formed"),
        }
    }
}

impl Endpoints {
    fn base(&self, endpoint: Endpoint) -> &Url {
        match endpoint {
            Endpoint::Weather => &self.weather,
            Endpoint::GeocodeDirect => &self.geocode_direct,
            Endpoint::GeocodeZip => &self.geocode_zip,
        }
    }
}

/// JSON-over-HTTPS client for the OpenWeather current-conditions and
/// geocoding endpoints.
///
/// Stateless beyond the credential and base URLs, so one instance is safe to
/// share across any number of concurrent calls. Each call is a single
/// attempt with the transport's default policies; retries, backoff, and
/// timeout overrides belong to layers above this one.
///
/// Decoding is independent of the HTTP status: a non-2xx response whose body
/// still matches the requested shape decodes as success. The status is
/// reported on [`ApiError::Decode`] only when the structural match fails,
/// so callers wanting status-based failure policy must layer it on top.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoints(api_key, Endpoints::default())
    }

    pub fn with_endpoints(api_key: String, endpoints: Endpoints) -> Self {
        Self {
            api_key,
            endpoints,
            http: Client::new(),
        }
    }

    /// Assemble the fully qualified URL for one call.
    ///
    /// Values arrive un-encoded; percent-encoding is applied here, once. The
    /// credential is appended last and wins over any caller-supplied pair
    /// with the same key.
    fn build_url(&self, endpoint: Endpoint, params: &[(&str, &str)]) -> Url {
        let mut url = self.endpoints.base(endpoint).clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                if *name == API_KEY_PARAM {
                    continue;
                }
                pairs.append_pair(name, value);
            }
            pairs.append_pair(API_KEY_PARAM, &self.api_key);
        }
        url
    }

    /// One GET, default redirect and timeout policy, no retries. Anything
    /// below HTTP surfaces unchanged as [`ApiError::Transport`].
    async fn execute(&self, url: Url) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        Ok((status, body.to_vec()))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint, params);
        let (status, body) = self.execute(url).await?;

        decode_response(Some(status), &body)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current_weather(&self, coordinate: Coordinate) -> Result<WeatherReading, ApiError> {
        let lat = coordinate.lat.to_string();
        let lon = coordinate.lon.to_string();

        // Imperial is requested at the source; the client never converts units.
        let params = [
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("units", "imperial"),
        ];

        self.fetch(Endpoint::Weather, &params).await
    }

    async fn geocode(&self, query: &str) -> Result<Vec<GeoCandidate>, ApiError> {
        self.fetch(Endpoint::GeocodeDirect, &[("q", query)]).await
    }

    async fn geocode_zip(&self, zip: &str) -> Result<GeoCandidate, ApiError> {
        self.fetch(Endpoint::GeocodeZip, &[("zip", zip)]).await
    }
}

/// Strict-structural decode of a response body. Unknown fields are ignored;
/// a single mistyped field fails the whole decode, no partial recovery.
/// `status` is `None` when the exchange never produced an HTTP status, and
/// is then reported as the 0 sentinel.
fn decode_response<T: DeserializeOwned>(
    status: Option<StatusCode>,
    body: &[u8],
) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::Decode {
        status: status.map_or(0, |s| s.as_u16()),
        detail: format!("{err}; body: {}", truncate_body(&String::from_utf8_lossy(body))),
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}
