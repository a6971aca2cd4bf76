use reqwest::Url;
use serde::{Deserialize, Serialize};

const ICON_URL_TEMPLATE: &str = "https://openweathermap.org/img/wn";
const FAHRENHEIT_SYMBOL: &str = "°F";

/// A plain latitude/longitude pair, the unit of exchange between geocoding
/// and the weather endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Decoded current-conditions result for one coordinate.
///
/// Only `id` is guaranteed by the API; it defaults to 0 so a payload missing
/// it still decodes. Everything else may be absent on partial data.
///
/// Equality is by `id` alone: two readings are "the same" when they describe
/// the same canonical condition code. Callers needing a full structural
/// comparison must compare fields themselves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherReading {
    /// The API may report several simultaneous conditions (e.g. rain and
    /// clouds), so this is a sequence.
    #[serde(rename = "weather", default)]
    pub conditions: Vec<ConditionDetail>,
    #[serde(default)]
    pub id: i64,
    pub name: Option<String>,
    #[serde(rename = "main")]
    pub temperature: Option<TemperatureReading>,
}

impl PartialEq for WeatherReading {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WeatherReading {}

/// One weather condition: category label, description, icon code.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionDetail {
    pub id: Option<i64>,
    pub main: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl ConditionDetail {
    /// URL of the condition's image, by substituting the icon code into the
    /// fixed OpenWeather template. Absent when there is no icon code.
    pub fn icon_url(&self) -> Option<Url> {
        let icon = self.icon.as_deref()?;
        Url::parse(&format!("{ICON_URL_TEMPLATE}/{icon}@2x.png")).ok()
    }
}

/// Temperature block of a weather payload. All fields are optional; the API
/// omits them outside forecast coverage or on partial data.
///
/// Values are Fahrenheit: every weather request asks for imperial units and
/// no conversion happens client-side. The `display_*` helpers render the
/// strings the CLI shows, or `None` when the underlying field is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct TemperatureReading {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
}

impl TemperatureReading {
    pub fn display_temp(&self) -> Option<String> {
        self.temp.map(|t| format!("{t}{FAHRENHEIT_SYMBOL}"))
    }

    pub fn display_feels_like(&self) -> Option<String> {
        self.feels_like.map(|t| format!("Feels like: {t}{FAHRENHEIT_SYMBOL}"))
    }

    pub fn display_min(&self) -> Option<String> {
        self.temp_min.map(|t| format!("Min: {t}{FAHRENHEIT_SYMBOL}"))
    }

    pub fn display_max(&self) -> Option<String> {
        self.temp_max.map(|t| format!("Max: {t}{FAHRENHEIT_SYMBOL}"))
    }

    pub fn display_humidity(&self) -> Option<String> {
        self.humidity.map(|h| format!("Humidity: {h}"))
    }

    pub fn display_pressure(&self) -> Option<String> {
        self.pressure.map(|p| format!("Pressure: {p}"))
    }
}

/// One candidate location match from a geocoding query. The API may omit any
/// field, so a candidate is usable as a coordinate only when both components
/// are present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoCandidate {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub name: Option<String>,
}

impl GeoCandidate {
    /// The candidate's coordinate, or `None` when either component is
    /// missing. Callers must check this before forwarding to the weather
    /// endpoint.
    pub fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate {
            lat: self.lat?,
            lon: self.lon?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_weather_payload_decodes_every_field() {
        let payload = json!({
            "weather": [
                { "id": 804, "main": "Clouds", "description": "overcast clouds", "icon": "04n" }
            ],
            "id": 4487042,
            "name": "Wake",
            "main": {
                "temp": 281.13,
                "feels_like": 278.89,
                "temp_min": 279.08,
                "temp_max": 282.53,
                "pressure": 1022.0,
                "humidity": 81.0
            }
        });

        let reading: WeatherReading = serde_json::from_value(payload).expect("valid payload");

        assert_eq!(reading.id, 4487042);
        assert_eq!(reading.name.as_deref(), Some("Wake"));

        let condition = &reading.conditions[0];
        assert_eq!(condition.id, Some(804));
        assert_eq!(condition.main.as_deref(), Some("Clouds"));
        assert_eq!(condition.description.as_deref(), Some("overcast clouds"));
        assert_eq!(condition.icon.as_deref(), Some("04n"));

        let temperature = reading.temperature.expect("main block present");
        assert_eq!(temperature.temp, Some(281.13));
        assert_eq!(temperature.feels_like, Some(278.89));
        assert_eq!(temperature.temp_min, Some(279.08));
        assert_eq!(temperature.temp_max, Some(282.53));
        assert_eq!(temperature.pressure, Some(1022.0));
        assert_eq!(temperature.humidity, Some(81.0));
    }

    #[test]
    fn minimal_weather_payload_decodes_with_defaults() {
        let reading: WeatherReading =
            serde_json::from_value(json!({ "id": 42 })).expect("id-only payload");

        assert_eq!(reading.id, 42);
        assert!(reading.conditions.is_empty());
        assert!(reading.name.is_none());
        assert!(reading.temperature.is_none());
    }

    #[test]
    fn missing_id_defaults_to_zero() {
        let reading: WeatherReading =
            serde_json::from_value(json!({ "name": "Wake" })).expect("payload without id");

        assert_eq!(reading.id, 0);
        assert_eq!(reading.name.as_deref(), Some("Wake"));
    }

    #[test]
    fn mistyped_field_fails_the_whole_decode() {
        let result: Result<WeatherReading, _> =
            serde_json::from_value(json!({ "id": 1, "main": { "temp": "hot" } }));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("hot"), "diagnostic names the bad value: {err}");
    }

    #[test]
    fn equality_is_by_id_only() {
        let a: WeatherReading =
            serde_json::from_value(json!({ "id": 800, "name": "Wake" })).unwrap();
        let b: WeatherReading =
            serde_json::from_value(json!({ "id": 800, "name": "Raleigh" })).unwrap();
        let c: WeatherReading = serde_json::from_value(json!({ "id": 801 })).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn icon_url_substitutes_the_code() {
        let condition: ConditionDetail =
            serde_json::from_value(json!({ "icon": "10d" })).unwrap();

        let url = condition.icon_url().expect("icon present");
        assert_eq!(url.as_str(), "https://openweathermap.org/img/wn/10d@2x.png");
    }

    #[test]
    fn icon_url_absent_without_code() {
        let condition: ConditionDetail = serde_json::from_value(json!({})).unwrap();
        assert!(condition.icon_url().is_none());
    }

    #[test]
    fn candidate_without_lon_is_not_geolocatable() {
        let candidate: GeoCandidate =
            serde_json::from_value(json!({ "lat": 35.7804, "name": "Raleigh" })).unwrap();
        assert!(candidate.coordinate().is_none());
    }

    #[test]
    fn candidate_with_both_components_converts() {
        let candidate: GeoCandidate =
            serde_json::from_value(json!({ "lat": 35.7804, "lon": -78.6391 })).unwrap();

        let coordinate = candidate.coordinate().expect("both components present");
        assert_eq!(coordinate, Coordinate { lat: 35.7804, lon: -78.6391 });
    }

    #[test]
    fn display_strings_render_fahrenheit() {
        let temperature: TemperatureReading = serde_json::from_value(json!({
            "temp": 281.13,
            "feels_like": 278.89,
            "humidity": 81.0
        }))
        .unwrap();

        assert_eq!(temperature.display_temp().as_deref(), Some("281.13°F"));
        assert_eq!(
            temperature.display_feels_like().as_deref(),
            Some("Feels like: 278.89°F")
        );
        assert_eq!(temperature.display_humidity().as_deref(), Some("Humidity: 81"));
        assert!(temperature.display_min().is_none());
        assert!(temperature.display_pressure().is_none());
    }
}
