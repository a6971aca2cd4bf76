use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use weather_core::{
    Config, Coordinate, GeoCandidate, WeatherReading, WeatherSource, client_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current conditions from OpenWeather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather for a location: city name or 5-digit zip code.
    Show {
        /// Location name, e.g. "Raleigh" or "27601".
        location: String,
    },

    /// Show weather for an exact coordinate.
    #[command(allow_negative_numbers = true)]
    Here {
        /// Latitude in decimal degrees.
        lat: f64,
        /// Longitude in decimal degrees.
        lon: f64,
    },

    /// Show weather for the last successfully used coordinate.
    Last,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location } => show_searched(&location).await,
            Command::Here { lat, lon } => {
                let config = Config::load()?;
                let client = client_from_config(&config)?;
                fetch_and_render(&client, config, Coordinate { lat, lon }).await
            }
            Command::Last => show_last().await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show_searched(location: &str) -> Result<()> {
    let config = Config::load()?;
    let client = client_from_config(&config)?;

    let candidate = resolve_candidate(&client, location).await?;
    let Some(coordinate) = candidate.as_ref().and_then(GeoCandidate::coordinate) else {
        // Covers both "no candidates" and a candidate missing lat or lon.
        println!("No data for this location");
        return Ok(());
    };

    fetch_and_render(&client, config, coordinate).await
}

async fn show_last() -> Result<()> {
    let config = Config::load()?;

    let Some(coordinate) = config.last_coordinate else {
        bail!(
            "No previous location on record.\n\
             Hint: run `weather show <location>` or `weather here <lat> <lon>` first."
        );
    };

    let client = client_from_config(&config)?;
    fetch_and_render(&client, config, coordinate).await
}

/// Zip code search uses a different endpoint: 5 characters, digits only.
fn is_zip_code(location: &str) -> bool {
    location.len() == 5 && location.bytes().all(|b| b.is_ascii_digit())
}

async fn resolve_candidate<S: WeatherSource>(
    source: &S,
    location: &str,
) -> Result<Option<GeoCandidate>> {
    if is_zip_code(location) {
        let candidate = source
            .geocode_zip(location)
            .await
            .with_context(|| format!("Zip code lookup failed for '{location}'"))?;
        Ok(Some(candidate))
    } else {
        let candidates = source
            .geocode(location)
            .await
            .with_context(|| format!("Location search failed for '{location}'"))?;
        Ok(candidates.into_iter().next())
    }
}

async fn fetch_and_render<S: WeatherSource>(
    source: &S,
    mut config: Config,
    coordinate: Coordinate,
) -> Result<()> {
    let reading = source
        .current_weather(coordinate)
        .await
        .context("Failed to fetch current weather")?;

    // Remember the coordinate only once a fetch succeeded for it.
    config.remember_coordinate(coordinate);
    config.save()?;

    render(&reading);
    Ok(())
}

fn render(reading: &WeatherReading) {
    if let Some(name) = &reading.name {
        println!("{name}");
    }

    if let Some(temperature) = &reading.temperature {
        let lines = [
            temperature.display_temp(),
            temperature.display_feels_like(),
            temperature.display_min(),
            temperature.display_max(),
            temperature.display_humidity(),
            temperature.display_pressure(),
        ];
        for line in lines.into_iter().flatten() {
            println!("{line}");
        }
    }

    if let Some(condition) = reading.conditions.first() {
        match (condition.main.as_deref(), condition.description.as_deref()) {
            (Some(main), Some(description)) => println!("{main}: {description}"),
            (Some(main), None) => println!("{main}"),
            (None, Some(description)) => println!("{description}"),
            (None, None) => {}
        }
        if let Some(url) = condition.icon_url() {
            println!("Icon: {url}");
        }
    }
}
