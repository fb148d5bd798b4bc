use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Select};
use skyglance_core::{
    Config, Coordinates, FixedLocation, IconResolver, LocationProvider, TemperatureUnit,
    WeatherPipeline, location, provider_from_config,
};

use crate::render::TerminalRenderer;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyglance", version, about = "Current weather with condition icons")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and display preferences.
    Configure {
        /// OpenWeatherMap API key; prompted for if absent.
        #[arg(long)]
        api_key: Option<String>,

        /// kelvin, celsius or fahrenheit; prompted for if absent.
        #[arg(long)]
        units: Option<String>,
    },

    /// Show current weather and its icon.
    Show {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// One of the preset cities (see `skyglance cities`).
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        /// Keep refreshing at the configured interval until Ctrl-C.
        #[arg(long)]
        watch: bool,
    },

    /// Resolve a single condition icon, e.g. `01d`.
    Icon {
        id: String,

        /// Write the encoded image to this path.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List the preset cities.
    Cities,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key, units } => configure(api_key, units),
            Command::Show {
                lat,
                lon,
                city,
                watch,
            } => show(lat.zip(lon), city, watch).await,
            Command::Icon { id, out } => icon(&id, out).await,
            Command::Cities => {
                for city in location::PRESET_CITIES {
                    println!(
                        "{:<12} {:<8} {:>10.4} {:>11.4}",
                        city.name, city.region, city.coords.latitude, city.coords.longitude
                    );
                }
                Ok(())
            }
        }
    }
}

fn configure(api_key: Option<String>, units: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeatherMap API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key);

    config.units = match units {
        Some(units) => units.parse()?,
        None => {
            let options = vec![
                TemperatureUnit::Celsius,
                TemperatureUnit::Fahrenheit,
                TemperatureUnit::Kelvin,
            ];
            let start = options.iter().position(|u| *u == config.units).unwrap_or(0);
            Select::new("Temperature unit:", options)
                .with_starting_cursor(start)
                .prompt()
                .context("Failed to read temperature unit")?
        }
    };

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(coords: Option<(f64, f64)>, city: Option<String>, watch: bool) -> anyhow::Result<()> {
    let config = Config::load()?;

    let location: Box<dyn LocationProvider> = match (coords, city) {
        (Some((lat, lon)), _) => Box::new(FixedLocation::new(Coordinates::new(lat, lon))),
        (None, Some(name)) => Box::new(FixedLocation::from(location::preset_city(&name)?)),
        (None, None) => Box::new(FixedLocation::from(location::default_city())),
    };

    let pipeline = WeatherPipeline::new(
        location,
        provider_from_config(&config)?,
        IconResolver::from_config(&config)?,
        Box::new(TerminalRenderer::new(config.units)),
    );

    if watch {
        tokio::select! {
            _ = pipeline.run_every(config.refresh_interval()) => {}
            res = tokio::signal::ctrl_c() => res.context("Failed to listen for Ctrl-C")?,
        }
        return Ok(());
    }

    if pipeline.refresh().await.is_err() {
        bail!("Could not show the current weather");
    }
    Ok(())
}

async fn icon(id: &str, out: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let resolver = IconResolver::from_config(&config)?;

    let icon = resolver
        .resolve(id)
        .await
        .with_context(|| format!("Failed to resolve icon '{id}'"))?;

    println!(
        "Icon {}: {}x{} {:?}, from {}",
        icon.id(),
        icon.width(),
        icon.height(),
        icon.format(),
        icon.source()
    );

    if let Some(out) = out {
        save_icon(&out, icon.encoded()).await?;
        println!("Wrote {}", out.display());
    }

    Ok(())
}

async fn save_icon(out: &Path, encoded: &[u8]) -> anyhow::Result<()> {
    tokio::fs::write(out, encoded)
        .await
        .with_context(|| format!("Failed to write icon to {}", out.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli = Cli::parse_from(["skyglance", "show", "--lat", "-6.2", "--lon", "106.8"]);

        match cli.command {
            Command::Show { lat, lon, city, watch } => {
                assert_eq!(lat, Some(-6.2));
                assert_eq!(lon, Some(106.8));
                assert!(city.is_none());
                assert!(!watch);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn latitude_requires_longitude() {
        let res = Cli::try_parse_from(["skyglance", "show", "--lat", "35.68"]);
        assert!(res.is_err());
    }

    #[test]
    fn city_conflicts_with_coordinates() {
        let res = Cli::try_parse_from([
            "skyglance", "show", "--city", "Tokyo", "--lat", "1", "--lon", "2",
        ]);
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn save_icon_writes_bytes_and_reports_bad_paths() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("01d.png");

        save_icon(&out, b"\x89PNG").await.unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"\x89PNG");

        let err = save_icon(&dir.path().join("missing").join("01d.png"), b"x")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to write icon to"));
    }

    #[test]
    fn verbose_flag_is_global() {
        let cli = Cli::parse_from(["skyglance", "icon", "01d", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Icon { ref id, out: None } if id == "01d"));
    }
}
