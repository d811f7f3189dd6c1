#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for estimating farmland carbon credits from a vision-model reply.
//!
//! ```text
//! farm_carbon estimate --response reply.txt --dimensions 1280x720 --region Kerala
//! farm_carbon estimate --response - --region Punjab --city Ludhiana --fetch-weather
//! farm_carbon extract --response reply.txt
//! farm_carbon regions
//! ```
//!
//! `--fetch-weather` reads `OPENWEATHER_API_KEY` (and optionally
//! `OPENWEATHER_BASE_URL`) from the environment. Set `RUST_LOG=debug` to
//! trace every multiplier.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use farm_carbon_assessment::assess_response;
use farm_carbon_assessment_models::{Dimensions, ImageMetadata, ImageQuality};
use farm_carbon_climate::weather::{OpenWeatherMapProvider, WeatherProvider, resolve_location};
use farm_carbon_climate::{ClimateAdjuster, ClimateRules, RegionTable};
use farm_carbon_climate_models::{LocationContext, WeatherSnapshot};
use farm_carbon_estimate::{CalculationTables, CarbonCalculator};

#[derive(Parser)]
#[command(
    name = "farm_carbon",
    about = "Estimate carbon sequestration and credit revenue for farmland"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce a full carbon estimate report as JSON
    Estimate {
        /// File containing the raw vision-model reply, or `-` for stdin
        #[arg(long)]
        response: PathBuf,
        /// Processed image dimensions (WIDTHxHEIGHT)
        #[arg(long, default_value = "1920x1080")]
        dimensions: Dimensions,
        /// Original upload dimensions, if the image was downscaled
        #[arg(long)]
        original_dimensions: Option<Dimensions>,
        /// Override the quality tier derived from the dimensions
        #[arg(long, value_parser = parse_quality)]
        quality: Option<ImageQuality>,
        /// Region (state) the parcel is in
        #[arg(long)]
        region: Option<String>,
        /// Nearest city, used for live weather lookups
        #[arg(long)]
        city: Option<String>,
        /// Current temperature in degrees Celsius
        #[arg(long, requires = "humidity", requires = "region")]
        temperature: Option<f64>,
        /// Current relative humidity in percent
        #[arg(long, requires = "temperature")]
        humidity: Option<f64>,
        /// Fetch current weather from `OpenWeatherMap`
        #[arg(
            long,
            requires = "city",
            requires = "region",
            conflicts_with = "temperature"
        )]
        fetch_weather: bool,
        /// Calculation tables TOML replacing the built-in defaults
        #[arg(long)]
        tables: Option<PathBuf>,
        /// Region baseline TOML replacing the built-in table
        #[arg(long)]
        regions: Option<PathBuf>,
        /// Print compact instead of pretty JSON
        #[arg(long)]
        compact: bool,
    },
    /// Extract and validate the assessment from a raw model reply
    Extract {
        /// File containing the raw vision-model reply, or `-` for stdin
        #[arg(long)]
        response: PathBuf,
    },
    /// List supported regions with their climate baselines
    Regions {
        /// Region baseline TOML replacing the built-in table
        #[arg(long)]
        regions: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Estimate {
            response,
            dimensions,
            original_dimensions,
            quality,
            region,
            city,
            temperature,
            humidity,
            fetch_weather,
            tables,
            regions,
            compact,
        } => {
            let raw = read_response(&response)?;
            let calculator = match tables {
                Some(path) => {
                    let tables = CalculationTables::from_toml(&std::fs::read_to_string(path)?)?;
                    CarbonCalculator::new(tables)?
                }
                None => CarbonCalculator::with_defaults(),
            };

            let mut metadata =
                ImageMetadata::new(original_dimensions.unwrap_or(dimensions), dimensions);
            if let Some(quality) = quality {
                metadata = metadata.with_quality(quality);
            }
            log::info!("Image quality: {}", metadata.quality.label());

            let location = match region {
                Some(region) => {
                    let table = load_regions(regions.as_deref())?;
                    let adjuster = ClimateAdjuster::new(table, ClimateRules::default())?;
                    if adjuster.table().lookup(&region).is_none() {
                        log::warn!(
                            "Unknown region '{region}'; supported: {}",
                            adjuster.supported_regions().join(", ")
                        );
                    }
                    let weather = temperature
                        .zip(humidity)
                        .map(|(t, h)| WeatherSnapshot::new(t, h));
                    Some(
                        locate(&adjuster, city.as_deref(), &region, weather, fetch_weather)
                            .await?,
                    )
                }
                None => None,
            };

            let (outcome, report) =
                calculator.estimate_response(&raw, &metadata, location.as_ref());
            if outcome.used_fallback() {
                log::warn!(
                    "Model reply had no recoverable assessment; report uses fallback values"
                );
            }

            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{json}");
        }
        Commands::Extract { response } => {
            let raw = read_response(&response)?;
            let outcome = assess_response(&raw);
            let json = serde_json::json!({
                "strategy": outcome.strategy.map(|s| s.to_string()),
                "used_fallback": outcome.used_fallback(),
                "assessment": outcome.assessment,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Commands::Regions { regions } => {
            let table = load_regions(regions.as_deref())?;

            println!("{:<28} {:>10} ZONE", "REGION", "MULTIPLIER");
            println!("{}", "-".repeat(64));
            for region in table.regions() {
                println!(
                    "{:<28} {:>10.2} {}",
                    region.name, region.multiplier, region.zone
                );
            }
            println!("\n{} region(s), country {}", table.len(), table.country_code());
        }
    }

    Ok(())
}

async fn locate(
    adjuster: &ClimateAdjuster,
    city: Option<&str>,
    region: &str,
    weather: Option<WeatherSnapshot>,
    fetch_weather: bool,
) -> Result<LocationContext, Box<dyn std::error::Error>> {
    if !fetch_weather {
        return Ok(adjuster.location_context(city, region, weather));
    }

    let provider = OpenWeatherMapProvider::from_env(adjuster.table().country_code())?;
    let provider: &dyn WeatherProvider = &provider;
    Ok(resolve_location(adjuster, Some(provider), city, region).await)
}

fn parse_quality(label: &str) -> Result<ImageQuality, String> {
    ImageQuality::from_label(label).ok_or_else(|| {
        format!("unknown image quality '{label}' (expected excellent, good, acceptable or poor)")
    })
}

fn load_regions(path: Option<&Path>) -> Result<RegionTable, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => RegionTable::from_toml(&std::fs::read_to_string(path)?)?,
        None => RegionTable::builtin(),
    })
}

fn read_response(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        std::fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_flag_accepts_rendered_labels() {
        let cli = Cli::try_parse_from([
            "farm_carbon",
            "estimate",
            "--response",
            "reply.txt",
            "--quality",
            "poor - may affect analysis accuracy",
        ])
        .unwrap();
        let Commands::Estimate { quality, .. } = cli.command else {
            panic!("expected estimate command");
        };
        assert_eq!(quality, Some(ImageQuality::Poor));
    }

    #[test]
    fn quality_flag_rejects_unknown_tier() {
        assert!(
            Cli::try_parse_from([
                "farm_carbon",
                "estimate",
                "--response",
                "reply.txt",
                "--quality",
                "blurry",
            ])
            .is_err()
        );
    }
}
