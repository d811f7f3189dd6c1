#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Location and climate types shared between the climate adjuster and the
//! carbon calculator.

use serde::{Deserialize, Serialize};

/// WGS84 coordinates reported by the weather service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A live weather reading for the parcel's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Relative humidity, 0-100.
    pub humidity_pct: f64,
    /// Short condition name (e.g. `"Clouds"`).
    #[serde(default)]
    pub condition: Option<String>,
    /// Longer condition description (e.g. `"scattered clouds"`).
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl WeatherSnapshot {
    /// Creates a reading with only temperature and humidity.
    #[must_use]
    pub const fn new(temperature_c: f64, humidity_pct: f64) -> Self {
        Self {
            temperature_c,
            humidity_pct,
            condition: None,
            description: None,
            coordinates: None,
        }
    }
}

/// The climate multiplier for a region together with every rule that went
/// into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateAdjustment {
    /// Region name as supplied by the caller.
    pub region: String,
    /// Climate zone label (`"unknown"` for unlisted regions).
    pub climate_zone: String,
    /// Static per-region multiplier.
    pub baseline_multiplier: f64,
    /// Temperature factor, when weather was available.
    pub temperature_factor: Option<f64>,
    /// Humidity factor, when weather was available.
    pub humidity_factor: Option<f64>,
    /// Final multiplier applied to the sequestration rate.
    pub climate_multiplier: f64,
    /// One human-readable line per applied rule.
    pub adjustments: Vec<String>,
    pub weather_used: bool,
}

/// Everything known about where the parcel is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
    #[serde(flatten)]
    pub adjustment: ClimateAdjustment,
    /// Multi-line summary of the region, zone, multiplier and adjustments.
    pub explanation: String,
}

impl LocationContext {
    /// The multiplier to feed into the sequestration engine.
    #[must_use]
    pub const fn climate_multiplier(&self) -> f64 {
        self.adjustment.climate_multiplier
    }
}
