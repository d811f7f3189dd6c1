#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Climate adjustment for carbon sequestration estimates.
//!
//! A parcel's sequestration rate is scaled by a single climate multiplier
//! built from two inputs:
//!
//! 1. **Regional baseline**: a static multiplier per region, loaded from the
//!    embedded [`registry`] table (Indian states by default).
//! 2. **Live weather** (optional): temperature and humidity factors from a
//!    [`weather::WeatherProvider`] such as `OpenWeatherMap`.
//!
//! Every rule applied is recorded as a human-readable line so the report
//! stage can show exactly how the multiplier was derived. Missing or
//! failed weather lookups degrade to the baseline, never to an error.

pub mod adjust;
pub mod registry;
pub mod weather;

use thiserror::Error;

pub use adjust::{ClimateAdjuster, ClimateRules};
pub use registry::{RegionBaseline, RegionTable};

/// Errors from climate configuration and weather lookups.
#[derive(Debug, Error)]
pub enum ClimateError {
    /// HTTP request to the weather service failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Weather response could not be interpreted.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Region table TOML is malformed.
    #[error("Region table TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Region table contents are invalid.
    #[error("Invalid region table: {message}")]
    Table {
        /// What is wrong with the table.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}
