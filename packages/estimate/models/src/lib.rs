#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Output types of the carbon calculator.
//!
//! A [`CarbonEstimate`] is assembled fresh for every request and handed to
//! downstream report and chat components as read-only context. The wider
//! [`EstimateReport`] bundles it with the assessment it was derived from,
//! the location context, and the advisory text.

use farm_carbon_assessment_models::{ConfidenceLevel, ImageQuality, LandAssessment};
use farm_carbon_climate_models::LocationContext;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Minimum, typical and maximum values of a per-credit price or a revenue
/// figure.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub mid: f64,
    pub max: f64,
}

impl PriceRange {
    /// Multiplies every bound by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self {
            min: self.min * factor,
            mid: self.mid * factor,
            max: self.max * factor,
        }
    }
}

/// Revenue ranges at each projection horizon.
///
/// Multi-year figures are linear multiples of the one-year figures.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RevenueProjections {
    #[serde(rename = "1_year")]
    pub one_year: PriceRange,
    #[serde(rename = "5_year")]
    pub five_year: PriceRange,
    #[serde(rename = "10_year")]
    pub ten_year: PriceRange,
}

/// How the visible land area was approximated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AreaMethod {
    /// Image shows aerial/drone-like indicators
    AerialPerspective,
    /// Image looks like a ground-level photo
    GroundLevel,
}

impl AreaMethod {
    /// Human-readable description, always flagged as an approximation.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AerialPerspective => {
                "Estimated from aerial perspective indicators (approximation, not a survey measurement)"
            }
            Self::GroundLevel => {
                "Estimated from ground-level perspective (approximation, not a survey measurement)"
            }
        }
    }
}

/// Every factor that went into the sequestration figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationDetails {
    /// Tons CO2 per hectare per year for the vegetation type.
    pub base_rate: f64,
    pub density_multiplier: f64,
    pub condition_multiplier: f64,
    /// `0.5 + density_percentage / 100`.
    pub density_percentage_multiplier: f64,
    pub climate_multiplier: f64,
    /// How the climate multiplier was derived, one line per rule.
    pub climate_adjustments: Vec<String>,
    pub effective_rate_per_hectare: f64,
    pub estimated_area_hectares: f64,
    pub annual_co2_tons: f64,
}

/// Market assumptions behind the revenue projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    /// ISO currency code of all revenue figures.
    pub currency: String,
    /// Price per credit.
    pub credit_price_range: PriceRange,
    /// Units of `currency` per US dollar, for reference.
    pub usd_exchange_rate: f64,
    pub note: String,
}

/// The core output: sequestration, credits and revenue for one parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonEstimate {
    pub annual_sequestration_tons: f64,
    pub estimated_land_area_hectares: f64,
    pub area_estimation_method: AreaMethod,
    /// Always states that the area is an approximation.
    pub area_estimation_note: String,
    /// One credit per ton of CO2.
    pub potential_annual_credits: f64,
    pub revenue_projections: RevenueProjections,
    pub confidence_level: ConfidenceLevel,
    pub calculation_details: CalculationDetails,
    pub market_context: MarketContext,
}

/// The complete artifact produced for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    /// The validated assessment the estimate was computed from.
    pub vision_analysis: LandAssessment,
    pub image_quality: ImageQuality,
    pub carbon_estimate: CarbonEstimate,
    #[serde(default)]
    pub location: Option<LocationContext>,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
    pub disclaimers: Vec<String>,
}
