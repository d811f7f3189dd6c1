//! Calculation tables: sequestration rates, multipliers, market prices and
//! the land-area heuristic constants.
//!
//! Every vegetation type, density class and condition has a named field, so
//! a table that parses is complete by construction. [`CalculationTables::validate`]
//! rejects values that could produce a negative or non-finite estimate.

use farm_carbon_assessment_models::{LandCondition, VegetationDensity, VegetationType};
use farm_carbon_estimate_models::PriceRange;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_TABLES_TOML: &str = include_str!("../tables/default.toml");

/// Errors from loading or validating calculation tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// Table TOML is malformed or incomplete.
    #[error("Calculation table TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Table contents are out of range.
    #[error("Invalid calculation table: {message}")]
    Invalid {
        /// What is wrong with the table.
        message: String,
    },
}

/// Tons CO2 per hectare per year, by vegetation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseRates {
    pub forest: f64,
    pub cropland: f64,
    pub grassland: f64,
    pub mixed: f64,
    pub barren: f64,
    pub unknown: f64,
}

impl BaseRates {
    #[must_use]
    pub const fn rate(&self, vegetation_type: VegetationType) -> f64 {
        match vegetation_type {
            VegetationType::Forest => self.forest,
            VegetationType::Cropland => self.cropland,
            VegetationType::Grassland => self.grassland,
            VegetationType::Mixed => self.mixed,
            VegetationType::Barren => self.barren,
            VegetationType::Unknown => self.unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DensityMultipliers {
    pub dense: f64,
    pub moderate: f64,
    pub sparse: f64,
    pub none: f64,
}

impl DensityMultipliers {
    #[must_use]
    pub const fn multiplier(&self, density: VegetationDensity) -> f64 {
        match density {
            VegetationDensity::Dense => self.dense,
            VegetationDensity::Moderate => self.moderate,
            VegetationDensity::Sparse => self.sparse,
            VegetationDensity::None => self.none,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionMultipliers {
    pub excellent: f64,
    pub good: f64,
    pub average: f64,
    pub degraded: f64,
    pub poor: f64,
}

impl ConditionMultipliers {
    #[must_use]
    pub const fn multiplier(&self, condition: LandCondition) -> f64 {
        match condition {
            LandCondition::Excellent => self.excellent,
            LandCondition::Good => self.good,
            LandCondition::Average => self.average,
            LandCondition::Degraded => self.degraded,
            LandCondition::Poor => self.poor,
        }
    }
}

/// Carbon credit market assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketTable {
    /// ISO code of the currency prices are quoted in.
    pub currency: String,
    /// Units of `currency` per US dollar.
    pub usd_exchange_rate: f64,
    pub note: String,
    /// Price per credit.
    pub credit_price: PriceRange,
}

/// Constants for the visible-area heuristic.
///
/// These are calibration points for a screening estimate. A survey is the
/// only real measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaTable {
    pub aerial_base_hectares: f64,
    pub ground_base_hectares: f64,
    /// Lowercase substrings of visible features that suggest an aerial shot.
    pub aerial_keywords: Vec<String>,
    pub aerial_tree_count_above: u64,
    pub aerial_pixels_above: u64,
    pub high_res_pixels_above: u64,
    pub high_res_factor: f64,
    pub low_res_pixels_below: u64,
    pub low_res_factor: f64,
}

/// The full set of tables injected into the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculationTables {
    pub base_rates: BaseRates,
    pub density_multipliers: DensityMultipliers,
    pub condition_multipliers: ConditionMultipliers,
    pub market: MarketTable,
    pub area: AreaTable,
}

impl Default for CalculationTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CalculationTables {
    /// Parses and validates tables from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Toml`] if the TOML is malformed or a table is
    /// missing an entry, or [`TableError::Invalid`] if a value is out of
    /// range.
    pub fn from_toml(toml_str: &str) -> Result<Self, TableError> {
        let tables: Self = toml::de::from_str(toml_str)?;
        tables.validate()?;
        Ok(tables)
    }

    /// The embedded default tables.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed, which is a build-time
    /// defect rather than a runtime condition.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml(DEFAULT_TABLES_TOML)
            .unwrap_or_else(|e| panic!("Failed to load built-in calculation tables: {e}"))
    }

    /// Checks that every rate, multiplier and price is finite and
    /// non-negative, that prices are ordered, and that area constants are
    /// positive.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Invalid`] naming the first offending entry.
    pub fn validate(&self) -> Result<(), TableError> {
        for vegetation_type in VegetationType::all() {
            non_negative(
                &format!("base_rates.{vegetation_type}"),
                self.base_rates.rate(*vegetation_type),
            )?;
        }
        for density in VegetationDensity::all() {
            non_negative(
                &format!("density_multipliers.{density}"),
                self.density_multipliers.multiplier(*density),
            )?;
        }
        for condition in LandCondition::all() {
            non_negative(
                &format!("condition_multipliers.{condition}"),
                self.condition_multipliers.multiplier(*condition),
            )?;
        }

        let price = &self.market.credit_price;
        non_negative("market.credit_price.min", price.min)?;
        non_negative("market.credit_price.mid", price.mid)?;
        non_negative("market.credit_price.max", price.max)?;
        if !(price.min <= price.mid && price.mid <= price.max) {
            return Err(invalid(format!(
                "market.credit_price must satisfy min <= mid <= max (got {} / {} / {})",
                price.min, price.mid, price.max
            )));
        }
        positive("market.usd_exchange_rate", self.market.usd_exchange_rate)?;
        if self.market.currency.trim().is_empty() {
            return Err(invalid("market.currency is empty".to_string()));
        }

        let area = &self.area;
        positive("area.aerial_base_hectares", area.aerial_base_hectares)?;
        positive("area.ground_base_hectares", area.ground_base_hectares)?;
        positive("area.high_res_factor", area.high_res_factor)?;
        positive("area.low_res_factor", area.low_res_factor)?;
        if area.low_res_pixels_below > area.high_res_pixels_above {
            return Err(invalid(format!(
                "area.low_res_pixels_below ({}) exceeds area.high_res_pixels_above ({})",
                area.low_res_pixels_below, area.high_res_pixels_above
            )));
        }

        Ok(())
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), TableError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite and >= 0 (got {value})")))
    }
}

fn positive(name: &str, value: f64) -> Result<(), TableError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite and > 0 (got {value})")))
    }
}

const fn invalid(message: String) -> TableError {
    TableError::Invalid { message }
}
