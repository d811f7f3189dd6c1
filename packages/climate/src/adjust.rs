//! Conversion of a region plus optional weather into a climate multiplier.

use farm_carbon_climate_models::{ClimateAdjustment, LocationContext, WeatherSnapshot};

use crate::ClimateError;
use crate::registry::RegionTable;

/// Zone label used for regions missing from the table.
pub const UNKNOWN_ZONE: &str = "unknown";

/// Thresholds and factors for the live-weather adjustment.
///
/// The defaults are empirical calibration points. Temperatures are in
/// degrees Celsius, humidity in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateRules {
    /// Inclusive lower bound of the optimal growing range.
    pub optimal_min_c: f64,
    /// Inclusive upper bound of the optimal growing range.
    pub optimal_max_c: f64,
    /// Temperatures strictly above this are hot.
    pub hot_above_c: f64,
    /// Temperatures strictly below this are cool.
    pub cool_below_c: f64,
    pub optimal_factor: f64,
    pub moderate_factor: f64,
    pub hot_factor: f64,
    pub cool_factor: f64,
    /// Humidity strictly above this is high.
    pub humid_above_pct: f64,
    /// Humidity strictly below this is low.
    pub dry_below_pct: f64,
    pub humid_factor: f64,
    pub normal_humidity_factor: f64,
    pub dry_factor: f64,
}

impl Default for ClimateRules {
    fn default() -> Self {
        Self {
            optimal_min_c: 20.0,
            optimal_max_c: 30.0,
            hot_above_c: 35.0,
            cool_below_c: 15.0,
            optimal_factor: 1.0,
            moderate_factor: 0.95,
            hot_factor: 0.90,
            cool_factor: 0.85,
            humid_above_pct: 70.0,
            dry_below_pct: 40.0,
            humid_factor: 1.05,
            normal_humidity_factor: 1.0,
            dry_factor: 0.95,
        }
    }
}

impl ClimateRules {
    /// Checks that every factor is finite and positive and that the
    /// thresholds are ordered `cool <= optimal_min <= optimal_max <= hot`
    /// and `dry <= humid`.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Table`] naming the first offending rule.
    pub fn validate(&self) -> Result<(), ClimateError> {
        for (name, factor) in [
            ("optimal_factor", self.optimal_factor),
            ("moderate_factor", self.moderate_factor),
            ("hot_factor", self.hot_factor),
            ("cool_factor", self.cool_factor),
            ("humid_factor", self.humid_factor),
            ("normal_humidity_factor", self.normal_humidity_factor),
            ("dry_factor", self.dry_factor),
        ] {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(ClimateError::Table {
                    message: format!(
                        "climate rule {name} must be finite and > 0 (got {factor})"
                    ),
                });
            }
        }

        let temperatures = [
            self.cool_below_c,
            self.optimal_min_c,
            self.optimal_max_c,
            self.hot_above_c,
        ];
        let humidities = [self.dry_below_pct, self.humid_above_pct];
        if temperatures.iter().chain(&humidities).any(|t| !t.is_finite())
            || !temperatures.is_sorted()
            || !humidities.is_sorted()
        {
            return Err(ClimateError::Table {
                message: format!(
                    "climate thresholds out of order: cool {} / optimal {}-{} / hot {} \
                     / dry {} / humid {}",
                    self.cool_below_c,
                    self.optimal_min_c,
                    self.optimal_max_c,
                    self.hot_above_c,
                    self.dry_below_pct,
                    self.humid_above_pct
                ),
            });
        }

        Ok(())
    }

    /// Temperature factor and its explanation.
    #[must_use]
    pub fn temperature_factor(&self, temperature_c: f64) -> (f64, String) {
        if (self.optimal_min_c..=self.optimal_max_c).contains(&temperature_c) {
            (
                self.optimal_factor,
                format!("Optimal temperature ({temperature_c}°C)"),
            )
        } else if temperature_c > self.hot_above_c {
            (
                self.hot_factor,
                format!("High temperature ({temperature_c}°C) slightly reduces sequestration"),
            )
        } else if temperature_c < self.cool_below_c {
            (
                self.cool_factor,
                format!("Cool temperature ({temperature_c}°C) reduces growth rate"),
            )
        } else {
            (
                self.moderate_factor,
                format!("Moderate temperature ({temperature_c}°C)"),
            )
        }
    }

    /// Humidity factor and its explanation.
    #[must_use]
    pub fn humidity_factor(&self, humidity_pct: f64) -> (f64, String) {
        if humidity_pct > self.humid_above_pct {
            (
                self.humid_factor,
                format!("High humidity ({humidity_pct}%) favorable for growth"),
            )
        } else if humidity_pct < self.dry_below_pct {
            (
                self.dry_factor,
                format!("Low humidity ({humidity_pct}%) limits sequestration"),
            )
        } else {
            (
                self.normal_humidity_factor,
                format!("Moderate humidity ({humidity_pct}%)"),
            )
        }
    }
}

/// Computes climate multipliers from a region table and weather rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateAdjuster {
    table: RegionTable,
    rules: ClimateRules,
}

impl Default for ClimateAdjuster {
    fn default() -> Self {
        Self {
            table: RegionTable::builtin(),
            rules: ClimateRules::default(),
        }
    }
}

impl ClimateAdjuster {
    /// Creates an adjuster over a region table and validated rules.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Table`] if `rules` fails
    /// [`ClimateRules::validate`].
    pub fn new(table: RegionTable, rules: ClimateRules) -> Result<Self, ClimateError> {
        rules.validate()?;
        Ok(Self { table, rules })
    }

    #[must_use]
    pub const fn table(&self) -> &RegionTable {
        &self.table
    }

    /// Baseline multiplier and zone for a region; unknown regions get
    /// `1.0` and [`UNKNOWN_ZONE`].
    #[must_use]
    pub fn baseline(&self, region: &str) -> (f64, &str) {
        self.table
            .lookup(region)
            .map_or((1.0, UNKNOWN_ZONE), |r| (r.multiplier, r.zone.as_str()))
    }

    /// Computes the climate multiplier for `region`, applying the weather
    /// rules when a reading is available.
    #[must_use]
    pub fn adjust(&self, region: &str, weather: Option<&WeatherSnapshot>) -> ClimateAdjustment {
        let (baseline, zone) = self.baseline(region);
        if zone == UNKNOWN_ZONE {
            log::info!("Region '{region}' not in baseline table; using neutral multiplier");
        }

        let mut adjustments = Vec::new();
        let (temperature_factor, humidity_factor, multiplier) = match weather {
            Some(reading) => {
                let (temp_factor, temp_note) =
                    self.rules.temperature_factor(reading.temperature_c);
                let (humidity_factor, humidity_note) =
                    self.rules.humidity_factor(reading.humidity_pct);
                adjustments.push(temp_note);
                adjustments.push(humidity_note);
                (
                    Some(temp_factor),
                    Some(humidity_factor),
                    baseline * temp_factor * humidity_factor,
                )
            }
            None => {
                adjustments.push(
                    "Using regional baseline only (weather data unavailable)".to_string(),
                );
                (None, None, baseline)
            }
        };

        let climate_multiplier = round2(multiplier);
        log::debug!(
            "Climate multiplier for '{region}': baseline {baseline} -> {climate_multiplier}"
        );

        ClimateAdjustment {
            region: region.trim().to_string(),
            climate_zone: zone.to_string(),
            baseline_multiplier: baseline,
            temperature_factor,
            humidity_factor,
            climate_multiplier,
            adjustments,
            weather_used: weather.is_some(),
        }
    }

    /// Builds the full location context handed to the calculator and the
    /// report collaborators.
    #[must_use]
    pub fn location_context(
        &self,
        city: Option<&str>,
        region: &str,
        weather: Option<WeatherSnapshot>,
    ) -> LocationContext {
        let adjustment = self.adjust(region, weather.as_ref());
        let explanation = explain(&adjustment);
        LocationContext {
            city: city.map(|c| c.trim().to_string()),
            weather,
            adjustment,
            explanation,
        }
    }

    /// Display names of all supported regions.
    #[must_use]
    pub fn supported_regions(&self) -> Vec<&str> {
        self.table.regions().map(|r| r.name.as_str()).collect()
    }
}

fn explain(adjustment: &ClimateAdjustment) -> String {
    let bullets: String = adjustment
        .adjustments
        .iter()
        .map(|line| format!("- {line}\n"))
        .collect();
    format!(
        "Location: {} ({} zone)\nClimate multiplier: {}x\n\nAdjustments applied:\n{bullets}",
        title_case(&adjustment.region),
        title_case(&adjustment.climate_zone.replace('_', " ")),
        adjustment.climate_multiplier,
    )
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
