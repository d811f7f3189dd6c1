//! Registry of static per-region climate baselines.
//!
//! The default table lives in `regions/india.toml` and is embedded at
//! compile time. Alternate tables can be loaded from any TOML string with
//! the same shape via [`RegionTable::from_toml`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ClimateError;

const BUILTIN_REGIONS_TOML: &str = include_str!("../regions/india.toml");

/// Static climate baseline for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBaseline {
    /// Display name (e.g. `"Tamil Nadu"`).
    pub name: String,
    /// Multiplier applied to the sequestration rate.
    pub multiplier: f64,
    /// Climate zone label (e.g. `"tropical_wet"`).
    pub zone: String,
}

#[derive(Debug, Deserialize)]
struct RegionFile {
    country_code: String,
    regions: Vec<RegionBaseline>,
}

/// Lookup table of region baselines keyed by normalized region name.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTable {
    country_code: String,
    regions: BTreeMap<String, RegionBaseline>,
}

impl RegionTable {
    /// Parses and validates a region table.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Toml`] if the TOML is malformed, or
    /// [`ClimateError::Table`] if a multiplier is not a positive finite
    /// number or a region name appears twice.
    pub fn from_toml(toml_str: &str) -> Result<Self, ClimateError> {
        let file: RegionFile = toml::de::from_str(toml_str)?;

        let mut regions = BTreeMap::new();
        for region in file.regions {
            if !(region.multiplier.is_finite() && region.multiplier > 0.0) {
                return Err(ClimateError::Table {
                    message: format!(
                        "region '{}' has invalid multiplier {}",
                        region.name, region.multiplier
                    ),
                });
            }
            let key = normalize(&region.name);
            if key.is_empty() {
                return Err(ClimateError::Table {
                    message: "region with empty name".to_string(),
                });
            }
            if regions.insert(key, region.clone()).is_some() {
                return Err(ClimateError::Table {
                    message: format!("duplicate region '{}'", region.name),
                });
            }
        }

        Ok(Self {
            country_code: file.country_code,
            regions,
        })
    }

    /// The embedded default table.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed, which is a build-time
    /// defect rather than a runtime condition.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml(BUILTIN_REGIONS_TOML)
            .unwrap_or_else(|e| panic!("Failed to load built-in region table: {e}"))
    }

    /// Looks up a region by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn lookup(&self, region: &str) -> Option<&RegionBaseline> {
        self.regions.get(&normalize(region))
    }

    /// ISO country code used when querying weather services.
    #[must_use]
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// All regions, ordered by display name.
    pub fn regions(&self) -> impl Iterator<Item = &RegionBaseline> {
        self.regions.values()
    }

    /// Number of regions in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the table has no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn normalize(region: &str) -> String {
    region
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
