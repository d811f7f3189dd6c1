#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Land assessment and image metadata types.
//!
//! This crate defines the closed vocabularies a vision-model description is
//! normalized into, the validated [`LandAssessment`] record, and the
//! [`ImageMetadata`] supplied by the image pipeline. Every categorical field
//! is a closed enum: values outside the set never make it past validation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Dominant land cover visible in the photograph.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VegetationType {
    /// Closed or near-closed tree canopy
    Forest,
    /// Cultivated crops
    Cropland,
    /// Pasture, meadow or rangeland
    Grassland,
    /// Agroforestry or a mix of the above
    Mixed,
    /// Bare soil, rock or built-up ground
    Barren,
    /// Could not be determined from the image
    Unknown,
}

impl VegetationType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Forest,
            Self::Cropland,
            Self::Grassland,
            Self::Mixed,
            Self::Barren,
            Self::Unknown,
        ]
    }
}

/// Qualitative vegetation cover.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VegetationDensity {
    /// Roughly 0-30% cover
    Sparse,
    /// Roughly 30-60% cover
    Moderate,
    /// Roughly 60-100% cover
    Dense,
    /// No vegetation
    None,
}

impl VegetationDensity {
    /// Typical cover percentage for this density class.
    ///
    /// Used when the model names a density class but leaves the percentage
    /// empty.
    #[must_use]
    pub const fn typical_percentage(self) -> f64 {
        match self {
            Self::Sparse => 20.0,
            Self::Moderate => 50.0,
            Self::Dense => 80.0,
            Self::None => 0.0,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Sparse, Self::Moderate, Self::Dense, Self::None]
    }
}

/// Overall condition of the land.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LandCondition {
    Excellent,
    Good,
    Average,
    Degraded,
    Poor,
}

impl LandCondition {
    /// Whether the land needs restoration before enrolling in a program.
    #[must_use]
    pub const fn needs_restoration(self) -> bool {
        matches!(self, Self::Degraded | Self::Poor)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Excellent,
            Self::Good,
            Self::Average,
            Self::Degraded,
            Self::Poor,
        ]
    }
}

/// Categorical trust signal, used both for the vision model's self-reported
/// confidence and for the final estimate.
///
/// Variants are ordered by rank: `Low < Medium < High`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConfidenceLevel {
    /// Poor quality image or unusual features
    Low = 1,
    /// Partial view or mixed features
    Medium = 2,
    /// Clear image of typical land
    High = 3,
}

impl ConfidenceLevel {
    /// Numeric rank of this level (1-3).
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Returns all variants of this enum, lowest rank first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// Image quality tier assigned by the image pipeline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ImageQuality {
    /// Below 320x240; may affect analysis accuracy
    Poor,
    /// At least 320x240
    Acceptable,
    /// At least 640x480
    Good,
    /// At least 1024x768
    Excellent,
}

impl ImageQuality {
    /// Minimum pixel count for [`Self::Excellent`] (1024x768).
    pub const EXCELLENT_MIN_PIXELS: u64 = 786_432;
    /// Minimum pixel count for [`Self::Good`] (640x480).
    pub const GOOD_MIN_PIXELS: u64 = 307_200;
    /// Minimum pixel count for [`Self::Acceptable`] (320x240).
    pub const ACCEPTABLE_MIN_PIXELS: u64 = 76_800;

    /// Derives the quality tier from the processed image dimensions.
    #[must_use]
    pub const fn from_dimensions(dimensions: Dimensions) -> Self {
        let pixels = dimensions.total_pixels();
        if pixels >= Self::EXCELLENT_MIN_PIXELS {
            Self::Excellent
        } else if pixels >= Self::GOOD_MIN_PIXELS {
            Self::Good
        } else if pixels >= Self::ACCEPTABLE_MIN_PIXELS {
            Self::Acceptable
        } else {
            Self::Poor
        }
    }

    /// Leniently maps a provider label such as
    /// `"poor - may affect analysis accuracy"` onto a tier.
    ///
    /// Returns `None` when no tier name appears in the label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        if let Ok(exact) = Self::from_str(&lower) {
            return Some(exact);
        }
        [Self::Excellent, Self::Good, Self::Acceptable, Self::Poor]
            .into_iter()
            .find(|tier| lower.contains(tier.as_ref()))
    }

    /// Human-readable label, with a caveat attached to the poor tier.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Acceptable => "acceptable",
            Self::Poor => "poor - may affect analysis accuracy",
        }
    }
}

/// Error returned when a `WIDTHxHEIGHT` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid dimensions '{input}': expected WIDTHxHEIGHT with positive integers")]
pub struct DimensionsError {
    /// The rejected input.
    pub input: String,
}

/// Pixel dimensions of an image, written as `WIDTHxHEIGHT` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Creates a new dimensions value.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of pixels.
    #[must_use]
    pub const fn total_pixels(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl FromStr for Dimensions {
    type Err = DimensionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DimensionsError {
            input: s.to_string(),
        };
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let width = w.trim().parse::<u32>().map_err(|_| err())?;
        let height = h.trim().parse::<u32>().map_err(|_| err())?;
        if width == 0 || height == 0 {
            return Err(err());
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for Dimensions {
    type Error = DimensionsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dimensions> for String {
    fn from(value: Dimensions) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Metadata describing the photograph the assessment was made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Dimensions of the uploaded file.
    pub original_dimensions: Dimensions,
    /// Dimensions after downscaling for the vision model.
    pub processed_dimensions: Dimensions,
    /// Whether the image was downscaled.
    pub was_resized: bool,
    /// Quality tier of the processed image.
    pub quality: ImageQuality,
}

impl ImageMetadata {
    /// Builds metadata from original and processed dimensions, deriving the
    /// quality tier from the processed pixel count.
    #[must_use]
    pub fn new(original: Dimensions, processed: Dimensions) -> Self {
        Self {
            original_dimensions: original,
            processed_dimensions: processed,
            was_resized: original != processed,
            quality: ImageQuality::from_dimensions(processed),
        }
    }

    /// Overrides the derived quality tier.
    #[must_use]
    pub const fn with_quality(mut self, quality: ImageQuality) -> Self {
        self.quality = quality;
        self
    }
}

/// Validated, schema-complete description of a parcel of land.
///
/// Produced only by validation, so every field is within its closed set and
/// `density_percentage` lies in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandAssessment {
    pub vegetation_type: VegetationType,
    pub vegetation_density: VegetationDensity,
    /// Vegetation cover, 0-100.
    pub density_percentage: f64,
    /// Visible tree count. `None` means not applicable, not zero.
    pub estimated_tree_count: Option<u64>,
    pub land_condition: LandCondition,
    /// Key features in the order the model listed them.
    pub visible_features: Vec<String>,
    /// The vision model's self-reported confidence.
    pub confidence: ConfidenceLevel,
    /// The model's explanation for its assessment.
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!(
            VegetationType::from_str("Forest").unwrap(),
            VegetationType::Forest
        );
        assert_eq!(
            VegetationDensity::from_str("DENSE").unwrap(),
            VegetationDensity::Dense
        );
        assert!(LandCondition::from_str("pristine").is_err());
    }

    #[test]
    fn enums_serialize_snake_case() {
        let json = serde_json::to_string(&VegetationType::Grassland).unwrap();
        assert_eq!(json, "\"grassland\"");
        assert_eq!(ConfidenceLevel::High.to_string(), "high");
    }

    #[test]
    fn confidence_levels_are_ordered_by_rank() {
        assert!(ConfidenceLevel::Low < ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium < ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::High.rank(), 3);
    }

    #[test]
    fn parses_dimensions() {
        let dims: Dimensions = "1024x768".parse().unwrap();
        assert_eq!(dims, Dimensions::new(1024, 768));
        assert_eq!(dims.total_pixels(), 786_432);
        assert_eq!(dims.to_string(), "1024x768");
        assert!("1024".parse::<Dimensions>().is_err());
        assert!("0x10".parse::<Dimensions>().is_err());
    }

    #[test]
    fn quality_from_dimensions_uses_pixel_thresholds() {
        let tier = |w, h| ImageQuality::from_dimensions(Dimensions::new(w, h));
        assert_eq!(tier(1024, 768), ImageQuality::Excellent);
        assert_eq!(tier(640, 480), ImageQuality::Good);
        assert_eq!(tier(320, 240), ImageQuality::Acceptable);
        assert_eq!(tier(100, 100), ImageQuality::Poor);
    }

    #[test]
    fn quality_from_label_is_lenient() {
        assert_eq!(
            ImageQuality::from_label("poor - may affect analysis accuracy"),
            Some(ImageQuality::Poor)
        );
        assert_eq!(ImageQuality::from_label(" Good "), Some(ImageQuality::Good));
        assert_eq!(ImageQuality::from_label("blurry"), None);
    }

    #[test]
    fn rendered_labels_parse_back_to_their_tier() {
        for tier in [
            ImageQuality::Excellent,
            ImageQuality::Good,
            ImageQuality::Acceptable,
            ImageQuality::Poor,
        ] {
            assert_eq!(ImageQuality::from_label(tier.label()), Some(tier));
        }
    }

    #[test]
    fn metadata_detects_resize() {
        let meta = ImageMetadata::new(Dimensions::new(4000, 3000), Dimensions::new(1024, 768));
        assert!(meta.was_resized);
        assert_eq!(meta.quality, ImageQuality::Excellent);

        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json["processed_dimensions"], "1024x768");
    }
}
