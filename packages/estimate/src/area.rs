//! Visible land-area approximation from image metadata and assessment cues.
//!
//! Without GPS or survey data the only signals are the image resolution and
//! what the model saw. A typical drone shot at 50-100 m covers one to two
//! hectares, a ground-level photo far less.

use farm_carbon_assessment_models::{ImageMetadata, LandAssessment};
use farm_carbon_estimate_models::AreaMethod;

use crate::round2;
use crate::tables::AreaTable;

/// Approximated area of the photographed parcel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaEstimate {
    /// Hectares, rounded to two decimals.
    pub hectares: f64,
    pub method: AreaMethod,
}

/// Whether the image looks like an aerial or drone shot.
#[must_use]
pub fn is_likely_aerial(
    table: &AreaTable,
    metadata: &ImageMetadata,
    assessment: &LandAssessment,
) -> bool {
    let features = assessment.visible_features.join(" ").to_lowercase();
    let keyword_hit = table
        .aerial_keywords
        .iter()
        .any(|keyword| features.contains(&keyword.to_lowercase()));
    let many_trees = assessment
        .estimated_tree_count
        .is_some_and(|count| count > table.aerial_tree_count_above);
    let high_res = metadata.processed_dimensions.total_pixels() > table.aerial_pixels_above;

    keyword_hit || many_trees || high_res
}

/// Estimates the visible land area in hectares.
#[must_use]
pub fn estimate_area(
    table: &AreaTable,
    metadata: &ImageMetadata,
    assessment: &LandAssessment,
) -> AreaEstimate {
    let (method, mut hectares) = if is_likely_aerial(table, metadata, assessment) {
        (AreaMethod::AerialPerspective, table.aerial_base_hectares)
    } else {
        (AreaMethod::GroundLevel, table.ground_base_hectares)
    };

    let pixels = metadata.processed_dimensions.total_pixels();
    if pixels > table.high_res_pixels_above {
        hectares *= table.high_res_factor;
    } else if pixels < table.low_res_pixels_below {
        hectares *= table.low_res_factor;
    }

    let hectares = round2(hectares);
    log::debug!(
        "Area estimate: {hectares} ha ({method}, {} processed)",
        metadata.processed_dimensions
    );

    AreaEstimate { hectares, method }
}

#[cfg(test)]
mod tests {
    use farm_carbon_assessment_models::{
        ConfidenceLevel, Dimensions, LandCondition, VegetationDensity, VegetationType,
    };

    use super::*;
    use crate::tables::CalculationTables;

    fn assessment(features: &[&str], trees: Option<u64>) -> LandAssessment {
        LandAssessment {
            vegetation_type: VegetationType::Cropland,
            vegetation_density: VegetationDensity::Moderate,
            density_percentage: 50.0,
            estimated_tree_count: trees,
            land_condition: LandCondition::Average,
            visible_features: features.iter().map(ToString::to_string).collect(),
            confidence: ConfidenceLevel::Medium,
            reasoning: String::new(),
        }
    }

    fn metadata(width: u32, height: u32) -> ImageMetadata {
        let dims = Dimensions::new(width, height);
        ImageMetadata::new(dims, dims)
    }

    fn area_table() -> AreaTable {
        CalculationTables::builtin().area
    }

    #[test]
    fn full_hd_is_aerial() {
        // 1920x1080 = 2_073_600 pixels: aerial and high-res
        let area = estimate_area(&area_table(), &metadata(1920, 1080), &assessment(&[], None));
        assert_eq!(area.method, AreaMethod::AerialPerspective);
        assert!((area.hectares - 1.95).abs() < 1e-9);
    }

    #[test]
    fn small_photo_without_cues_is_ground_level() {
        let area = estimate_area(&area_table(), &metadata(640, 480), &assessment(&[], None));
        assert_eq!(area.method, AreaMethod::GroundLevel);
        // 307_200 pixels is low-res: 0.3 * 0.7
        assert!((area.hectares - 0.21).abs() < 1e-9);
    }

    #[test]
    fn feature_keyword_marks_aerial() {
        let area = estimate_area(
            &area_table(),
            &metadata(1024, 768),
            &assessment(&["Crop ROWS visible"], None),
        );
        assert_eq!(area.method, AreaMethod::AerialPerspective);
        assert!((area.hectares - 1.5).abs() < 1e-9);
    }

    #[test]
    fn tree_count_threshold_is_exclusive() {
        let table = area_table();
        let meta = metadata(1024, 768);
        assert!(!is_likely_aerial(&table, &meta, &assessment(&[], Some(20))));
        assert!(is_likely_aerial(&table, &meta, &assessment(&[], Some(21))));
    }
}
