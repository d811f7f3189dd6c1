//! Overall confidence of an estimate.

use farm_carbon_assessment_models::{ConfidenceLevel, ImageQuality, LandAssessment};

/// Feature count at which the assessment counts as detailed.
const RICH_FEATURE_COUNT: usize = 3;

fn quality_adjustment(quality: ImageQuality) -> f64 {
    match quality {
        ImageQuality::Excellent | ImageQuality::Good => 0.5,
        ImageQuality::Acceptable => 0.0,
        ImageQuality::Poor => -0.5,
    }
}

/// Raw confidence score: the model's own confidence rank adjusted for image
/// quality and data completeness.
#[must_use]
pub fn confidence_score(assessment: &LandAssessment, quality: ImageQuality) -> f64 {
    let mut score = f64::from(assessment.confidence.rank()) + quality_adjustment(quality);
    if assessment.estimated_tree_count.is_some() {
        score += 0.25;
    }
    if assessment.visible_features.len() >= RICH_FEATURE_COUNT {
        score += 0.25;
    }
    score
}

/// Confidence level of the estimate derived from `assessment`.
#[must_use]
pub fn score(assessment: &LandAssessment, quality: ImageQuality) -> ConfidenceLevel {
    let score = confidence_score(assessment, quality);
    if score >= 3.0 {
        ConfidenceLevel::High
    } else if score >= 2.0 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use farm_carbon_assessment_models::{LandCondition, VegetationDensity, VegetationType};

    use super::*;

    fn assessment(
        confidence: ConfidenceLevel,
        trees: Option<u64>,
        features: usize,
    ) -> LandAssessment {
        LandAssessment {
            vegetation_type: VegetationType::Mixed,
            vegetation_density: VegetationDensity::Moderate,
            density_percentage: 50.0,
            estimated_tree_count: trees,
            land_condition: LandCondition::Average,
            visible_features: (0..features).map(|i| format!("feature {i}")).collect(),
            confidence,
            reasoning: String::new(),
        }
    }

    #[test]
    fn high_confidence_with_good_image_stays_high() {
        let a = assessment(ConfidenceLevel::High, Some(150), 3);
        assert_eq!(score(&a, ImageQuality::Good), ConfidenceLevel::High);
    }

    #[test]
    fn poor_image_demotes_high() {
        let a = assessment(ConfidenceLevel::High, None, 0);
        assert_eq!(score(&a, ImageQuality::Poor), ConfidenceLevel::Medium);
    }

    #[test]
    fn completeness_can_promote_medium() {
        let a = assessment(ConfidenceLevel::Medium, Some(10), 4);
        // 2 + 0.5 + 0.25 + 0.25
        assert_eq!(score(&a, ImageQuality::Excellent), ConfidenceLevel::High);
        assert_eq!(score(&a, ImageQuality::Acceptable), ConfidenceLevel::Medium);
    }

    #[test]
    fn low_with_poor_image_is_low() {
        let a = assessment(ConfidenceLevel::Low, None, 0);
        assert_eq!(score(&a, ImageQuality::Poor), ConfidenceLevel::Low);
    }

    #[test]
    fn monotonic_in_image_quality() {
        let ordered = [
            ImageQuality::Poor,
            ImageQuality::Acceptable,
            ImageQuality::Good,
            ImageQuality::Excellent,
        ];
        for confidence in ConfidenceLevel::all() {
            for trees in [None, Some(5)] {
                for features in [0, 3] {
                    let a = assessment(*confidence, trees, features);
                    for pair in ordered.windows(2) {
                        assert!(
                            score(&a, pair[0]) <= score(&a, pair[1]),
                            "{:?} -> {:?} lowered confidence",
                            pair[0],
                            pair[1]
                        );
                    }
                }
            }
        }
    }
}
