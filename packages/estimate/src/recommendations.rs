//! Advisory text attached to every estimate.

use farm_carbon_assessment_models::{LandAssessment, VegetationDensity, VegetationType};

/// Actionable recommendations for the assessed land, most specific first.
#[must_use]
pub fn recommendations(assessment: &LandAssessment) -> Vec<String> {
    let mut items: Vec<&str> = Vec::new();

    match assessment.vegetation_type {
        VegetationType::Cropland => {
            items.push(
                "Consider adopting regenerative agriculture practices (cover crops, no-till) \
                 to increase carbon sequestration",
            );
            items.push(
                "Explore agroforestry - integrating trees can boost carbon credits significantly",
            );
        }
        VegetationType::Grassland => {
            items.push("Implement rotational grazing to improve soil carbon storage");
            items.push("Consider planting native perennial grasses for better carbon capture");
        }
        VegetationType::Forest => {
            items.push("Maintain forest health through sustainable management practices");
            items.push("Forest carbon projects typically offer the highest credit values");
        }
        VegetationType::Mixed | VegetationType::Barren | VegetationType::Unknown => {}
    }

    if assessment.land_condition.needs_restoration() {
        items.push("Land restoration could significantly increase carbon potential");
        items.push(
            "Soil health improvement should be priority before enrolling in carbon programs",
        );
    }

    if assessment.vegetation_density == VegetationDensity::Sparse {
        items.push(
            "Increasing vegetation density through reforestation/replanting could 2-3x \
             carbon potential",
        );
    }

    items.push("Get a professional land survey for accurate area measurements");
    items.push(
        "Contact verified carbon credit programs: Verra, Gold Standard, or Indian programs \
         like CAMPA",
    );

    items.into_iter().map(String::from).collect()
}

const NEXT_STEPS: [&str; 6] = [
    "1. Get professional land survey and soil testing",
    "2. Research carbon credit programs in India (CAMPA, State Forest Departments)",
    "3. Understand program requirements (usually 20-30 year commitments)",
    "4. Consider consulting with carbon project developers",
    "5. Evaluate costs: verification, monitoring, administrative fees (₹4-17 lakhs)",
    "6. Compare multiple carbon programs for best fit",
];

const DISCLAIMERS: [&str; 6] = [
    "This is a preliminary estimate based on single image analysis",
    "Actual carbon credit eligibility requires professional land survey and soil testing",
    "Revenue estimates are approximate and depend on market conditions",
    "Most carbon programs require 20-30 year land commitments",
    "Verification and monitoring costs typically range from ₹4-17 lakhs",
    "Contact certified carbon credit programs for official assessment",
];

/// Fixed next steps for a farmer considering a carbon program.
#[must_use]
pub fn next_steps() -> Vec<String> {
    NEXT_STEPS.iter().map(ToString::to_string).collect()
}

#[must_use]
pub fn disclaimers() -> Vec<String> {
    DISCLAIMERS.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use farm_carbon_assessment_models::{ConfidenceLevel, LandCondition};

    use super::*;

    fn assessment(
        vegetation_type: VegetationType,
        vegetation_density: VegetationDensity,
        land_condition: LandCondition,
    ) -> LandAssessment {
        LandAssessment {
            vegetation_type,
            vegetation_density,
            density_percentage: 50.0,
            estimated_tree_count: None,
            land_condition,
            visible_features: vec![],
            confidence: ConfidenceLevel::Medium,
            reasoning: String::new(),
        }
    }

    #[test]
    fn healthy_forest_gets_type_block_and_closing_items() {
        let items = recommendations(&assessment(
            VegetationType::Forest,
            VegetationDensity::Dense,
            LandCondition::Good,
        ));
        assert_eq!(items.len(), 4);
        assert!(items[0].starts_with("Maintain forest health"));
        assert!(items[2].starts_with("Get a professional land survey"));
        assert!(items[3].starts_with("Contact verified carbon credit programs"));
    }

    #[test]
    fn degraded_sparse_cropland_gets_every_block_in_order() {
        let items = recommendations(&assessment(
            VegetationType::Cropland,
            VegetationDensity::Sparse,
            LandCondition::Degraded,
        ));
        assert_eq!(items.len(), 7);
        assert!(items[0].contains("regenerative agriculture"));
        assert!(items[2].starts_with("Land restoration"));
        assert!(items[3].starts_with("Soil health"));
        assert!(items[4].starts_with("Increasing vegetation density"));
        assert!(items[6].contains("CAMPA"));
    }

    #[test]
    fn unknown_land_gets_only_closing_items() {
        let items = recommendations(&assessment(
            VegetationType::Unknown,
            VegetationDensity::Moderate,
            LandCondition::Average,
        ));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn fixed_lists_have_six_items() {
        assert_eq!(next_steps().len(), 6);
        assert_eq!(disclaimers().len(), 6);
        assert!(next_steps()[0].starts_with("1. "));
    }
}
