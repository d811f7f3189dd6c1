//! Annual CO2 sequestration from an assessment, an area and a climate
//! multiplier.
//!
//! ```text
//! effective_rate = base_rate[type]
//!                * density_multiplier[density]
//!                * condition_multiplier[condition]
//!                * (0.5 + density_percentage / 100)
//!                * climate_multiplier
//! annual_tons    = effective_rate * area_hectares
//! ```

use farm_carbon_assessment_models::LandAssessment;
use farm_carbon_estimate_models::CalculationDetails;

use crate::round2;
use crate::tables::CalculationTables;

/// Unrounded result of one sequestration calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sequestration {
    pub base_rate: f64,
    pub density_multiplier: f64,
    pub condition_multiplier: f64,
    pub density_percentage_multiplier: f64,
    pub climate_multiplier: f64,
    /// Tons CO2 per hectare per year after all multipliers.
    pub effective_rate: f64,
    pub area_hectares: f64,
    pub annual_tons: f64,
}

impl Sequestration {
    /// Rounded breakdown for reports.
    #[must_use]
    pub fn details(&self, climate_adjustments: Vec<String>) -> CalculationDetails {
        CalculationDetails {
            base_rate: round2(self.base_rate),
            density_multiplier: self.density_multiplier,
            condition_multiplier: self.condition_multiplier,
            density_percentage_multiplier: round2(self.density_percentage_multiplier),
            climate_multiplier: self.climate_multiplier,
            climate_adjustments,
            effective_rate_per_hectare: round2(self.effective_rate),
            estimated_area_hectares: self.area_hectares,
            annual_co2_tons: round2(self.annual_tons),
        }
    }
}

/// Computes annual sequestration for `area_hectares` of the assessed land.
///
/// Negative or non-finite areas are treated as zero. A non-finite or
/// negative climate multiplier is replaced by the neutral `1.0`.
#[must_use]
pub fn compute(
    tables: &CalculationTables,
    assessment: &LandAssessment,
    area_hectares: f64,
    climate_multiplier: f64,
) -> Sequestration {
    let area_hectares = if area_hectares.is_finite() && area_hectares >= 0.0 {
        area_hectares
    } else {
        log::warn!("Invalid area {area_hectares} ha; treating as 0");
        0.0
    };

    let climate_multiplier = if climate_multiplier.is_finite() && climate_multiplier >= 0.0 {
        climate_multiplier
    } else {
        log::warn!("Invalid climate multiplier {climate_multiplier}; using 1.0");
        1.0
    };

    let density_percentage = if assessment.density_percentage.is_finite() {
        assessment.density_percentage.clamp(0.0, 100.0)
    } else {
        assessment.vegetation_density.typical_percentage()
    };

    let base_rate = tables.base_rates.rate(assessment.vegetation_type);
    let density_multiplier = tables
        .density_multipliers
        .multiplier(assessment.vegetation_density);
    let condition_multiplier = tables
        .condition_multipliers
        .multiplier(assessment.land_condition);
    let density_percentage_multiplier = 0.5 + density_percentage / 100.0;

    let effective_rate = base_rate
        * density_multiplier
        * condition_multiplier
        * density_percentage_multiplier
        * climate_multiplier;
    let annual_tons = effective_rate * area_hectares;

    log::debug!(
        "Sequestration: {base_rate} x {density_multiplier} x {condition_multiplier} x \
         {density_percentage_multiplier} x {climate_multiplier} = {effective_rate} t/ha/yr \
         over {area_hectares} ha"
    );

    Sequestration {
        base_rate,
        density_multiplier,
        condition_multiplier,
        density_percentage_multiplier,
        climate_multiplier,
        effective_rate,
        area_hectares,
        annual_tons,
    }
}

#[cfg(test)]
mod tests {
    use farm_carbon_assessment_models::{
        ConfidenceLevel, LandCondition, VegetationDensity, VegetationType,
    };

    use super::*;

    fn dense_forest(density_percentage: f64) -> LandAssessment {
        LandAssessment {
            vegetation_type: VegetationType::Forest,
            vegetation_density: VegetationDensity::Dense,
            density_percentage,
            estimated_tree_count: Some(150),
            land_condition: LandCondition::Good,
            visible_features: vec![],
            confidence: ConfidenceLevel::High,
            reasoning: String::new(),
        }
    }

    #[test]
    fn dense_forest_reference_case() {
        let tables = CalculationTables::builtin();
        let result = compute(&tables, &dense_forest(85.0), 1.5, 1.0);
        // 10 * 1.3 * 1.1 * 1.35
        assert!((result.effective_rate - 19.305).abs() < 1e-9);
        assert!((result.annual_tons - 28.9575).abs() < 1e-9);

        let details = result.details(vec![]);
        assert!((details.effective_rate_per_hectare - 19.3).abs() < 0.011);
        assert!((details.annual_co2_tons - 28.96).abs() < 1e-9);
        assert!((details.density_percentage_multiplier - 1.35).abs() < 1e-9);
    }

    #[test]
    fn monotonic_in_density_percentage() {
        let tables = CalculationTables::builtin();
        let mut previous = f64::NEG_INFINITY;
        for pct in (0..=100).step_by(5) {
            let tons = compute(&tables, &dense_forest(f64::from(pct)), 1.5, 1.0).annual_tons;
            assert!(tons >= previous, "{pct}% dropped to {tons}");
            previous = tons;
        }
    }

    #[test]
    fn climate_multiplier_scales_linearly() {
        let tables = CalculationTables::builtin();
        let neutral = compute(&tables, &dense_forest(85.0), 1.5, 1.0);
        let humid = compute(&tables, &dense_forest(85.0), 1.5, 1.3);
        assert!((humid.annual_tons - neutral.annual_tons * 1.3).abs() < 1e-9);
    }

    #[test]
    fn negative_area_clamps_to_zero() {
        let tables = CalculationTables::builtin();
        let result = compute(&tables, &dense_forest(85.0), -2.0, 1.0);
        assert!(result.area_hectares.abs() < f64::EPSILON);
        assert!(result.annual_tons.abs() < f64::EPSILON);

        let result = compute(&tables, &dense_forest(85.0), f64::NAN, 1.0);
        assert!(result.annual_tons.abs() < f64::EPSILON);
    }

    #[test]
    fn barren_land_sequesters_almost_nothing() {
        let tables = CalculationTables::builtin();
        let assessment = LandAssessment {
            vegetation_type: VegetationType::Barren,
            vegetation_density: VegetationDensity::None,
            density_percentage: 0.0,
            land_condition: LandCondition::Poor,
            ..dense_forest(0.0)
        };
        let result = compute(&tables, &assessment, 1.5, 1.0);
        // 0.1 * 0.1 * 0.5 * 0.5 * 1.5
        assert!((result.annual_tons - 0.00375).abs() < 1e-9);
    }
}
