#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Carbon sequestration and credit estimation for farmland parcels.
//!
//! The [`CarbonCalculator`] turns a validated [`LandAssessment`], the image
//! metadata, and an optional [`LocationContext`] into an [`EstimateReport`]:
//!
//! 1. Approximate the visible area ([`area`]).
//! 2. Compute annual sequestration ([`sequestration`]).
//! 3. Project credits and revenue ([`revenue`]).
//! 4. Score confidence ([`confidence`]).
//! 5. Attach recommendations, next steps and disclaimers
//!    ([`recommendations`]).
//!
//! All constants come from injected [`CalculationTables`]. The calculator
//! holds no mutable state, so identical inputs always yield identical
//! reports.

pub mod area;
pub mod confidence;
pub mod recommendations;
pub mod revenue;
pub mod sequestration;
pub mod tables;

use farm_carbon_assessment::{AssessmentOutcome, assess_response};
use farm_carbon_assessment_models::{ImageMetadata, LandAssessment};
use farm_carbon_climate_models::LocationContext;
use farm_carbon_estimate_models::{CarbonEstimate, EstimateReport};

pub use tables::{CalculationTables, TableError};

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Produces carbon estimates from a fixed set of calculation tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CarbonCalculator {
    tables: CalculationTables,
}

impl CarbonCalculator {
    /// Creates a calculator over validated tables.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Invalid`] if any table value is out of range.
    pub fn new(tables: CalculationTables) -> Result<Self, TableError> {
        tables.validate()?;
        Ok(Self { tables })
    }

    /// Calculator over the embedded default tables.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn tables(&self) -> &CalculationTables {
        &self.tables
    }

    /// Computes the carbon estimate alone.
    #[must_use]
    pub fn carbon_estimate(
        &self,
        assessment: &LandAssessment,
        metadata: &ImageMetadata,
        location: Option<&LocationContext>,
    ) -> CarbonEstimate {
        let area = area::estimate_area(&self.tables.area, metadata, assessment);

        let (climate_multiplier, climate_adjustments) = location.map_or_else(
            || (1.0, Vec::new()),
            |ctx| (ctx.climate_multiplier(), ctx.adjustment.adjustments.clone()),
        );

        let result =
            sequestration::compute(&self.tables, assessment, area.hectares, climate_multiplier);
        let details = result.details(climate_adjustments);
        let projection = revenue::project(&self.tables.market, details.annual_co2_tons);
        let confidence_level = confidence::score(assessment, metadata.quality);

        log::info!(
            "Estimate: {} t CO2/yr over {} ha ({}), confidence {confidence_level}",
            details.annual_co2_tons,
            area.hectares,
            area.method
        );

        CarbonEstimate {
            annual_sequestration_tons: details.annual_co2_tons,
            estimated_land_area_hectares: area.hectares,
            area_estimation_method: area.method,
            area_estimation_note: area.method.description().to_string(),
            potential_annual_credits: projection.annual_credits,
            revenue_projections: projection.revenue,
            confidence_level,
            calculation_details: details,
            market_context: revenue::market_context(&self.tables.market),
        }
    }

    /// Computes the full report for an already validated assessment.
    #[must_use]
    pub fn estimate(
        &self,
        assessment: &LandAssessment,
        metadata: &ImageMetadata,
        location: Option<&LocationContext>,
    ) -> EstimateReport {
        EstimateReport {
            vision_analysis: assessment.clone(),
            image_quality: metadata.quality,
            carbon_estimate: self.carbon_estimate(assessment, metadata, location),
            location: location.cloned(),
            recommendations: recommendations::recommendations(assessment),
            next_steps: recommendations::next_steps(),
            disclaimers: recommendations::disclaimers(),
        }
    }

    /// Runs the whole pipeline on a raw model reply.
    ///
    /// Unparseable replies degrade to the fallback assessment, so this always
    /// produces a complete report.
    #[must_use]
    pub fn estimate_response(
        &self,
        raw: &str,
        metadata: &ImageMetadata,
        location: Option<&LocationContext>,
    ) -> (AssessmentOutcome, EstimateReport) {
        let outcome = assess_response(raw);
        let report = self.estimate(&outcome.assessment, metadata, location);
        (outcome, report)
    }
}

#[cfg(test)]
mod tests {
    use farm_carbon_assessment_models::{
        ConfidenceLevel, Dimensions, ImageQuality, LandCondition, VegetationDensity,
        VegetationType,
    };
    use farm_carbon_climate_models::{ClimateAdjustment, LocationContext};

    use super::*;

    fn dense_forest() -> LandAssessment {
        LandAssessment {
            vegetation_type: VegetationType::Forest,
            vegetation_density: VegetationDensity::Dense,
            density_percentage: 85.0,
            estimated_tree_count: Some(150),
            land_condition: LandCondition::Good,
            visible_features: vec![
                "tall canopy".to_string(),
                "mixed broadleaf trees".to_string(),
                "shaded understory".to_string(),
            ],
            confidence: ConfidenceLevel::High,
            reasoning: "Dense closed canopy".to_string(),
        }
    }

    /// 1280x720 is under every resolution threshold, so area stays at the
    /// aerial base of 1.5 ha (the tree count marks it aerial).
    fn hd_metadata() -> ImageMetadata {
        let dims = Dimensions::new(1280, 720);
        ImageMetadata::new(dims, dims).with_quality(ImageQuality::Good)
    }

    fn location(multiplier: f64) -> LocationContext {
        LocationContext {
            city: Some("Kochi".to_string()),
            weather: None,
            adjustment: ClimateAdjustment {
                region: "Kerala".to_string(),
                climate_zone: "tropical_wet".to_string(),
                baseline_multiplier: multiplier,
                temperature_factor: None,
                humidity_factor: None,
                climate_multiplier: multiplier,
                adjustments: vec!["Using regional baseline only".to_string()],
                weather_used: false,
            },
            explanation: String::new(),
        }
    }

    #[test]
    fn dense_forest_end_to_end() {
        let calculator = CarbonCalculator::with_defaults();
        let report = calculator.estimate(&dense_forest(), &hd_metadata(), None);
        let estimate = &report.carbon_estimate;

        assert!((estimate.estimated_land_area_hectares - 1.5).abs() < 1e-9);
        assert!((estimate.annual_sequestration_tons - 28.96).abs() < 1e-9);
        assert!((estimate.potential_annual_credits - 28.96).abs() < 1e-9);
        assert_eq!(estimate.confidence_level, ConfidenceLevel::High);
        assert!((estimate.calculation_details.climate_multiplier - 1.0).abs() < f64::EPSILON);
        assert!(estimate.calculation_details.climate_adjustments.is_empty());
        assert!(estimate.area_estimation_note.contains("approximation"));
        assert_eq!(report.recommendations.len(), 4);
        assert_eq!(report.next_steps.len(), 6);
        assert_eq!(report.disclaimers.len(), 6);
    }

    #[test]
    fn location_multiplier_flows_into_estimate() {
        let calculator = CarbonCalculator::with_defaults();
        let ctx = location(1.3);
        let report = calculator.estimate(&dense_forest(), &hd_metadata(), Some(&ctx));
        let details = &report.carbon_estimate.calculation_details;

        assert!((details.climate_multiplier - 1.3).abs() < f64::EPSILON);
        assert_eq!(details.climate_adjustments.len(), 1);
        // 28.9575 * 1.3 = 37.64475
        assert!((report.carbon_estimate.annual_sequestration_tons - 37.64).abs() < 1e-9);
        assert!(report.location.is_some());
    }

    #[test]
    fn malformed_reply_still_produces_complete_report() {
        let calculator = CarbonCalculator::with_defaults();
        let (outcome, report) = calculator.estimate_response(
            "I'm sorry, I can't see any land in this picture.",
            &hd_metadata(),
            None,
        );

        assert!(outcome.used_fallback());
        assert_eq!(report.vision_analysis.vegetation_type, VegetationType::Unknown);
        assert_eq!(report.vision_analysis.confidence, ConfidenceLevel::Low);
        assert!(report.carbon_estimate.annual_sequestration_tons > 0.0);
        assert!(report.carbon_estimate.annual_sequestration_tons.is_finite());
        assert_eq!(report.recommendations.len(), 2);
    }

    #[test]
    fn fenced_reply_end_to_end() {
        let raw = "Here is the analysis:\n```json\n{\"vegetation_type\": \"cropland\", \
                   \"vegetation_density\": \"moderate\", \"density_percentage\": 60, \
                   \"land_condition\": \"good\", \"visible_features\": [\"crop rows\"], \
                   \"confidence\": \"medium\", \"reasoning\": \"Rows of wheat\",}\n```";
        let calculator = CarbonCalculator::with_defaults();
        let (outcome, report) = calculator.estimate_response(raw, &hd_metadata(), None);

        assert!(!outcome.used_fallback());
        assert_eq!(report.vision_analysis.vegetation_type, VegetationType::Cropland);
        assert_eq!(
            report.carbon_estimate.area_estimation_method,
            farm_carbon_estimate_models::AreaMethod::AerialPerspective
        );
        // 2.0 * 1.0 * 1.1 * 1.1 * 1.5
        assert!((report.carbon_estimate.annual_sequestration_tons - 3.63).abs() < 1e-9);
    }

    #[test]
    fn rejects_invalid_tables() {
        let mut tables = CalculationTables::builtin();
        tables.density_multipliers.sparse = f64::NAN;
        assert!(matches!(
            CarbonCalculator::new(tables),
            Err(TableError::Invalid { .. })
        ));
    }

    #[test]
    fn report_serializes_with_snake_case_enums() {
        let report =
            CarbonCalculator::with_defaults().estimate(&dense_forest(), &hd_metadata(), None);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["vision_analysis"]["vegetation_type"], "forest");
        assert_eq!(json["carbon_estimate"]["confidence_level"], "high");
        assert_eq!(json["carbon_estimate"]["area_estimation_method"], "aerial_perspective");
        assert!(json["carbon_estimate"]["revenue_projections"]["5_year"]["mid"].is_number());
    }
}
