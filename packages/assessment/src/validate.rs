//! Total validation of an extracted candidate into a [`LandAssessment`].
//!
//! Validation never fails. Every field is looked up in the candidate and,
//! when it is missing, mistyped or outside its closed set, replaced by the
//! value in [`AssessmentDefaults`]. Each substitution is logged at `warn`.

use std::fmt::Display;
use std::str::FromStr;

use farm_carbon_assessment_models::{
    ConfidenceLevel, LandAssessment, LandCondition, VegetationDensity, VegetationType,
};
use serde_json::{Map, Value};

/// Reasoning attached to the fallback record used when extraction fails.
pub const FALLBACK_REASONING: &str =
    "AI response could not be parsed properly. Manual review recommended.";

/// Feature attached to the fallback record used when extraction fails.
pub const FALLBACK_FEATURE: &str = "Image analyzed but detailed parsing unavailable";

/// Values substituted for missing or invalid fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentDefaults {
    pub vegetation_type: VegetationType,
    pub vegetation_density: VegetationDensity,
    pub land_condition: LandCondition,
    pub confidence: ConfidenceLevel,
    /// Used when `density_percentage` is absent or not a number. An explicit
    /// `null` is derived from the density class instead.
    pub density_percentage: f64,
    pub reasoning: String,
}

impl Default for AssessmentDefaults {
    fn default() -> Self {
        Self {
            vegetation_type: VegetationType::Unknown,
            vegetation_density: VegetationDensity::Moderate,
            land_condition: LandCondition::Average,
            confidence: ConfidenceLevel::Medium,
            density_percentage: 50.0,
            reasoning: "Analysis based on visible features".to_string(),
        }
    }
}

/// Validates `candidate` into a schema-complete [`LandAssessment`].
#[must_use]
pub fn validate(candidate: &Map<String, Value>, defaults: &AssessmentDefaults) -> LandAssessment {
    let vegetation_type = closed_enum(candidate, "vegetation_type", defaults.vegetation_type);
    let vegetation_density =
        closed_enum(candidate, "vegetation_density", defaults.vegetation_density);
    let land_condition = closed_enum(candidate, "land_condition", defaults.land_condition);
    let confidence = closed_enum(candidate, "confidence", defaults.confidence);

    let density_percentage = match candidate.get("density_percentage") {
        None => {
            log::warn!(
                "density_percentage missing; using {}",
                defaults.density_percentage
            );
            defaults.density_percentage
        }
        Some(Value::Null) => {
            let derived = vegetation_density.typical_percentage();
            log::debug!(
                "density_percentage null; derived {derived} from {vegetation_density} density"
            );
            derived
        }
        Some(value) => coerce_f64(value).unwrap_or_else(|| {
            log::warn!(
                "density_percentage {value} is not a number; using {}",
                defaults.density_percentage
            );
            defaults.density_percentage
        }),
    }
    .clamp(0.0, 100.0);

    let estimated_tree_count = match candidate.get("estimated_tree_count") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let count = coerce_count(value);
            if count.is_none() {
                log::warn!("estimated_tree_count {value} is not a non-negative integer; dropping");
            }
            count
        }
    };

    let visible_features = match candidate.get("visible_features") {
        Some(Value::Array(items)) => items.iter().filter_map(feature_text).collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            log::warn!("visible_features {other} is not a list; using an empty list");
            Vec::new()
        }
    };

    let reasoning = match candidate.get("reasoning") {
        Some(Value::String(text)) if !text.trim().is_empty() => text.trim().to_string(),
        _ => defaults.reasoning.clone(),
    };

    LandAssessment {
        vegetation_type,
        vegetation_density,
        density_percentage,
        estimated_tree_count,
        land_condition,
        visible_features,
        confidence,
        reasoning,
    }
}

/// The synthetic candidate substituted when nothing could be extracted.
///
/// It goes through [`validate`] like any other candidate, so the pipeline
/// downstream always sees a normal record.
#[must_use]
pub fn fallback_candidate() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("vegetation_type".to_string(), "unknown".into());
    map.insert("vegetation_density".to_string(), "moderate".into());
    map.insert("density_percentage".to_string(), 50.0.into());
    map.insert("estimated_tree_count".to_string(), Value::Null);
    map.insert("land_condition".to_string(), "average".into());
    map.insert(
        "visible_features".to_string(),
        Value::Array(vec![FALLBACK_FEATURE.into()]),
    );
    map.insert("confidence".to_string(), "low".into());
    map.insert("reasoning".to_string(), FALLBACK_REASONING.into());
    map
}

fn closed_enum<T>(candidate: &Map<String, Value>, field: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    match candidate.get(field) {
        Some(Value::String(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("{field} '{raw}' is not a recognised value; using {default}");
            default
        }),
        None | Some(Value::Null) => {
            log::warn!("{field} missing; using {default}");
            default
        }
        Some(other) => {
            log::warn!("{field} {other} is not a string; using {default}");
            default
        }
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.trunc() as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn feature_text(item: &Value) -> Option<String> {
    let text = match item {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
