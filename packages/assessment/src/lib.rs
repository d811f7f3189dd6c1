#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Structured extraction of land assessments from vision model replies.
//!
//! The vision model is not contractually bound to return clean JSON, so
//! this crate turns whatever text it produced into a usable
//! [`LandAssessment`] in two stages:
//!
//! 1. [`extract`] recovers a JSON object with purely syntactic repairs.
//! 2. [`validate`] maps that object onto the closed schema, substituting
//!    documented defaults field by field.
//!
//! [`assess_response`] composes both and never fails: when extraction finds
//! nothing, a low-confidence fallback record is validated instead.

pub mod extract;
pub mod validate;

use farm_carbon_assessment_models::LandAssessment;

pub use extract::{Extraction, ExtractionError, ExtractionStrategy};
pub use validate::AssessmentDefaults;

/// A validated assessment together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentOutcome {
    pub assessment: LandAssessment,
    /// The strategy that recovered the object, or `None` when the fallback
    /// record was used.
    pub strategy: Option<ExtractionStrategy>,
}

impl AssessmentOutcome {
    /// Whether the model reply was unusable and the fallback record stands
    /// in for it.
    #[must_use]
    pub const fn used_fallback(&self) -> bool {
        self.strategy.is_none()
    }
}

/// Turns a raw model reply into a validated assessment using the default
/// substitution table.
#[must_use]
pub fn assess_response(raw: &str) -> AssessmentOutcome {
    assess_response_with(raw, &AssessmentDefaults::default())
}

/// Turns a raw model reply into a validated assessment.
#[must_use]
pub fn assess_response_with(raw: &str, defaults: &AssessmentDefaults) -> AssessmentOutcome {
    match extract::extract(raw) {
        Ok(extraction) => AssessmentOutcome {
            assessment: validate::validate(&extraction.object, defaults),
            strategy: Some(extraction.strategy),
        },
        Err(e) => {
            log::warn!("{e}; using low-confidence fallback assessment");
            log::debug!("Unparseable model response: {raw}");
            AssessmentOutcome {
                assessment: validate::validate(&validate::fallback_candidate(), defaults),
                strategy: None,
            }
        }
    }
}
