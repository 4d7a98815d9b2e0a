//! Record mapper
//!
//! Maps one Karate feature report to one Cucumber JSON feature.

use report_model::karate::{SCENARIO_RESULTS_FIELD, STEP_RESULTS_FIELD};
use report_model::{
    CucumberFeature, Element, KarateFeature, KarateScenario, KarateStep, Step, StepResult,
};
use serde_json::Value;
use tracing::debug;

use crate::decode::decode_feature;
use crate::transforms::{duration_nanos, match_location, start_timestamp, step_status};
use crate::Result;

/// Maps Karate feature reports to Cucumber JSON features.
///
/// The mapper holds no state; one instance can be shared across threads and
/// reused for any number of documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMapper;

impl RecordMapper {
    /// Create a new mapper
    pub fn new() -> Self {
        Self
    }

    /// Map a typed Karate feature.
    ///
    /// Scenarios and steps keep their source order. The feature description
    /// is always the feature name.
    ///
    /// # Errors
    ///
    /// Returns an error if a scenario start time or a step duration cannot be
    /// converted.
    pub fn map(&self, source: &KarateFeature) -> Result<CucumberFeature> {
        let elements = source
            .scenario_results
            .iter()
            .enumerate()
            .map(|(index, scenario)| {
                self.map_scenario(scenario, &format!("$.{SCENARIO_RESULTS_FIELD}[{index}]"))
            })
            .collect::<Result<Vec<_>>>()?;

        let feature = CucumberFeature::new(
            source.line,
            &source.name,
            &source.name,
            &source.package_qualified_name,
            &source.relative_path,
            elements,
        );

        debug!(
            uri = %feature.uri,
            elements = feature.elements.len(),
            steps = feature.step_count(),
            "mapped feature"
        );

        Ok(feature)
    }

    /// Validate, decode and map an untyped JSON document.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the scenario list is missing or not an
    /// array, a decode error for any other shape mismatch, and any error
    /// from [`RecordMapper::map`].
    pub fn map_value(&self, value: Value) -> Result<CucumberFeature> {
        let source = decode_feature(value)?;
        self.map(&source)
    }

    /// Parse, decode and map JSON text.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the text is not JSON, and any error from
    /// [`RecordMapper::map_value`].
    pub fn map_str(&self, text: &str) -> Result<CucumberFeature> {
        let value: Value = serde_json::from_str(text)?;
        self.map_value(value)
    }

    fn map_scenario(&self, scenario: &KarateScenario, path: &str) -> Result<Element> {
        let start = start_timestamp(scenario.start_time, path)?;

        let steps = scenario
            .step_results
            .iter()
            .enumerate()
            .map(|(index, step)| self.map_step(step, &format!("{path}.{STEP_RESULTS_FIELD}[{index}]")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Element::scenario(
            start,
            scenario.line,
            &scenario.name,
            &scenario.description,
            &scenario.ref_id,
            steps,
        ))
    }

    #[allow(clippy::unused_self)]
    fn map_step(&self, step: &KarateStep, path: &str) -> Result<Step> {
        Ok(Step {
            result: StepResult {
                duration: duration_nanos(&step.duration_millis, path)?,
                status: step_status(step.is_failed()),
            },
            line: step.line,
            name: step.name.clone(),
            step_match: match_location(step.step_match.as_ref()),
            keyword: step.keyword.clone(),
        })
    }
}
