//! Boundary decoding of Karate feature reports
//!
//! The scenario list is checked first so a document without one is reported
//! as a validation failure naming the document. Everything below it is
//! decoded record by record, so a shape mismatch carries the path of the
//! record that caused it.

use report_model::karate::{RELATIVE_PATH_FIELD, SCENARIO_RESULTS_FIELD, STEP_RESULTS_FIELD};
use report_model::{KarateFeature, KarateScenario, KarateStep};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::{Error, MISSING_SCENARIO_RESULTS, Result, UNKNOWN_CONTEXT};

/// Feature fields other than the scenario list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeatureHeader {
    line: u32,
    name: String,
    package_qualified_name: String,
    relative_path: String,
}

/// Scenario fields other than the step list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioHeader {
    start_time: i64,
    line: u32,
    name: String,
    #[serde(default)]
    description: String,
    ref_id: String,
}

/// Decode one Karate feature report.
///
/// # Errors
///
/// Returns [`Error::Validation`] when `scenarioResults` is missing or not an
/// array, and [`Error::Decode`] with a record path for any other shape
/// mismatch.
pub fn decode_feature(value: Value) -> Result<KarateFeature> {
    let Value::Object(mut fields) = value else {
        return Err(Error::validation(MISSING_SCENARIO_RESULTS, UNKNOWN_CONTEXT));
    };
    let context = document_context(&fields);

    let scenarios = match fields.remove(SCENARIO_RESULTS_FIELD) {
        Some(Value::Array(items)) => items,
        _ => return Err(Error::validation(MISSING_SCENARIO_RESULTS, context)),
    };

    let header: FeatureHeader = serde_json::from_value(Value::Object(fields))
        .map_err(|e| Error::decode("$", e.to_string()))?;

    let scenario_results = scenarios
        .into_iter()
        .enumerate()
        .map(|(index, scenario)| {
            decode_scenario(scenario, &format!("$.{SCENARIO_RESULTS_FIELD}[{index}]"))
        })
        .collect::<Result<Vec<_>>>()?;

    trace!(
        feature = %header.relative_path,
        scenarios = scenario_results.len(),
        "decoded karate feature"
    );

    Ok(KarateFeature {
        line: header.line,
        name: header.name,
        package_qualified_name: header.package_qualified_name,
        relative_path: header.relative_path,
        scenario_results,
    })
}

fn decode_scenario(value: Value, path: &str) -> Result<KarateScenario> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(Error::decode(path, format!("expected object, found {}", kind(&other))));
        }
    };

    let steps = match fields.remove(STEP_RESULTS_FIELD) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(Error::decode(
                format!("{path}.{STEP_RESULTS_FIELD}"),
                format!("expected array, found {}", kind(&other)),
            ));
        }
        None => {
            return Err(Error::decode(path, format!("missing field `{STEP_RESULTS_FIELD}`")));
        }
    };

    let header: ScenarioHeader = serde_json::from_value(Value::Object(fields))
        .map_err(|e| Error::decode(path, e.to_string()))?;

    let step_results = steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            let step_path = format!("{path}.{STEP_RESULTS_FIELD}[{index}]");
            serde_json::from_value::<KarateStep>(step)
                .map_err(|e| Error::decode(step_path, e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(KarateScenario {
        start_time: header.start_time,
        line: header.line,
        name: header.name,
        description: header.description,
        ref_id: header.ref_id,
        step_results,
    })
}

/// Identifier used to name a document in diagnostics.
fn document_context(fields: &Map<String, Value>) -> String {
    fields
        .get(RELATIVE_PATH_FIELD)
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_CONTEXT)
        .to_string()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
