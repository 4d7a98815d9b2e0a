//! Karate per-feature report documents
#![allow(clippy::must_use_candidate)] // Constructor API intentionally omits pervasive #[must_use].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Field name of the scenario list on a feature report.
pub const SCENARIO_RESULTS_FIELD: &str = "scenarioResults";

/// Field name of the step list on a scenario record.
pub const STEP_RESULTS_FIELD: &str = "stepResults";

/// Field name of the feature's file-relative path.
pub const RELATIVE_PATH_FIELD: &str = "relativePath";

/// One Karate feature report, as written to `<feature>.karate-json.txt`.
///
/// Fields the converter does not consume are ignored on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KarateFeature {
    /// Line of the `Feature:` keyword in the feature file
    pub line: u32,

    /// Feature display name
    pub name: String,

    /// Dotted, package-qualified feature identifier
    pub package_qualified_name: String,

    /// Feature file path relative to the test root
    pub relative_path: String,

    /// Scenario results in execution order
    pub scenario_results: Vec<KarateScenario>,
}

/// One executed scenario within a Karate feature report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KarateScenario {
    /// Start time in milliseconds since the Unix epoch
    pub start_time: i64,

    /// Line of the `Scenario:` keyword
    pub line: u32,

    /// Scenario name
    pub name: String,

    /// Free-text scenario description
    #[serde(default)]
    pub description: String,

    /// Karate reference identifier, e.g. `[1:7]`
    pub ref_id: String,

    /// Step results in execution order
    pub step_results: Vec<KarateStep>,
}

/// One executed step within a Karate scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KarateStep {
    /// Step duration in milliseconds
    pub duration_millis: DurationMillis,

    /// Whether the step failed. Read with JSON truthiness: absent, `null`,
    /// `false`, `0` and `""` are not failed, anything else is.
    #[serde(default, deserialize_with = "truthy")]
    pub failed: bool,

    /// Line of the step in the feature file
    pub line: u32,

    /// Step text without the keyword
    pub name: String,

    /// Step definition match, when Karate recorded one
    #[serde(default, rename = "match")]
    pub step_match: Option<KarateMatch>,

    /// Gherkin keyword (`Given`, `When`, `Then`, `And`, `*`, ...)
    pub keyword: String,
}

impl KarateStep {
    /// Whether this step is reported as failed.
    pub fn is_failed(&self) -> bool {
        self.failed
    }
}

#[allow(clippy::float_cmp)]
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Step definition match recorded by Karate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KarateMatch {
    /// Source location of the matched step definition.
    ///
    /// `None` when the key is absent, `Some(None)` when it is `null`.
    #[serde(
        default,
        deserialize_with = "crate::nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Option<String>>,
}

/// A step duration in milliseconds, kept as the raw JSON number.
///
/// Karate writes durations as doubles, but hand-written or older reports use
/// integers. Keeping the raw number lets the converter scale integral values
/// exactly instead of going through `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationMillis(Number);

impl DurationMillis {
    /// Integral millisecond duration.
    pub fn from_millis(millis: u64) -> Self {
        Self(Number::from(millis))
    }

    /// Fractional millisecond duration. Returns `None` for NaN or infinity,
    /// which JSON cannot represent.
    pub fn from_f64(millis: f64) -> Option<Self> {
        Number::from_f64(millis).map(Self)
    }

    /// The raw JSON number.
    pub fn as_number(&self) -> &Number {
        &self.0
    }
}

impl From<u64> for DurationMillis {
    fn from(millis: u64) -> Self {
        Self::from_millis(millis)
    }
}
