//! Cucumber JSON report documents
//!
//! Field order of every struct matches the order in which the fields are
//! serialized, which is the order reporting tools conventionally expect.
#![allow(clippy::must_use_candidate)] // Constructor API intentionally omits pervasive #[must_use].

use serde::{Deserialize, Serialize};

/// Keyword written on every feature record.
pub const FEATURE_KEYWORD: &str = "Feature";

/// Keyword written on every element record.
pub const SCENARIO_KEYWORD: &str = "Scenario";

/// Element type written on every element record.
pub const SCENARIO_TYPE: &str = "scenario";

/// Match location used when a step carries no match information.
pub const UNKNOWN_LOCATION: &str = "unknown";

/// One feature in a Cucumber JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CucumberFeature {
    /// Line of the `Feature:` keyword
    pub line: u32,

    /// Feature name
    pub name: String,

    /// Feature description
    pub description: String,

    /// Feature identifier
    pub id: String,

    /// Always [`FEATURE_KEYWORD`]
    pub keyword: String,

    /// Feature file URI
    pub uri: String,

    /// Feature tags
    pub tags: Vec<Tag>,

    /// Scenarios in execution order
    pub elements: Vec<Element>,
}

impl CucumberFeature {
    /// Create a feature record with the fixed keyword and no tags.
    pub fn new(
        line: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        id: impl Into<String>,
        uri: impl Into<String>,
        elements: Vec<Element>,
    ) -> Self {
        Self {
            line,
            name: name.into(),
            description: description.into(),
            id: id.into(),
            keyword: FEATURE_KEYWORD.to_string(),
            uri: uri.into(),
            tags: Vec::new(),
            elements,
        }
    }

    /// Total number of steps across all elements.
    pub fn step_count(&self) -> usize {
        self.elements.iter().map(|element| element.steps.len()).sum()
    }
}

/// A feature or scenario tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name including the leading `@`
    pub name: String,

    /// Line of the tag
    pub line: u32,
}

/// One scenario element of a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// ISO-8601 start time with millisecond precision, UTC
    pub start_timestamp: String,

    /// Line of the `Scenario:` keyword
    pub line: u32,

    /// Scenario name
    pub name: String,

    /// Scenario description
    pub description: String,

    /// Scenario identifier
    pub id: String,

    /// Always [`SCENARIO_TYPE`]
    #[serde(rename = "type")]
    pub element_type: String,

    /// Always [`SCENARIO_KEYWORD`]
    pub keyword: String,

    /// Steps in execution order
    pub steps: Vec<Step>,
}

impl Element {
    /// Create a scenario element with the fixed type and keyword.
    pub fn scenario(
        start_timestamp: impl Into<String>,
        line: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        id: impl Into<String>,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            start_timestamp: start_timestamp.into(),
            line,
            name: name.into(),
            description: description.into(),
            id: id.into(),
            element_type: SCENARIO_TYPE.to_string(),
            keyword: SCENARIO_KEYWORD.to_string(),
            steps,
        }
    }
}

/// One step of a scenario element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Execution result
    pub result: StepResult,

    /// Line of the step
    pub line: u32,

    /// Step text
    pub name: String,

    /// Matched step definition
    #[serde(rename = "match")]
    pub step_match: StepMatch,

    /// Gherkin keyword, verbatim
    pub keyword: String,
}

/// Execution result of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Duration in nanoseconds
    pub duration: i128,

    /// Outcome
    pub status: Status,
}

/// Step outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
}

impl Status {
    /// Derive the status from a failure flag.
    pub fn from_failed(failed: bool) -> Self {
        if failed { Self::Failed } else { Self::Passed }
    }

    /// Serialized form of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

/// Location of the matched step definition.
///
/// `Some(None)` serializes as `"location": null`; `None` omits the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMatch {
    #[serde(
        default,
        deserialize_with = "crate::nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Option<String>>,
}

impl StepMatch {
    /// Match for a step without any recorded step definition.
    pub fn unknown() -> Self {
        Self {
            location: Some(Some(UNKNOWN_LOCATION.to_string())),
        }
    }

    /// The location text, if one is set.
    pub fn location(&self) -> Option<&str> {
        self.location.as_ref().and_then(Option::as_deref)
    }
}
