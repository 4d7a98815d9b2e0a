#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # report-mapping
//!
//! Record mapper from Karate feature reports to Cucumber JSON features.
//!
//! Mapping happens in two stages: [`decode`] turns an untyped JSON document
//! into a [`report_model::KarateFeature`], failing fast with the path of the
//! offending field, and [`RecordMapper`] turns the typed feature into a
//! [`report_model::CucumberFeature`]. Both stages are pure.

pub mod decode;
pub mod mapper;
pub mod transforms;

pub use decode::decode_feature;
pub use mapper::RecordMapper;

use thiserror::Error;

/// Reason reported when a document has no usable scenario list.
pub const MISSING_SCENARIO_RESULTS: &str = "missing or non-list scenario results";

/// Context reported when a document does not name its relative path.
pub const UNKNOWN_CONTEXT: &str = "<unknown>";

/// Errors that can occur while mapping a single document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("JSON parse error: {message}")]
    Parse { message: String },

    #[error("Validation error for '{context}': {reason}")]
    Validation { reason: String, context: String },

    #[error("Decode error at {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Invalid timestamp at {path}: {millis} ms is not a representable instant")]
    Timestamp { path: String, millis: i64 },

    #[error("Invalid duration at {path}: {message}")]
    Duration { path: String, message: String },
}

impl Error {
    /// Build a parse error from a JSON syntax failure.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Build a validation error naming the offending document.
    pub fn validation(reason: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
            context: context.into(),
        }
    }

    /// Build a decode error with the path of the offending record.
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Build a timestamp error for an out-of-range start time.
    pub fn timestamp(path: impl Into<String>, millis: i64) -> Self {
        Self::Timestamp {
            path: path.into(),
            millis,
        }
    }

    /// Build a duration error with the path of the offending step.
    pub fn duration(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Duration {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the document failed the scenario-list precondition.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::parse(e.to_string())
    }
}

/// Crate-local result type for mapping operations.
pub type Result<T> = std::result::Result<T, Error>;
