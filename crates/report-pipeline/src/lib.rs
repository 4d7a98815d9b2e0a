#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # report-pipeline
//!
//! Batch orchestration, acceptance policies, and report persistence.
//!
//! This crate drives the record mapper over a batch of Karate reports:
//! inputs are read concurrently, mapped in the order they were supplied,
//! bad inputs are reported and skipped (or reject the batch, depending on
//! policy), and the resulting Cucumber features are written atomically.

pub mod config;
pub mod loader;
pub mod pipeline;
pub mod policies;
pub mod writer;

pub use config::ConverterConfig;
pub use loader::{SourceInput, load_sources};
pub use pipeline::{ConversionPipeline, ConversionReport, FileResult, Mapper, PipelineStats};
pub use policies::AcceptancePolicy;
pub use writer::{render_features, write_features};

use thiserror::Error;

/// Errors that can occur in the pipeline
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("IO error during {operation} for '{path}': {message}")]
    Io {
        operation: String,
        path: String,
        message: String,
    },

    #[error("Failed to persist report to '{path}': {message}")]
    Persist { path: String, message: String },

    #[error("Rejected batch at '{origin}': {message}")]
    Rejected { origin: String, message: String },

    #[error("Configuration error for '{path}': {message}")]
    Config { path: String, message: String },

    #[error(transparent)]
    Mapping(#[from] report_mapping::Error),
}

impl Error {
    /// Create a structured I/O error with operation/path context.
    pub fn io(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a persist error for the output destination.
    pub fn persist(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persist {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a rejection error naming the input that stopped the batch.
    pub fn rejected(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error for a config source.
    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("io", "<unknown>", e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_error_preserves_path_context() {
        let error = Error::persist("/tmp/cucumber.json", "permission denied");
        match &error {
            Error::Persist { path, message } => {
                assert_eq!(path, "/tmp/cucumber.json");
                assert_eq!(message, "permission denied");
            }
            _ => panic!("expected persist variant"),
        }
        assert_eq!(
            error.to_string(),
            "Failed to persist report to '/tmp/cucumber.json': permission denied"
        );
    }

    #[test]
    fn io_error_from_std_error_has_fallback_context() {
        let io_error = std::fs::File::open("/path/that/does/not/exist")
            .map_err(Error::from)
            .expect_err("open should fail");

        match io_error {
            Error::Io {
                operation,
                path,
                message,
            } => {
                assert_eq!(operation, "io");
                assert_eq!(path, "<unknown>");
                assert!(!message.is_empty());
            }
            _ => panic!("expected io variant"),
        }
    }

    #[test]
    fn mapping_error_is_transparent() {
        let error = Error::from(report_mapping::Error::validation(
            report_mapping::MISSING_SCENARIO_RESULTS,
            "a.feature",
        ));
        assert_eq!(
            error.to_string(),
            "Validation error for 'a.feature': missing or non-list scenario results"
        );
    }
}
