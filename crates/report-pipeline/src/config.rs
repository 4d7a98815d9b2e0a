//! Converter configuration
//!
//! Configuration can be built in code or loaded from a YAML file:
//!
//! ```yaml
//! indent: 4
//! acceptance_policy: skip_invalid
//! max_file_size: 104857600
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AcceptancePolicy, Error, Result};

/// Default number of spaces used to indent the output report.
pub const DEFAULT_INDENT: usize = 4;

/// Default maximum size of a single input report.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024; // 100MB

/// Configuration for a conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Spaces per indentation level in the output; `0` writes compact JSON
    pub indent: usize,
    /// Policy for inputs that cannot be converted
    pub acceptance_policy: AcceptancePolicy,
    /// Maximum input size in bytes; larger inputs are treated as bad inputs
    pub max_file_size: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            acceptance_policy: AcceptancePolicy::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl ConverterConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output indentation
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set the acceptance policy
    pub fn acceptance_policy(mut self, policy: AcceptancePolicy) -> Self {
        self.acceptance_policy = policy;
        self
    }

    /// Set the maximum input size
    pub fn max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Parse a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not a valid configuration.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::config("<inline>", e.to_string()))
    }

    /// Load a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let text = std::fs::read_to_string(path).map_err(|e| Error::config(&path_str, e.to_string()))?;
        let config: Self =
            serde_yaml::from_str(&text).map_err(|e| Error::config(&path_str, e.to_string()))?;

        debug!(path = %path_str, ?config, "loaded converter config");
        Ok(config)
    }
}
