//! Pipeline orchestration
//!
//! This module provides the main pipeline for converting a batch of Karate
//! reports into a single Cucumber JSON report.

use std::path::Path;
use std::time::{Duration, Instant};

use report_mapping::RecordMapper;
use report_model::CucumberFeature;
use tracing::{error, info};

use crate::loader::{SourceInput, load_sources};
use crate::writer::write_features;
use crate::{ConverterConfig, Error, Result};

/// Trait for mapping integration
pub trait Mapper {
    /// Map the raw JSON text of one input to a feature
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be parsed, validated, or mapped.
    fn map_document(&self, text: &str) -> report_mapping::Result<CucumberFeature>;
}

impl Mapper for RecordMapper {
    fn map_document(&self, text: &str) -> report_mapping::Result<CucumberFeature> {
        self.map_str(text)
    }
}

/// Main pipeline for converting report batches
#[derive(Debug, Default)]
pub struct ConversionPipeline {
    /// Pipeline configuration
    config: ConverterConfig,
    /// Mapper applied to every input
    mapper: RecordMapper,
    /// Processing statistics
    stats: PipelineStats,
}

/// Statistics for pipeline processing
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineStats {
    /// Total inputs processed
    pub files_processed: usize,
    /// Inputs converted to a feature
    pub files_converted: usize,
    /// Inputs skipped or rejected
    pub files_failed: usize,
    /// Scenarios written across all converted features
    pub scenarios_converted: usize,
    /// Steps written across all converted features
    pub steps_converted: usize,
    /// Total processing time
    pub total_processing_time: Duration,
}

/// Outcome of processing a single input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    /// Input origin
    pub origin: String,
    /// Whether the input was converted
    pub success: bool,
    /// Error message if the input was skipped
    pub error: Option<String>,
    /// Number of scenarios converted
    pub scenario_count: usize,
    /// Number of steps converted
    pub step_count: usize,
}

/// Result of converting a batch
#[derive(Debug)]
pub struct ConversionReport {
    /// Converted features, in input order
    pub features: Vec<CucumberFeature>,
    /// Outcome for every input, in input order
    pub file_results: Vec<FileResult>,
    /// Total inputs
    pub total_files: usize,
    /// Inputs converted
    pub converted_files: usize,
    /// Inputs skipped
    pub failed_files: usize,
    /// Total processing time
    pub total_duration: Duration,
}

impl ConversionReport {
    /// Inputs that were skipped.
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.file_results.iter().filter(|result| !result.success)
    }
}

impl ConversionPipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            mapper: RecordMapper::new(),
            stats: PipelineStats::default(),
        }
    }

    /// Create a pipeline with default configuration
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Convert inputs that are already loaded, using the record mapper.
    ///
    /// # Errors
    ///
    /// Under [`FailAll`](crate::AcceptancePolicy::FailAll), returns [`Error::Rejected`] for the
    /// first input that cannot be converted. Under the default policy bad
    /// inputs are reported and skipped and this never fails.
    pub fn convert_sources(&mut self, inputs: Vec<SourceInput>) -> Result<ConversionReport> {
        let mapper = self.mapper;
        self.convert_sources_with(inputs, &mapper)
    }

    /// Convert inputs that are already loaded, using the given mapper.
    ///
    /// # Errors
    ///
    /// See [`ConversionPipeline::convert_sources`].
    pub fn convert_sources_with(
        &mut self,
        inputs: Vec<SourceInput>,
        mapper: &dyn Mapper,
    ) -> Result<ConversionReport> {
        let start = Instant::now();
        let total_files = inputs.len();
        let mut features = Vec::new();
        let mut file_results = Vec::with_capacity(total_files);

        for input in inputs {
            let file_start = Instant::now();
            let origin = input.origin;
            let converted = input
                .content
                .and_then(|text| mapper.map_document(&text).map_err(Error::from));

            self.stats.files_processed += 1;
            self.stats.total_processing_time += file_start.elapsed();

            match converted {
                Ok(feature) => {
                    let scenario_count = feature.elements.len();
                    let step_count = feature.step_count();
                    self.stats.files_converted += 1;
                    self.stats.scenarios_converted += scenario_count;
                    self.stats.steps_converted += step_count;

                    file_results.push(FileResult {
                        origin,
                        success: true,
                        error: None,
                        scenario_count,
                        step_count,
                    });
                    features.push(feature);
                }
                Err(e) => {
                    self.stats.files_failed += 1;
                    error!(origin = %origin, error = %e, "input could not be converted");

                    if self.config.acceptance_policy.rejects_on_failure() {
                        return Err(Error::rejected(origin, e.to_string()));
                    }

                    file_results.push(FileResult {
                        origin,
                        success: false,
                        error: Some(e.to_string()),
                        scenario_count: 0,
                        step_count: 0,
                    });
                }
            }
        }

        let converted_files = features.len();
        let report = ConversionReport {
            features,
            file_results,
            total_files,
            converted_files,
            failed_files: total_files - converted_files,
            total_duration: start.elapsed(),
        };

        info!(
            total = report.total_files,
            converted = report.converted_files,
            failed = report.failed_files,
            "converted batch"
        );
        Ok(report)
    }

    /// Read and convert input files, in the order given.
    ///
    /// # Errors
    ///
    /// See [`ConversionPipeline::convert_sources`]. Unreadable files are bad
    /// inputs, not errors.
    pub async fn convert_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<ConversionReport> {
        let inputs = load_sources(paths, self.config.max_file_size).await;
        self.convert_sources(inputs)
    }

    /// Write converted features to `destination` using the configured
    /// indentation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persist`] if the report cannot be written.
    pub fn write_report(
        &self,
        features: &[CucumberFeature],
        destination: impl AsRef<Path>,
    ) -> Result<()> {
        write_features(features, destination, self.config.indent)
    }

    /// Get current statistics
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = PipelineStats::default();
    }

    /// Get configuration
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }
}
