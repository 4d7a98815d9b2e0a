//! # report-cli
//!
//! Command-line converter from Karate JSON reports to a Cucumber JSON report.
//!
//! ```text
//! karate2cucumber [--config <FILE>] [--indent <N>] [--fail-fast] <OUTPUT> <INPUT>...
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use report_pipeline::{AcceptancePolicy, ConversionPipeline, ConverterConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "karate2cucumber")]
#[command(about = "Convert Karate JSON reports into a single Cucumber JSON report")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Spaces per indentation level in the output, 0 for compact JSON
    #[arg(long)]
    indent: Option<usize>,

    /// Fail the whole run on the first input that cannot be converted
    #[arg(long)]
    fail_fast: bool,

    /// Output file for the Cucumber JSON report
    output: PathBuf,

    /// Karate JSON report files, converted in the order given
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

impl Cli {
    /// Resolve the effective configuration: file first, then flags.
    fn converter_config(&self) -> anyhow::Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::load(path)?,
            None => ConverterConfig::default(),
        };
        if let Some(indent) = self.indent {
            config = config.indent(indent);
        }
        if self.fail_fast {
            config = config.acceptance_policy(AcceptancePolicy::FailAll);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.converter_config()?;

    tracing::info!(
        "Converting {} input(s) -> {}",
        cli.inputs.len(),
        cli.output.display()
    );

    let mut pipeline = ConversionPipeline::new(config);
    let report = pipeline.convert_files(cli.inputs.as_slice()).await?;

    pipeline
        .write_report(&report.features, &cli.output)
        .with_context(|| format!("Error writing file {}", cli.output.display()))?;

    println!(
        "File {} has been saved with {} features.",
        cli.output.display(),
        report.features.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn output_then_inputs() {
        let cli = Cli::try_parse_from(["karate2cucumber", "out.json", "a.json", "b.json"]).unwrap();

        assert_eq!(cli.output, PathBuf::from("out.json"));
        assert_eq!(cli.inputs, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
    }

    #[test]
    fn requires_at_least_one_input() {
        assert!(Cli::try_parse_from(["karate2cucumber", "out.json"]).is_err());
        assert!(Cli::try_parse_from(["karate2cucumber"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "karate2cucumber",
            "--indent",
            "2",
            "--fail-fast",
            "out.json",
            "a.json",
        ])
        .unwrap();

        let config = cli.converter_config().unwrap();
        assert_eq!(config.indent, 2);
        assert_eq!(config.acceptance_policy, AcceptancePolicy::FailAll);
    }
}
