//! Concurrent loading of input reports
//!
//! Inputs are read on the tokio runtime, one task per file. Read failures
//! stay attached to their input so the pipeline can report and skip them
//! like any other bad input.

use std::path::{Path, PathBuf};

use tokio::task::JoinSet;
use tracing::{trace, warn};

use crate::{Error, Result};

/// One input report, read or failed.
#[derive(Debug, Clone)]
pub struct SourceInput {
    /// Where the input came from, usually its path
    pub origin: String,
    /// Raw JSON text, or the error that prevented reading it
    pub content: Result<String>,
}

impl SourceInput {
    /// An input whose text is already in memory.
    pub fn text(origin: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            content: Ok(content.into()),
        }
    }

    /// An input that could not be read.
    pub fn failed(origin: impl Into<String>, error: Error) -> Self {
        Self {
            origin: origin.into(),
            content: Err(error),
        }
    }
}

/// Read all inputs concurrently.
///
/// The returned inputs are in the same order as `paths`, regardless of the
/// order in which reads complete. Inputs larger than `max_file_size` bytes
/// are returned as failed without being read.
pub async fn load_sources<P: AsRef<Path>>(paths: &[P], max_file_size: u64) -> Vec<SourceInput> {
    let mut tasks = JoinSet::new();
    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref().to_path_buf();
        tasks.spawn(async move { (index, read_source(path, max_file_size).await) });
    }

    let mut slots: Vec<Option<SourceInput>> = (0..paths.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, input)) => slots[index] = Some(input),
            Err(e) => warn!(error = %e, "source read task did not complete"),
        }
    }

    slots
        .into_iter()
        .zip(paths)
        .map(|(slot, path)| {
            slot.unwrap_or_else(|| {
                let origin = path.as_ref().display().to_string();
                let error = Error::io("read", &origin, "read task did not complete");
                SourceInput::failed(origin, error)
            })
        })
        .collect()
}

async fn read_source(path: PathBuf, max_file_size: u64) -> SourceInput {
    let origin = path.display().to_string();

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) => return SourceInput::failed(&origin, Error::io("stat", &origin, e.to_string())),
    };
    if metadata.len() > max_file_size {
        let message = format!(
            "file too large: {} bytes (max: {} bytes)",
            metadata.len(),
            max_file_size
        );
        return SourceInput::failed(&origin, Error::io("read", &origin, message));
    }

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            trace!(path = %origin, bytes = content.len(), "read source");
            SourceInput::text(origin, content)
        }
        Err(e) => SourceInput::failed(&origin, Error::io("read", &origin, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_preserves_order() {
        let files: Vec<NamedTempFile> = (0..8).map(|i| create_test_file(&format!("{i}"))).collect();
        let paths: Vec<&Path> = files.iter().map(NamedTempFile::path).collect();

        let inputs = load_sources(paths.as_slice(), 1024).await;

        let contents: Vec<String> = inputs
            .into_iter()
            .map(|input| input.content.unwrap())
            .collect();
        let expected: Vec<String> = (0..8).map(|i| i.to_string()).collect();
        assert_eq!(contents, expected);
    }

    #[tokio::test]
    async fn test_missing_file_is_failed_input() {
        let file = create_test_file("{}");
        let paths = vec![
            PathBuf::from("/nonexistent/report.json"),
            file.path().to_path_buf(),
        ];

        let inputs = load_sources(paths.as_slice(), 1024).await;

        assert_eq!(inputs[0].origin, "/nonexistent/report.json");
        assert!(matches!(inputs[0].content, Err(Error::Io { .. })));
        assert_eq!(inputs[1].content.as_deref().unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_file_too_large() {
        let file = create_test_file("This content is definitely more than 10 bytes");

        let inputs = load_sources(&[file.path()][..], 10).await;

        match &inputs[0].content {
            Err(Error::Io { message, .. }) => assert!(message.starts_with("file too large")),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_inputs() {
        let paths: Vec<PathBuf> = Vec::new();
        assert!(load_sources(paths.as_slice(), 1024).await.is_empty());
    }
}
