//! Report persistence
//!
//! The output is written to a temporary file next to the destination and
//! renamed into place, so a failed run never leaves a truncated report.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use report_model::CucumberFeature;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tempfile::{Builder, NamedTempFile};
use tracing::info;

use crate::{Error, Result};

/// Serialize features as a JSON array.
///
/// `indent` is the number of spaces per level; `0` renders compact JSON.
///
/// # Errors
///
/// Returns [`Error::Persist`] if the features cannot be serialized.
pub fn render_features(features: &[CucumberFeature], indent: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    let rendered = if indent == 0 {
        serde_json::to_writer(&mut buffer, features)
    } else {
        let indent = " ".repeat(indent);
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
        features.serialize(&mut serializer)
    };
    rendered.map_err(|e| Error::persist("<memory>", e.to_string()))?;

    Ok(buffer)
}

/// Write features to `destination`, replacing any existing file.
///
/// # Errors
///
/// Returns [`Error::Persist`] if the report cannot be rendered, written, or
/// moved into place. The destination is left untouched in that case.
pub fn write_features(
    features: &[CucumberFeature],
    destination: impl AsRef<Path>,
    indent: usize,
) -> Result<()> {
    let destination = destination.as_ref();
    let dest_str = destination.display().to_string();
    let persist_error = |e: &dyn std::fmt::Display| Error::persist(&dest_str, e.to_string());

    let rendered = render_features(features, indent)?;

    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = stage_in(directory, destination).map_err(|e| persist_error(&e))?;
    staged.write_all(&rendered).map_err(|e| persist_error(&e))?;
    staged.flush().map_err(|e| persist_error(&e))?;
    staged
        .persist(destination)
        .map_err(|e| persist_error(&e.error))?;

    info!(
        path = %dest_str,
        features = features.len(),
        bytes = rendered.len(),
        "wrote cucumber report"
    );
    Ok(())
}

/// Create the staging file with the permissions the report should end up
/// with: those of the file being replaced, or the umask default for a new one.
fn stage_in(directory: &Path, destination: &Path) -> io::Result<NamedTempFile> {
    let staged = staging_builder().tempfile_in(directory)?;

    if let Ok(existing) = fs::metadata(destination) {
        staged.as_file().set_permissions(existing.permissions())?;
    }
    Ok(staged)
}

#[cfg(unix)]
fn staging_builder<'a, 'b>() -> Builder<'a, 'b> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    // 0o666 under the process umask, as for any newly created file
    let mut builder = Builder::new();
    builder.permissions(Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn staging_builder<'a, 'b>() -> Builder<'a, 'b> {
    Builder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_model::Element;
    use tempfile::TempDir;

    fn feature(name: &str) -> CucumberFeature {
        let element = Element::scenario("1970-01-01T00:00:00.000Z", 2, "s", "", "[1:2]", Vec::new());
        CucumberFeature::new(1, name, name, name, format!("{name}.feature"), vec![element])
    }

    #[test]
    fn test_render_uses_four_space_indent() {
        let rendered = render_features(&[feature("a")], 4).unwrap();
        let text = String::from_utf8(rendered).unwrap();

        assert!(text.starts_with("[\n    {\n        \"line\": 1,"));
    }

    #[test]
    fn test_render_compact() {
        let rendered = render_features(&[feature("a")], 0).unwrap();
        let text = String::from_utf8(rendered).unwrap();

        assert!(!text.contains('\n'));
        assert!(text.starts_with("[{\"line\":1,"));
    }

    #[test]
    fn test_render_empty_batch() {
        let rendered = render_features(&[], 4).unwrap();
        assert_eq!(rendered, b"[]");
    }

    #[test]
    fn test_write_replaces_destination() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("cucumber.json");
        std::fs::write(&destination, "stale").unwrap();

        write_features(&[feature("a"), feature("b")], &destination, 4).unwrap();

        let written: Vec<CucumberFeature> =
            serde_json::from_str(&std::fs::read_to_string(&destination).unwrap()).unwrap();
        assert_eq!(written, vec![feature("a"), feature("b")]);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("missing").join("cucumber.json");

        let error = write_features(&[feature("a")], &destination, 4).unwrap_err();

        assert!(matches!(error, Error::Persist { .. }));
        assert!(!destination.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_report_gets_default_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("cucumber.json");
        let reference = dir.path().join("reference.json");
        std::fs::write(&reference, "[]").unwrap();

        write_features(&[feature("a")], &destination, 4).unwrap();

        let mode = |path: &Path| std::fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&destination), mode(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_replaced_report_keeps_existing_mode() {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("cucumber.json");
        std::fs::write(&destination, "stale").unwrap();
        std::fs::set_permissions(&destination, Permissions::from_mode(0o640)).unwrap();

        write_features(&[feature("a")], &destination, 4).unwrap();

        let mode = std::fs::metadata(&destination).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
