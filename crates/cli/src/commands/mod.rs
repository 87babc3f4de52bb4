pub(crate) mod deprecations;
pub(crate) mod diff;
pub(crate) mod migrate;

use std::path::Path;
use std::process;

use keyshift_metadata::{MetadataRepositoryBuilder, SimpleMetadataRepository};

use crate::{report_error, OutputFormat};

/// Read a metadata JSON file into a snapshot labelled `version`.
pub(crate) fn read_metadata(path: &Path, version: &str) -> Result<SimpleMetadataRepository, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("error reading '{}': {}", path.display(), e))?;
    let builder = MetadataRepositoryBuilder::new()
        .with_json_str(&content)
        .map_err(|e| format!("error loading metadata from '{}': {}", path.display(), e))?;
    let repository = builder.build(version);
    tracing::debug!("loaded metadata {} from '{}'", version, path.display());
    Ok(repository)
}

/// Version label derived from a file name: `metadata-2.0.json` -> `metadata-2.0`.
pub(crate) fn version_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Report `msg` and exit with status 1.
pub(crate) fn fail(msg: &str, output: OutputFormat, quiet: bool) -> ! {
    report_error(msg, output, quiet);
    process::exit(1);
}

pub(crate) fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}
