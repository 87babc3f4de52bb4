use std::path::Path;

use keyshift_migrate::{LegacyRemapper, PropertySources};

use super::{fail, print_json, read_metadata, version_label};
use crate::OutputFormat;

/// Remap the sources and print the resulting ordering as JSON.
///
/// The legacy-key diagnostics go to the log; stdout only carries sources.
pub(crate) fn cmd_migrate(
    metadata_path: &Path,
    sources_path: &Path,
    output: OutputFormat,
    quiet: bool,
) {
    let metadata = match read_metadata(metadata_path, &version_label(metadata_path)) {
        Ok(r) => r,
        Err(e) => fail(&e, output, quiet),
    };
    let content = match std::fs::read_to_string(sources_path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading '{}': {}", sources_path.display(), e);
            fail(&msg, output, quiet)
        }
    };
    let sources = match PropertySources::from_json_str(&content) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error loading sources from '{}': {}", sources_path.display(), e);
            fail(&msg, output, quiet)
        }
    };

    let remapping = LegacyRemapper::new(&metadata).remap(&sources);
    if let Some(report) = remapping.analysis.error_report() {
        tracing::warn!("{}", report);
    }
    if let Some(report) = remapping.analysis.warning_report() {
        tracing::info!("{}", report);
    }

    let remapped = match remapping.apply(&sources) {
        Ok(s) => s,
        Err(e) => fail(&format!("migration error: {}", e), output, quiet),
    };

    if quiet {
        return;
    }
    match serde_json::to_value(&remapped) {
        Ok(json) => print_json(&json),
        Err(e) => fail(&format!("error serializing sources: {}", e), output, quiet),
    }
}
