use std::path::Path;

use keyshift_analyze::{analyze, DeprecationReport};

use super::{fail, print_json, read_metadata, version_label};
use crate::OutputFormat;

pub(crate) fn cmd_deprecations(
    previous_path: &Path,
    current_path: &Path,
    excludes: &[String],
    output: OutputFormat,
    quiet: bool,
) {
    let previous = match read_metadata(previous_path, &version_label(previous_path)) {
        Ok(r) => r,
        Err(e) => fail(&e, output, quiet),
    };
    let current = match read_metadata(current_path, &version_label(current_path)) {
        Ok(r) => r,
        Err(e) => fail(&e, output, quiet),
    };

    let report = analyze(&previous, &current, excludes);
    for finding in report.warnings() {
        tracing::warn!("{}", finding.message);
    }

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "previous_version": report.previous_version,
                "current_version": report.current_version,
                "deprecations": report.deprecations,
                "error_level": report.error_level,
                "removals": report.removals,
                "findings": report.findings,
            });
            print_json(&json);
        }
        OutputFormat::Text => println!("{}", report_text(&report)),
    }
}

/// Bucket counts of every audit.
fn report_text(report: &DeprecationReport) -> String {
    let error_level = &report.error_level;
    [
        format!(
            "{} -> {}",
            report.previous_version, report.current_version
        ),
        format!(
            "deprecations: {} valid, {} invalid, {} without replacement",
            report.deprecations.valid.len(),
            report.deprecations.invalid.len(),
            report.deprecations.no_replacement.len()
        ),
        format!(
            "error level: {} entries, {} with a live replacement, {} unknown in {}",
            error_level.entries.len(),
            error_level.suspicious().count(),
            error_level.unknown_in_previous.len(),
            report.previous_version
        ),
        format!("removals: {} candidates", report.removals.len()),
    ]
    .join("\n")
}
