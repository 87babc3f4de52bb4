use std::path::Path;

use keyshift_core::{diff_repositories_with, DiffSummary, DiffType, EqualityPolicy};

use super::{fail, print_json, read_metadata, version_label};
use crate::OutputFormat;

pub(crate) fn cmd_diff(
    left_path: &Path,
    right_path: &Path,
    left_version: Option<String>,
    right_version: Option<String>,
    equality: EqualityPolicy,
    output: OutputFormat,
    quiet: bool,
) {
    let left_version = left_version.unwrap_or_else(|| version_label(left_path));
    let right_version = right_version.unwrap_or_else(|| version_label(right_path));

    let left = match read_metadata(left_path, &left_version) {
        Ok(r) => r,
        Err(e) => fail(&e, output, quiet),
    };
    let right = match read_metadata(right_path, &right_version) {
        Ok(r) => r,
        Err(e) => fail(&e, output, quiet),
    };

    let diff = diff_repositories_with(&left, &right, |l, r| equality.equals(l, r));

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&diff.to_json()),
        OutputFormat::Text => {
            println!("{} -> {}", diff.left_version(), diff.right_version());
            if diff.is_empty() {
                println!("no differences");
            } else {
                println!("{}", summary_text(&diff.summary()));
            }
        }
    }
}

/// One line per change type, for properties and for groups.
fn summary_text(summary: &DiffSummary) -> String {
    DiffType::ALL
        .iter()
        .map(|t| {
            format!(
                "{:<10} {:>5} properties {:>5} groups",
                t.to_string(),
                summary.properties.count(*t),
                summary.groups.count(*t)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
