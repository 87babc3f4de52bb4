//! DeprecationReport: aggregated output of the deprecation audits.
//!
//! The report collects the three audit results and extracts notable
//! findings for summary display.

use serde::Serialize;

use crate::deprecations::DeprecationAudit;
use crate::error_level::ErrorLevelAudit;
use crate::removals::RemovalCandidate;

/// Severity level for an audit finding.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FindingSeverity {
    Info,
    Warning,
}

/// A notable finding from an audit.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub audit: String,
    pub severity: FindingSeverity,
    pub message: String,
    pub property_id: String,
}

/// Aggregated audit report between two snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct DeprecationReport {
    pub previous_version: String,
    pub current_version: String,
    pub deprecations: DeprecationAudit,
    pub error_level: ErrorLevelAudit,
    pub removals: Vec<RemovalCandidate>,
    pub findings: Vec<Finding>,
}

impl DeprecationReport {
    pub fn new(previous_version: impl Into<String>, current_version: impl Into<String>) -> Self {
        DeprecationReport {
            previous_version: previous_version.into(),
            current_version: current_version.into(),
            deprecations: DeprecationAudit::default(),
            error_level: ErrorLevelAudit::default(),
            removals: Vec::new(),
            findings: Vec::new(),
        }
    }

    /// Extract findings from the populated audit results.
    pub fn extract_findings(&mut self) {
        self.findings.clear();

        for invalid in &self.deprecations.invalid {
            self.findings.push(Finding {
                audit: "deprecations".to_string(),
                severity: FindingSeverity::Warning,
                message: format!(
                    "'{}' is deprecated in favour of '{}' which does not exist",
                    invalid.id, invalid.replacement
                ),
                property_id: invalid.id.clone(),
            });
        }

        for entry in self.error_level.suspicious() {
            self.findings.push(Finding {
                audit: "error_level".to_string(),
                severity: FindingSeverity::Warning,
                message: format!(
                    "'{}' is no longer supported but its replacement '{}' still exists",
                    entry.id,
                    entry.replacement.as_deref().unwrap_or_default()
                ),
                property_id: entry.id.clone(),
            });
        }

        for id in &self.error_level.unknown_in_previous {
            self.findings.push(Finding {
                audit: "error_level".to_string(),
                severity: FindingSeverity::Warning,
                message: format!(
                    "'{}' is hard-deprecated but {} never declared it",
                    id, self.previous_version
                ),
                property_id: id.clone(),
            });
        }

        for removal in &self.removals {
            let message = match &removal.deprecation.replacement {
                Some(replacement) => format!(
                    "'{}' was removed without deprecation, maybe replaced by '{}'",
                    removal.name, replacement
                ),
                None => format!("'{}' was removed without deprecation", removal.name),
            };
            self.findings.push(Finding {
                audit: "removals".to_string(),
                severity: FindingSeverity::Info,
                message,
                property_id: removal.name.clone(),
            });
        }
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == FindingSeverity::Warning)
    }
}
