//! Per-source outcome of a legacy-key scan, and its diagnostic reports.

use serde::Serialize;
use std::fmt::Write;

use keyshift_metadata::Property;

use crate::source::ValueRecord;

/// A configured value whose key is deprecated in the target metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyProperty {
    pub metadata: Property,
    pub record: ValueRecord,
}

impl LegacyProperty {
    pub fn new(metadata: Property, record: ValueRecord) -> Self {
        LegacyProperty { metadata, record }
    }

    pub fn replacement(&self) -> Option<&str> {
        self.metadata
            .deprecation
            .as_ref()
            .and_then(|d| d.replacement_id())
    }

    pub fn reason(&self) -> Option<&str> {
        self.metadata
            .deprecation
            .as_ref()
            .and_then(|d| d.reason.as_deref())
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    fn line(&self) -> Option<u32> {
        self.record.origin.as_ref().and_then(|o| o.line)
    }
}

/// Legacy entries found in one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceAnalysis {
    pub source: String,
    /// ERROR-level entries that were remapped.
    pub handled: Vec<LegacyProperty>,
    /// ERROR-level entries that could not be remapped.
    pub not_handled: Vec<LegacyProperty>,
    /// WARNING-level entries; still honoured, never remapped.
    pub warnings: Vec<LegacyProperty>,
}

impl SourceAnalysis {
    pub fn new(source: impl Into<String>) -> Self {
        SourceAnalysis {
            source: source.into(),
            handled: Vec::new(),
            not_handled: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn has_errors(&self) -> bool {
        !self.handled.is_empty() || !self.not_handled.is_empty()
    }

    fn is_empty(&self) -> bool {
        !self.has_errors() && self.warnings.is_empty()
    }
}

/// Legacy entries of every scanned source, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LegacyAnalysis {
    sources: Vec<SourceAnalysis>,
}

impl LegacyAnalysis {
    /// Record a source; sources without any entry are skipped.
    pub(crate) fn register(&mut self, analysis: SourceAnalysis) {
        if !analysis.is_empty() {
            self.sources.push(analysis);
        }
    }

    pub fn sources(&self) -> &[SourceAnalysis] {
        &self.sources
    }

    pub fn source(&self, name: &str) -> Option<&SourceAnalysis> {
        self.sources.iter().find(|s| s.source == name)
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.source.as_str())
    }

    pub fn handled(&self, source: &str) -> &[LegacyProperty] {
        self.source(source)
            .map(|s| s.handled.as_slice())
            .unwrap_or_default()
    }

    pub fn not_handled(&self, source: &str) -> &[LegacyProperty] {
        self.source(source)
            .map(|s| s.not_handled.as_slice())
            .unwrap_or_default()
    }

    pub fn warnings(&self, source: &str) -> &[LegacyProperty] {
        self.source(source)
            .map(|s| s.warnings.as_slice())
            .unwrap_or_default()
    }

    pub fn renamed_count(&self) -> usize {
        self.sources.iter().map(|s| s.handled.len()).sum()
    }

    pub fn unhandled_count(&self) -> usize {
        self.sources.iter().map(|s| s.not_handled.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.sources.iter().map(|s| s.warnings.len()).sum()
    }

    /// No ERROR-level entry was found.
    pub fn is_empty(&self) -> bool {
        !self.sources.iter().any(SourceAnalysis::has_errors)
    }

    /// Diagnostic listing every ERROR-level entry, or `None` when there is
    /// none. Entries that could not be remapped are flagged with `(!)`.
    pub fn error_report(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut out = String::new();
        out.push_str(
            "Configuration keys that are no longer supported were found in the environment\n\n",
        );
        for source in self.sources.iter().filter(|s| s.has_errors()) {
            let _ = writeln!(out, "Property source '{}'", source.source);
            let mut all: Vec<(&LegacyProperty, bool)> = source
                .handled
                .iter()
                .map(|p| (p, false))
                .chain(source.not_handled.iter().map(|p| (p, true)))
                .collect();
            all.sort_by(|a, b| a.0.metadata.id.cmp(&b.0.metadata.id));
            for (property, flagged) in all {
                out.push_str(if flagged { "(!)" } else { "   " });
                out.push('\t');
                write_entry(&mut out, property);
            }
            out.push_str("\n\n");
        }
        let _ = writeln!(
            out,
            "{} entries have been automatically renamed and {} entries could not be handled (flagged with '(!)')",
            self.renamed_count(),
            self.unhandled_count()
        );
        out.push_str(
            "All entries must be renamed (if an alternative exists) or reviewed with the provided reason.\n",
        );
        Some(out)
    }

    /// Diagnostic listing every WARNING-level entry, or `None` when there is
    /// none.
    pub fn warning_report(&self) -> Option<String> {
        if self.warning_count() == 0 {
            return None;
        }
        let mut out = String::new();
        out.push_str("Configuration keys that are deprecated were found in the environment\n\n");
        for source in self.sources.iter().filter(|s| !s.warnings.is_empty()) {
            let _ = writeln!(out, "Property source '{}'", source.source);
            let mut warnings: Vec<&LegacyProperty> = source.warnings.iter().collect();
            warnings.sort_by(|a, b| a.metadata.id.cmp(&b.metadata.id));
            for property in warnings {
                out.push('\t');
                write_entry(&mut out, property);
            }
            out.push_str("\n\n");
        }
        let _ = writeln!(
            out,
            "{} entries are still supported but should be migrated",
            self.warning_count()
        );
        Some(out)
    }
}

fn write_entry(out: &mut String, property: &LegacyProperty) {
    match property.line() {
        Some(line) => {
            let _ = write!(out, "line {:03} ", line);
        }
        None => out.push_str("          "),
    }
    out.push_str(&property.record.name);
    if let Some(replacement) = property.replacement() {
        let _ = write!(out, " -> {}", replacement);
    } else if let Some(reason) = property.reason() {
        let _ = write!(out, " - reason: {}", reason);
    }
    out.push('\n');
}
