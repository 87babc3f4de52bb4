//! Remapping of configured values keyed by hard-deprecated properties.
//!
//! A value configured under an ERROR-deprecated key is no longer honoured.
//! When the deprecation names a replacement of a compatible type, the value
//! is copied, provenance and all, into a synthetic `migrate-<source>` source
//! keyed by the replacement and placed right before the original source.

use std::collections::BTreeSet;

use serde::Serialize;

use keyshift_core::{resolve_candidate, Replacement};
use keyshift_metadata::{DeprecationLevel, MetadataRepository, Property};

use crate::analysis::{LegacyAnalysis, LegacyProperty, SourceAnalysis};
use crate::error::SourceError;
use crate::source::{PropertySources, ValueRecord, ValueSource};

const OVERRIDE_PREFIX: &str = "migrate-";

/// A synthetic source and the source it must precede.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverrideSource {
    pub before: String,
    pub source: ValueSource,
}

/// Outcome of a remapping pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyRemapping {
    pub analysis: LegacyAnalysis,
    /// Synthetic sources in creation order.
    pub overrides: Vec<OverrideSource>,
}

impl LegacyRemapping {
    /// A new ordering with every override inserted before its source.
    ///
    /// An existing source carrying the override's name, such as one left by
    /// an earlier pass, is replaced. `sources` is left untouched.
    pub fn apply(&self, sources: &PropertySources) -> Result<PropertySources, SourceError> {
        let mut remapped = sources.clone();
        for o in &self.overrides {
            if remapped.remove(&o.source.name).is_some() {
                tracing::debug!("replacing existing source '{}'", o.source.name);
            }
            remapped.add_before(&o.before, o.source.clone())?;
        }
        Ok(remapped)
    }
}

/// Scans value sources against the metadata of a target version.
pub struct LegacyRemapper<'a, R: MetadataRepository + ?Sized> {
    repository: &'a R,
}

impl<'a, R: MetadataRepository + ?Sized> LegacyRemapper<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        LegacyRemapper { repository }
    }

    pub fn remap(&self, sources: &PropertySources) -> LegacyRemapping {
        let mut analysis = LegacyAnalysis::default();
        let mut overrides = Vec::new();

        for source in sources {
            let scanned = self.scan(source);
            if let Some(o) = override_source(&scanned) {
                tracing::info!(
                    "remapped {} legacy key(s) of '{}' into '{}'",
                    o.source.records.len(),
                    source.name,
                    o.source.name
                );
                overrides.push(o);
            }
            analysis.register(scanned);
        }

        LegacyRemapping {
            analysis,
            overrides,
        }
    }

    fn scan(&self, source: &ValueSource) -> SourceAnalysis {
        let mut result = SourceAnalysis::new(source.name.clone());
        let mut seen = BTreeSet::new();

        for record in &source.records {
            if !seen.insert(record.name.as_str()) {
                continue;
            }
            let Some(metadata) = self.repository.property(&record.name) else {
                continue;
            };
            let legacy = LegacyProperty::new(metadata.clone(), record.clone());
            match metadata.deprecation_level() {
                Some(DeprecationLevel::Error) if self.has_valid_replacement(metadata) => {
                    result.handled.push(legacy)
                }
                Some(DeprecationLevel::Error) => result.not_handled.push(legacy),
                Some(DeprecationLevel::Warning) => result.warnings.push(legacy),
                None => {}
            }
        }
        result
    }

    /// The replacement exists and accepts a value of the legacy type, either
    /// directly or as the value type of a map container.
    fn has_valid_replacement(&self, metadata: &Property) -> bool {
        let Some(candidate) = metadata.deprecation.as_ref().and_then(|d| d.replacement_id())
        else {
            return false;
        };
        let Some(legacy_type) = metadata.declared_type.as_ref() else {
            return false;
        };
        match resolve_candidate(candidate, self.repository) {
            Some(Replacement::Direct { property }) => {
                property.declared_type.as_ref() == Some(legacy_type)
            }
            Some(Replacement::MapEntry { container, .. }) => {
                container.declared_type.as_ref().and_then(|t| t.map_value_type())
                    == Some(legacy_type.as_str())
            }
            None => false,
        }
    }
}

fn override_source(scanned: &SourceAnalysis) -> Option<OverrideSource> {
    if scanned.handled.is_empty() {
        return None;
    }
    let mut source = ValueSource::new(format!("{}{}", OVERRIDE_PREFIX, scanned.source));
    for legacy in &scanned.handled {
        let Some(replacement) = legacy.replacement() else {
            continue;
        };
        // earliest legacy key wins when several share a replacement
        if source.get(replacement).is_some() {
            tracing::debug!(
                "'{}' in '{}' shadowed by an earlier key renamed to '{}'",
                legacy.record.name,
                scanned.source,
                replacement
            );
            continue;
        }
        source.records.push(ValueRecord {
            name: replacement.to_string(),
            value: legacy.record.value.clone(),
            origin: legacy.record.origin.clone(),
        });
    }
    Some(OverrideSource {
        before: scanned.source.clone(),
        source,
    })
}
