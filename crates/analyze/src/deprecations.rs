//! Audit of newly WARNING-deprecated properties.
//!
//! Every DEPRECATE entry whose newer side is deprecated at WARNING level is
//! checked against the newer snapshot: its declared replacement must exist,
//! either verbatim or as an entry of a map-typed property.

use serde::Serialize;

use keyshift_core::{resolve_replacement, DiffResult, DiffType, Replacement, Resolution};
use keyshift_metadata::{DeprecationLevel, MetadataRepository};

use crate::sentence::first_sentence;

/// A deprecation whose replacement resolves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDeprecation {
    pub id: String,
    pub replacement: String,
    /// Id of the property that receives the value; differs from
    /// `replacement` when it collapsed into a map.
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_key: Option<String>,
}

/// A deprecation whose declared replacement does not exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidDeprecation {
    pub id: String,
    pub replacement: String,
}

/// A deprecation without a replacement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnreplacedDeprecation {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Bucketed deprecations, each bucket sorted by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeprecationAudit {
    pub valid: Vec<ResolvedDeprecation>,
    pub invalid: Vec<InvalidDeprecation>,
    pub no_replacement: Vec<UnreplacedDeprecation>,
}

impl DeprecationAudit {
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len() + self.no_replacement.len()
    }
}

/// Bucket the WARNING-level deprecations of `diff` by how their replacement
/// resolves in `target`.
pub fn audit_deprecations<R>(diff: &DiffResult, target: &R) -> DeprecationAudit
where
    R: MetadataRepository + ?Sized,
{
    let mut audit = DeprecationAudit::default();

    for entry in diff.properties_for(DiffType::Deprecate) {
        let Some(property) = entry.right() else {
            continue;
        };
        if !property.is_deprecated_at(DeprecationLevel::Warning) {
            continue;
        }

        match resolve_replacement(property, target) {
            Resolution::Resolved {
                candidate,
                replacement,
            } => {
                let map_key = match &replacement {
                    Replacement::MapEntry { key, .. } => Some(key.clone()),
                    Replacement::Direct { .. } => None,
                };
                audit.valid.push(ResolvedDeprecation {
                    id: property.id.clone(),
                    replacement: candidate,
                    target: replacement.property().id.clone(),
                    map_key,
                });
            }
            Resolution::Invalid { candidate } => {
                tracing::debug!(
                    "replacement '{}' of '{}' does not exist",
                    candidate,
                    property.id
                );
                audit.invalid.push(InvalidDeprecation {
                    id: property.id.clone(),
                    replacement: candidate,
                });
            }
            Resolution::NoReplacement => {
                let reason = property
                    .deprecation
                    .as_ref()
                    .and_then(|d| d.reason.as_deref())
                    .map(first_sentence);
                audit.no_replacement.push(UnreplacedDeprecation {
                    id: property.id.clone(),
                    reason,
                });
            }
        }
    }

    audit.valid.sort_by(|a, b| a.id.cmp(&b.id));
    audit.invalid.sort_by(|a, b| a.id.cmp(&b.id));
    audit.no_replacement.sort_by(|a, b| a.id.cmp(&b.id));
    audit
}
