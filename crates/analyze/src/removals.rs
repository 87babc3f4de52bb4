//! ERROR-level deprecation proposals for properties that disappeared.
//!
//! A key removed without going through a deprecation leaves IDEs silent. The
//! candidates produced here are metadata entries that flag such keys as
//! hard-deprecated, with a best-effort replacement guess that needs review.

use serde::Serialize;

use keyshift_core::{suggest_replacement, DiffResult, DiffType};
use keyshift_metadata::{DeprecationLevel, MetadataRepository};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalDeprecation {
    pub level: DeprecationLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

/// Proposed metadata entry for a removed property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalCandidate {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    pub deprecation: RemovalDeprecation,
}

/// Propose ERROR-level entries for the DELETE entries of `diff`.
///
/// Escalations already carry an ERROR deprecation in `target` and are
/// skipped, as are ids starting with one of `excludes`.
pub fn removal_candidates<R>(
    diff: &DiffResult,
    target: &R,
    excludes: &[String],
) -> Vec<RemovalCandidate>
where
    R: MetadataRepository + ?Sized,
{
    let mut candidates: Vec<RemovalCandidate> = diff
        .properties_for(DiffType::Delete)
        .into_iter()
        .filter(|entry| entry.right().is_none())
        .filter_map(|entry| entry.left())
        .filter(|property| {
            let excluded = excludes.iter().any(|prefix| property.id.starts_with(prefix.as_str()));
            if excluded {
                tracing::debug!("'{}' is excluded from removal candidates", property.id);
            }
            !excluded
        })
        .map(|property| RemovalCandidate {
            name: property.id.clone(),
            declared_type: property
                .declared_type
                .as_ref()
                .map(|t| t.as_str().to_string()),
            deprecation: RemovalDeprecation {
                level: DeprecationLevel::Error,
                replacement: suggest_replacement(&property.id, target).map(|p| p.id.clone()),
            },
        })
        .collect();

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyshift_core::diff_repositories;
    use keyshift_metadata::{Deprecation, Group, Property, SimpleMetadataRepository, ROOT_GROUP};
    use serde_json::json;

    fn repo(version: &str, properties: Vec<Property>) -> SimpleMetadataRepository {
        let group = properties
            .into_iter()
            .fold(Group::new(ROOT_GROUP), Group::with_property);
        SimpleMetadataRepository::new(version, vec![group]).unwrap()
    }

    #[test]
    fn proposes_error_entries_with_suggestions() {
        let left = repo(
            "1.0",
            vec![
                Property::new("server.context-path").with_type("java.lang.String"),
                Property::new("spring.mobile.enabled").with_type("java.lang.Boolean"),
                Property::new("app.obsolete"),
                Property::new("app.escalated").with_deprecation(Deprecation::warning()),
            ],
        );
        let right = repo(
            "2.0",
            vec![
                Property::new("server.servlet.context-path").with_type("java.lang.String"),
                Property::new("app.escalated").with_deprecation(Deprecation::error()),
            ],
        );
        let diff = diff_repositories(&left, &right);
        let candidates = removal_candidates(&diff, &right, &["spring.mobile".to_string()]);

        let json = serde_json::to_value(&candidates).unwrap();
        assert_eq!(
            json,
            json!([
                {
                    "name": "app.obsolete",
                    "deprecation": { "level": "error" }
                },
                {
                    "name": "server.context-path",
                    "type": "java.lang.String",
                    "deprecation": {
                        "level": "error",
                        "replacement": "server.servlet.context-path"
                    }
                }
            ])
        );
    }

    #[test]
    fn hard_removals_are_already_suppressed() {
        let left = repo(
            "1.0",
            vec![Property::new("app.hard").with_deprecation(Deprecation::error())],
        );
        let right = repo("2.0", vec![]);
        let diff = diff_repositories(&left, &right);
        assert!(removal_candidates(&diff, &right, &[]).is_empty());
    }
}
