//! Audit of ERROR-level deprecations in a snapshot.

use serde::Serialize;

use keyshift_metadata::{sort_properties, DeprecationLevel, MetadataRepository};

/// One ERROR-deprecated property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorLevelEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The replacement is itself a live property of the same snapshot. A hard
    /// removal pointing at a key that still exists is suspicious.
    pub replacement_exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorLevelAudit {
    pub entries: Vec<ErrorLevelEntry>,
    /// ERROR-deprecated ids that the previous snapshot never declared.
    pub unknown_in_previous: Vec<String>,
}

impl ErrorLevelAudit {
    pub fn suspicious(&self) -> impl Iterator<Item = &ErrorLevelEntry> {
        self.entries.iter().filter(|e| e.replacement_exists)
    }
}

/// List the ERROR-deprecated properties of `current`, sorted by id.
pub fn audit_error_level<C, P>(current: &C, previous: &P) -> ErrorLevelAudit
where
    C: MetadataRepository + ?Sized,
    P: MetadataRepository + ?Sized,
{
    let mut audit = ErrorLevelAudit::default();
    let errors = sort_properties(
        current
            .all_properties()
            .values()
            .filter(|p| p.is_deprecated_at(DeprecationLevel::Error)),
    );

    for property in errors {
        let deprecation = property.deprecation.as_ref();
        let replacement = deprecation.and_then(|d| d.replacement_id()).map(String::from);
        let replacement_exists = replacement
            .as_deref()
            .is_some_and(|r| current.property(r).is_some());

        if previous.property(&property.id).is_none() {
            tracing::debug!(
                "'{}' is ERROR deprecated in {} but unknown in {}",
                property.id,
                current.version(),
                previous.version()
            );
            audit.unknown_in_previous.push(property.id.clone());
        }

        audit.entries.push(ErrorLevelEntry {
            id: property.id.clone(),
            replacement,
            reason: deprecation.and_then(|d| d.reason.clone()),
            replacement_exists,
        });
    }

    audit
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyshift_metadata::{Deprecation, Group, Property, SimpleMetadataRepository, ROOT_GROUP};

    fn repo(version: &str, properties: Vec<Property>) -> SimpleMetadataRepository {
        let group = properties
            .into_iter()
            .fold(Group::new(ROOT_GROUP), Group::with_property);
        SimpleMetadataRepository::new(version, vec![group]).unwrap()
    }

    #[test]
    fn lists_error_deprecations_with_replacement_check() {
        let current = repo(
            "2.0",
            vec![
                Property::new("b.gone")
                    .with_deprecation(Deprecation::error().with_replacement("b.live")),
                Property::new("a.gone").with_deprecation(
                    Deprecation::error()
                        .with_replacement("a.missing")
                        .with_reason("Removed."),
                ),
                Property::new("b.live"),
                Property::new("c.soft").with_deprecation(Deprecation::warning()),
            ],
        );
        let previous = repo(
            "1.0",
            vec![Property::new("a.gone"), Property::new("b.gone")],
        );

        let audit = audit_error_level(&current, &previous);
        let ids: Vec<&str> = audit.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a.gone", "b.gone"]);
        assert!(!audit.entries[0].replacement_exists);
        assert_eq!(audit.entries[0].reason.as_deref(), Some("Removed."));
        assert!(audit.entries[1].replacement_exists);
        assert_eq!(audit.suspicious().count(), 1);
        assert!(audit.unknown_in_previous.is_empty());
    }

    #[test]
    fn flags_ids_unknown_in_previous() {
        let current = repo(
            "2.0",
            vec![Property::new("never.seen").with_deprecation(Deprecation::error())],
        );
        let previous = repo("1.0", vec![]);
        let audit = audit_error_level(&current, &previous);
        assert_eq!(audit.unknown_in_previous, vec!["never.seen".to_string()]);
        assert_eq!(audit.entries[0].replacement, None);
        assert!(!audit.entries[0].replacement_exists);
    }
}
