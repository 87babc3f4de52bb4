//! Assembly of metadata snapshots from JSON metadata documents.
//!
//! The main entry point is [`MetadataRepositoryBuilder`], which accepts any
//! number of documents (one per published artifact) and merges them into a
//! single [`SimpleMetadataRepository`].

use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};

use crate::repository::{SimpleMetadataRepository, ROOT_GROUP};
use crate::types::{Deprecation, DeprecationLevel, Group, Property, PropertyType};

/// Errors while reading metadata documents.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The document does not follow the metadata JSON format.
    #[error("invalid metadata document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// A group or property was declared with a blank name.
    #[error("{kind} declared with an empty name")]
    EmptyName { kind: &'static str },

    /// A deprecation object carries an explicit `null` level.
    #[error("property '{id}' has a deprecation without a level")]
    MissingDeprecationLevel { id: String },

    /// The same property id appears in more than one group.
    #[error("property '{id}' is owned by more than one group")]
    DuplicateProperty { id: String },
}

// ── Raw document shape ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    groups: Vec<RawGroup>,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    name: String,
    #[serde(rename = "type")]
    type_name: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperty {
    name: String,
    #[serde(rename = "type")]
    type_name: Option<String>,
    source_type: Option<String>,
    description: Option<String>,
    default_value: Option<serde_json::Value>,
    #[serde(default)]
    deprecated: bool,
    deprecation: Option<RawDeprecation>,
}

#[derive(Debug, Deserialize)]
struct RawDeprecation {
    // Missing -> None, explicit null -> Some(None).
    #[serde(default, deserialize_with = "present_or_null")]
    level: Option<Option<RawLevel>>,
    replacement: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawLevel {
    #[serde(alias = "WARNING")]
    Warning,
    #[serde(alias = "ERROR")]
    Error,
}

impl From<RawLevel> for DeprecationLevel {
    fn from(level: RawLevel) -> Self {
        match level {
            RawLevel::Warning => DeprecationLevel::Warning,
            RawLevel::Error => DeprecationLevel::Error,
        }
    }
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<RawLevel>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawLevel>::deserialize(deserializer).map(Some)
}

// ── Builder ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct GroupDescriptor {
    type_name: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone)]
struct PendingProperty {
    property: Property,
    source_type: Option<String>,
}

/// Collects groups and properties, then freezes them into a snapshot.
///
/// On duplicate ids the first registration wins.
#[derive(Debug, Clone, Default)]
pub struct MetadataRepositoryBuilder {
    groups: BTreeMap<String, GroupDescriptor>,
    properties: Vec<PendingProperty>,
    property_ids: BTreeSet<String>,
}

impl MetadataRepositoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a group.
    pub fn with_group(
        mut self,
        id: impl Into<String>,
        type_name: Option<String>,
        description: Option<String>,
    ) -> Self {
        self.add_group(id.into(), type_name, description);
        self
    }

    /// Register a property. `source_type` narrows group assignment.
    pub fn with_property(mut self, property: Property, source_type: Option<String>) -> Self {
        self.add_property(property, source_type);
        self
    }

    /// Merge a metadata JSON document.
    pub fn with_json(mut self, document: &serde_json::Value) -> Result<Self, MetadataError> {
        let raw = RawDocument::deserialize(document)?;
        self.merge(raw)?;
        Ok(self)
    }

    /// Merge a metadata JSON document given as text.
    pub fn with_json_str(mut self, document: &str) -> Result<Self, MetadataError> {
        let raw: RawDocument = serde_json::from_str(document)?;
        self.merge(raw)?;
        Ok(self)
    }

    /// Freeze everything registered so far into a snapshot labelled `version`.
    pub fn build(self, version: impl Into<String>) -> SimpleMetadataRepository {
        let mut groups: BTreeMap<String, Group> = self
            .groups
            .iter()
            .map(|(id, descriptor)| {
                let mut group = Group::new(id.clone());
                group.type_name = descriptor.type_name.clone();
                group.description = descriptor.description.clone();
                (id.clone(), group)
            })
            .collect();

        for pending in self.properties {
            let owner = owning_group(
                &self.groups,
                &pending.property.id,
                pending.source_type.as_deref(),
            )
            .to_string();
            groups
                .entry(owner.clone())
                .or_insert_with(|| Group::new(owner))
                .properties
                .insert(pending.property.id.clone(), pending.property);
        }

        SimpleMetadataRepository::from_disjoint_groups(version, groups.into_values())
    }

    fn merge(&mut self, raw: RawDocument) -> Result<(), MetadataError> {
        for group in raw.groups {
            if group.name.trim().is_empty() {
                return Err(MetadataError::EmptyName { kind: "group" });
            }
            self.add_group(group.name, group.type_name, group.description);
        }
        for raw_property in raw.properties {
            let (property, source_type) = convert_property(raw_property)?;
            self.add_property(property, source_type);
        }
        Ok(())
    }

    fn add_group(&mut self, id: String, type_name: Option<String>, description: Option<String>) {
        if self.groups.contains_key(&id) {
            tracing::debug!("ignoring duplicate declaration of group '{}'", id);
            return;
        }
        self.groups.insert(
            id,
            GroupDescriptor {
                type_name,
                description,
            },
        );
    }

    fn add_property(&mut self, property: Property, source_type: Option<String>) {
        if !self.property_ids.insert(property.id.clone()) {
            tracing::debug!("ignoring duplicate declaration of property '{}'", property.id);
            return;
        }
        self.properties.push(PendingProperty {
            property,
            source_type,
        });
    }
}

fn convert_property(raw: RawProperty) -> Result<(Property, Option<String>), MetadataError> {
    if raw.name.trim().is_empty() {
        return Err(MetadataError::EmptyName { kind: "property" });
    }

    let deprecation = match raw.deprecation {
        Some(d) => {
            let level = match d.level {
                None => DeprecationLevel::Warning,
                Some(Some(level)) => level.into(),
                Some(None) => {
                    return Err(MetadataError::MissingDeprecationLevel { id: raw.name });
                }
            };
            Some(Deprecation {
                level,
                replacement: d.replacement,
                reason: d.reason,
            })
        }
        None if raw.deprecated => Some(Deprecation::warning()),
        None => None,
    };

    let property = Property {
        id: raw.name,
        declared_type: raw.type_name.map(PropertyType::new),
        default_value: raw.default_value.filter(|v| !v.is_null()),
        description: raw.description,
        deprecation,
    };
    Ok((property, raw.source_type))
}

/// Longest declared group whose id is a dot-prefix of `property_id`.
///
/// When the property names a source type and some prefix group declares the
/// same type, only those groups are candidates.
fn owning_group<'a>(
    groups: &'a BTreeMap<String, GroupDescriptor>,
    property_id: &str,
    source_type: Option<&str>,
) -> &'a str {
    let prefixes: Vec<(&'a String, &'a GroupDescriptor)> = groups
        .iter()
        .filter(|(id, _)| id.as_str() != ROOT_GROUP && is_dot_prefix(id, property_id))
        .collect();

    let typed: Vec<(&'a String, &'a GroupDescriptor)> = match source_type {
        Some(st) => prefixes
            .iter()
            .copied()
            .filter(|(_, d)| d.type_name.as_deref() == Some(st))
            .collect(),
        None => Vec::new(),
    };

    let pool = if typed.is_empty() { prefixes } else { typed };
    pool.into_iter()
        .map(|(id, _)| id)
        .max_by_key(|id| id.len())
        .map(String::as_str)
        .unwrap_or(ROOT_GROUP)
}

fn is_dot_prefix(prefix: &str, id: &str) -> bool {
    !prefix.is_empty()
        && id.len() > prefix.len()
        && id.starts_with(prefix)
        && id.as_bytes()[prefix.len()] == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MetadataRepository;
    use serde_json::json;

    fn sample_document() -> serde_json::Value {
        json!({
            "groups": [
                { "name": "server", "type": "com.example.ServerProperties" },
                { "name": "server.ssl", "type": "com.example.Ssl" }
            ],
            "properties": [
                {
                    "name": "server.port",
                    "type": "java.lang.Integer",
                    "sourceType": "com.example.ServerProperties",
                    "description": "Server HTTP port.",
                    "defaultValue": 8080
                },
                {
                    "name": "server.ssl.enabled",
                    "type": "java.lang.Boolean",
                    "sourceType": "com.example.Ssl"
                },
                {
                    "name": "server.legacy",
                    "type": "java.lang.String",
                    "deprecation": {
                        "level": "error",
                        "replacement": "server.port",
                        "reason": "Gone."
                    }
                },
                {
                    "name": "debug",
                    "type": "java.lang.Boolean",
                    "deprecated": true
                }
            ],
            "hints": [{ "name": "server.port", "values": [] }]
        })
    }

    #[test]
    fn builds_groups_and_properties() {
        let repo = MetadataRepositoryBuilder::new()
            .with_json(&sample_document())
            .unwrap()
            .build("2.0");

        assert_eq!(repo.version(), "2.0");
        assert_eq!(repo.all_properties().len(), 4);

        let server = &repo.all_groups()["server"];
        assert_eq!(server.type_name.as_deref(), Some("com.example.ServerProperties"));
        assert!(server.properties.contains_key("server.port"));
        assert!(server.properties.contains_key("server.legacy"));

        let ssl = &repo.all_groups()["server.ssl"];
        assert!(ssl.properties.contains_key("server.ssl.enabled"));

        let root = &repo.all_groups()[ROOT_GROUP];
        assert!(root.properties.contains_key("debug"));
    }

    #[test]
    fn deprecation_fields_are_read() {
        let repo = MetadataRepositoryBuilder::new()
            .with_json(&sample_document())
            .unwrap()
            .build("2.0");

        let legacy = repo.property("server.legacy").unwrap();
        let deprecation = legacy.deprecation.as_ref().unwrap();
        assert_eq!(deprecation.level, DeprecationLevel::Error);
        assert_eq!(deprecation.replacement.as_deref(), Some("server.port"));
        assert_eq!(deprecation.reason.as_deref(), Some("Gone."));

        // "deprecated": true without details means a plain warning
        let debug = repo.property("debug").unwrap();
        assert_eq!(debug.deprecation, Some(Deprecation::warning()));

        let port = repo.property("server.port").unwrap();
        assert_eq!(port.default_value, Some(json!(8080)));
        assert!(!port.is_deprecated());
    }

    #[test]
    fn missing_level_defaults_to_warning() {
        let repo = MetadataRepositoryBuilder::new()
            .with_json(&json!({
                "properties": [
                    { "name": "a.b", "deprecation": { "replacement": "a.c" } }
                ]
            }))
            .unwrap()
            .build("1.0");
        let p = repo.property("a.b").unwrap();
        assert!(p.is_deprecated_at(DeprecationLevel::Warning));
    }

    #[test]
    fn null_level_is_rejected() {
        let result = MetadataRepositoryBuilder::new().with_json(&json!({
            "properties": [
                { "name": "a.b", "deprecation": { "level": null } }
            ]
        }));
        match result {
            Err(MetadataError::MissingDeprecationLevel { id }) => assert_eq!(id, "a.b"),
            other => panic!("expected MissingDeprecationLevel, got {:?}", other),
        }
    }

    #[test]
    fn unknown_level_is_rejected() {
        let result = MetadataRepositoryBuilder::new().with_json(&json!({
            "properties": [
                { "name": "a.b", "deprecation": { "level": "fatal" } }
            ]
        }));
        assert!(matches!(result, Err(MetadataError::InvalidDocument(_))));
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = MetadataRepositoryBuilder::new().with_json(&json!({
            "properties": [{ "name": " " }]
        }));
        assert!(matches!(
            result,
            Err(MetadataError::EmptyName { kind: "property" })
        ));
    }

    #[test]
    fn malformed_text_is_rejected() {
        let result = MetadataRepositoryBuilder::new().with_json_str("{ not json");
        assert!(matches!(result, Err(MetadataError::InvalidDocument(_))));
    }

    #[test]
    fn first_registration_wins_across_documents() {
        let repo = MetadataRepositoryBuilder::new()
            .with_json(&json!({
                "properties": [{ "name": "a.b", "type": "java.lang.String" }]
            }))
            .unwrap()
            .with_json(&json!({
                "properties": [{ "name": "a.b", "type": "java.lang.Integer" }]
            }))
            .unwrap()
            .build("1.0");
        assert_eq!(repo.all_properties().len(), 1);
        assert_eq!(
            repo.property("a.b").unwrap().declared_type,
            Some(PropertyType::new("java.lang.String"))
        );
    }

    #[test]
    fn source_type_narrows_group_assignment() {
        let repo = MetadataRepositoryBuilder::new()
            .with_group("spring", Some("com.example.Spring".into()), None)
            .with_group("spring.cache", Some("com.example.Cache".into()), None)
            .with_property(
                Property::new("spring.cache.name"),
                Some("com.example.Spring".into()),
            )
            .with_property(Property::new("spring.cache.type"), None)
            .build("1.0");

        let spring = &repo.all_groups()["spring"];
        assert!(spring.properties.contains_key("spring.cache.name"));
        let cache = &repo.all_groups()["spring.cache"];
        assert!(cache.properties.contains_key("spring.cache.type"));
    }

    #[test]
    fn prefix_must_end_at_a_segment() {
        assert!(is_dot_prefix("server", "server.port"));
        assert!(!is_dot_prefix("server", "servers.port"));
        assert!(!is_dot_prefix("server", "server"));
        assert!(!is_dot_prefix("", "server"));
    }
}
