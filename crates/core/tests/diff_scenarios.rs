//! End-to-end classification scenarios over metadata built from JSON.

use keyshift_core::{
    diff_repositories, resolve_replacement, DiffEntry, DiffResult, DiffType, Resolution,
};
use keyshift_metadata::{
    DeprecationLevel, MetadataRepository, MetadataRepositoryBuilder, Property,
    SimpleMetadataRepository,
};
use serde_json::{json, Value};

fn load(version: &str, document: Value) -> SimpleMetadataRepository {
    MetadataRepositoryBuilder::new()
        .with_json(&document)
        .unwrap()
        .build(version)
}

fn left() -> SimpleMetadataRepository {
    load(
        "1.0",
        json!({
            "groups": [
                { "name": "test", "type": "com.example.TestProperties" }
            ],
            "properties": [
                { "name": "test.equal", "type": "java.lang.String", "sourceType": "com.example.TestProperties" },
                { "name": "test.delete", "type": "java.lang.String" },
                { "name": "test.deprecate", "type": "java.lang.String" },
                {
                    "name": "test.escalate",
                    "type": "java.lang.Integer",
                    "deprecation": { "level": "warning", "replacement": "test.new" }
                },
                {
                    "name": "test.removed.hard",
                    "type": "java.lang.String",
                    "deprecation": { "level": "error" }
                }
            ]
        }),
    )
}

fn right() -> SimpleMetadataRepository {
    load(
        "2.0",
        json!({
            "groups": [
                { "name": "test", "type": "com.example.TestProperties" }
            ],
            "properties": [
                { "name": "test.equal", "type": "java.lang.String", "sourceType": "com.example.TestProperties" },
                {
                    "name": "test.deprecate",
                    "type": "java.lang.String",
                    "deprecation": { "level": "warning", "replacement": "test.new" }
                },
                {
                    "name": "test.escalate",
                    "type": "java.lang.Integer",
                    "deprecation": { "level": "error", "replacement": "test.new", "reason": "Gone." }
                },
                { "name": "test.new", "type": "java.lang.String" },
                { "name": "test.add", "type": "java.lang.String" },
                {
                    "name": "test.added.deprecated",
                    "type": "java.lang.String",
                    "deprecated": true
                }
            ]
        }),
    )
}

fn diff() -> DiffResult {
    diff_repositories(&left(), &right())
}

fn single<'a>(entries: &[&'a DiffEntry<Property>], id: &str) -> &'a DiffEntry<Property> {
    entries
        .iter()
        .copied()
        .find(|e| e.id() == id)
        .unwrap_or_else(|| panic!("no entry for {}", id))
}

#[test]
fn removed_property_is_deleted_without_right_side() {
    let diff = diff();
    let deleted = diff.properties_for(DiffType::Delete);
    let entry = single(&deleted, "test.delete");
    assert_eq!(entry.left().unwrap().id, "test.delete");
    assert!(entry.right().is_none());
}

#[test]
fn new_deprecation_resolves_against_the_newer_snapshot() {
    let diff = diff();
    let target = right();
    let deprecated = diff.properties_for(DiffType::Deprecate);
    assert_eq!(deprecated.len(), 1);
    let entry = single(&deprecated, "test.deprecate");

    let resolution = resolve_replacement(entry.right().unwrap(), &target);
    match resolution {
        Resolution::Resolved {
            candidate,
            replacement,
        } => {
            assert_eq!(candidate, "test.new");
            assert_eq!(replacement.property().id, "test.new");
        }
        other => panic!("expected a resolved replacement, got {:?}", other),
    }
}

#[test]
fn escalation_is_deleted_with_both_sides() {
    let diff = diff();
    let deleted = diff.properties_for(DiffType::Delete);
    let entry = single(&deleted, "test.escalate");
    let left = entry.left().unwrap();
    let right = entry.right().unwrap();
    assert!(left.is_deprecated_at(DeprecationLevel::Warning));
    assert!(right.is_deprecated_at(DeprecationLevel::Error));
    assert_eq!(
        right.deprecation.as_ref().unwrap().reason.as_deref(),
        Some("Gone.")
    );
}

#[test]
fn additions_and_suppressions() {
    let diff = diff();
    let added = diff.properties_for(DiffType::Add);
    let ids: Vec<&str> = added.iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec!["test.add", "test.new"]);

    let all_ids: Vec<&str> = diff.properties().iter().map(|e| e.id()).collect();
    assert!(!all_ids.contains(&"test.added.deprecated"));
    assert!(!all_ids.contains(&"test.removed.hard"));
}

#[test]
fn every_other_id_is_classified_once() {
    let diff = diff();
    let mut ids: Vec<&str> = diff.properties().iter().map(|e| e.id()).collect();
    ids.sort_unstable();
    let before = ids.len();
    ids.dedup();
    assert_eq!(before, ids.len());
    assert_eq!(
        ids,
        vec![
            "test.add",
            "test.delete",
            "test.deprecate",
            "test.equal",
            "test.escalate",
            "test.new"
        ]
    );
    assert_eq!(diff.properties_for(DiffType::Equals).len(), 1);
}

#[test]
fn self_diff_marks_every_group_equal() {
    let repo = right();
    let diff = diff_repositories(&repo, &repo);
    assert_eq!(diff.groups().len(), repo.all_groups().len());
    assert!(diff
        .groups()
        .iter()
        .all(|e| e.diff_type() == DiffType::Equals));
}

#[test]
fn group_membership_change_is_a_modification() {
    let diff = diff();
    assert_eq!(diff.groups().len(), 1);
    let test = &diff.groups()[0];
    assert_eq!(test.id(), "test");
    assert_eq!(test.diff_type(), DiffType::Modify);
    assert_eq!(test.left().unwrap().properties.len(), 5);
}

#[test]
fn json_output_carries_versions_and_summary() {
    let json = diff().to_json();
    assert_eq!(json["left_version"], "1.0");
    assert_eq!(json["right_version"], "2.0");
    assert_eq!(json["summary"]["properties"]["delete"], 2);
    assert_eq!(json["summary"]["properties"]["add"], 2);
    assert_eq!(json["summary"]["properties"]["deprecate"], 1);
}
