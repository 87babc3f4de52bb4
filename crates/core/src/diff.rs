use serde::Serialize;
use serde_json::Value;
use std::fmt;

use keyshift_metadata::{Group, Identified, MetadataRepository, Property};

use crate::equality::content_equals;

/// Change category of a single group or property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffType {
    Add,
    Delete,
    Equals,
    Modify,
    Deprecate,
}

impl DiffType {
    pub const ALL: [DiffType; 5] = [
        DiffType::Add,
        DiffType::Delete,
        DiffType::Equals,
        DiffType::Modify,
        DiffType::Deprecate,
    ];
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffType::Add => write!(f, "ADD"),
            DiffType::Delete => write!(f, "DELETE"),
            DiffType::Equals => write!(f, "EQUALS"),
            DiffType::Modify => write!(f, "MODIFY"),
            DiffType::Deprecate => write!(f, "DEPRECATE"),
        }
    }
}

/// A left/right pair tagged with its change category.
///
/// Entries are only built through the constructors below, so the shape always
/// matches the type: ADD has only a right side, DEPRECATE/EQUALS/MODIFY have
/// both, DELETE has a left side and keeps the right one only for an
/// escalation from WARNING to ERROR.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry<T> {
    diff_type: DiffType,
    #[serde(skip_serializing_if = "Option::is_none")]
    left: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right: Option<T>,
}

impl<T> DiffEntry<T> {
    pub fn added(right: T) -> Self {
        DiffEntry {
            diff_type: DiffType::Add,
            left: None,
            right: Some(right),
        }
    }

    pub fn deleted(left: T) -> Self {
        DiffEntry {
            diff_type: DiffType::Delete,
            left: Some(left),
            right: None,
        }
    }

    /// A soft deprecation hardened into a removal; the right side carries the
    /// final replacement and reason.
    pub fn escalated(left: T, right: T) -> Self {
        DiffEntry {
            diff_type: DiffType::Delete,
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn deprecated(left: T, right: T) -> Self {
        DiffEntry {
            diff_type: DiffType::Deprecate,
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn equal(left: T, right: T) -> Self {
        DiffEntry {
            diff_type: DiffType::Equals,
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn modified(left: T, right: T) -> Self {
        DiffEntry {
            diff_type: DiffType::Modify,
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    pub fn left(&self) -> Option<&T> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&T> {
        self.right.as_ref()
    }
}

impl<T: Identified> DiffEntry<T> {
    /// Id of the entry, taken from whichever side is present.
    pub fn id(&self) -> &str {
        self.left
            .as_ref()
            .or(self.right.as_ref())
            .map(Identified::id)
            .unwrap_or_default()
    }
}

/// Per-type entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub add: usize,
    pub delete: usize,
    pub equals: usize,
    pub modify: usize,
    pub deprecate: usize,
}

impl TypeCounts {
    fn tally<T>(entries: &[DiffEntry<T>]) -> Self {
        let mut counts = TypeCounts::default();
        for entry in entries {
            match entry.diff_type {
                DiffType::Add => counts.add += 1,
                DiffType::Delete => counts.delete += 1,
                DiffType::Equals => counts.equals += 1,
                DiffType::Modify => counts.modify += 1,
                DiffType::Deprecate => counts.deprecate += 1,
            }
        }
        counts
    }

    pub fn count(&self, diff_type: DiffType) -> usize {
        match diff_type {
            DiffType::Add => self.add,
            DiffType::Delete => self.delete,
            DiffType::Equals => self.equals,
            DiffType::Modify => self.modify,
            DiffType::Deprecate => self.deprecate,
        }
    }

    /// Entries that are not EQUALS.
    pub fn changes(&self) -> usize {
        self.add + self.delete + self.modify + self.deprecate
    }
}

impl fmt::Display for TypeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} deleted, {} deprecated, {} modified, {} unchanged",
            self.add, self.delete, self.deprecate, self.modify, self.equals
        )
    }
}

/// Summary counts of a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub groups: TypeCounts,
    pub properties: TypeCounts,
}

/// Outcome of comparing two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffResult {
    left_version: String,
    right_version: String,
    groups: Vec<DiffEntry<Group>>,
    properties: Vec<DiffEntry<Property>>,
}

impl DiffResult {
    pub fn new(
        left_version: impl Into<String>,
        right_version: impl Into<String>,
        groups: Vec<DiffEntry<Group>>,
        properties: Vec<DiffEntry<Property>>,
    ) -> Self {
        DiffResult {
            left_version: left_version.into(),
            right_version: right_version.into(),
            groups,
            properties,
        }
    }

    pub fn left_version(&self) -> &str {
        &self.left_version
    }

    pub fn right_version(&self) -> &str {
        &self.right_version
    }

    pub fn groups(&self) -> &[DiffEntry<Group>] {
        &self.groups
    }

    pub fn properties(&self) -> &[DiffEntry<Property>] {
        &self.properties
    }

    pub fn groups_for(&self, diff_type: DiffType) -> Vec<&DiffEntry<Group>> {
        self.groups
            .iter()
            .filter(|e| e.diff_type == diff_type)
            .collect()
    }

    pub fn properties_for(&self, diff_type: DiffType) -> Vec<&DiffEntry<Property>> {
        self.properties
            .iter()
            .filter(|e| e.diff_type == diff_type)
            .collect()
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            groups: TypeCounts::tally(&self.groups),
            properties: TypeCounts::tally(&self.properties),
        }
    }

    /// Returns true if nothing but EQUALS entries were produced.
    pub fn is_empty(&self) -> bool {
        let summary = self.summary();
        summary.groups.changes() == 0 && summary.properties.changes() == 0
    }

    /// Serialize the diff, with its summary, to a JSON value.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "left_version": self.left_version,
            "right_version": self.right_version,
            "summary": self.summary(),
            "groups": self.groups,
            "properties": self.properties,
        })
    }
}

/// Classify groups by membership of their property-id sets.
pub fn diff_groups<L, R>(left: &L, right: &R) -> Vec<DiffEntry<Group>>
where
    L: MetadataRepository + ?Sized,
    R: MetadataRepository + ?Sized,
{
    let left_groups = left.all_groups();
    let right_groups = right.all_groups();
    let mut entries = Vec::new();

    for (id, left_group) in left_groups {
        match right_groups.get(id) {
            None => entries.push(DiffEntry::deleted(left_group.clone())),
            Some(right_group) if left_group.has_same_property_ids(right_group) => {
                entries.push(DiffEntry::equal(left_group.clone(), right_group.clone()));
            }
            Some(right_group) => {
                entries.push(DiffEntry::modified(left_group.clone(), right_group.clone()));
            }
        }
    }

    for (id, right_group) in right_groups {
        if !left_groups.contains_key(id) {
            entries.push(DiffEntry::added(right_group.clone()));
        }
    }

    entries
}

/// Classify properties; `equals` decides EQUALS vs MODIFY for pairs that no
/// deprecation rule claims.
pub fn diff_properties<L, R, F>(left: &L, right: &R, equals: F) -> Vec<DiffEntry<Property>>
where
    L: MetadataRepository + ?Sized,
    R: MetadataRepository + ?Sized,
    F: Fn(&Property, &Property) -> bool,
{
    use keyshift_metadata::DeprecationLevel::{Error, Warning};

    let left_properties = left.all_properties();
    let right_properties = right.all_properties();
    let mut entries = Vec::new();

    for (id, l) in left_properties {
        let r = match right_properties.get(id) {
            Some(r) => r,
            None => {
                if l.is_deprecated_at(Error) {
                    tracing::debug!("ignoring removal of ERROR deprecated property '{}'", id);
                } else {
                    entries.push(DiffEntry::deleted(l.clone()));
                }
                continue;
            }
        };

        let entry = if r.is_deprecated() && !l.is_deprecated() {
            DiffEntry::deprecated(l.clone(), r.clone())
        } else if l.is_deprecated_at(Warning) && r.is_deprecated_at(Error) {
            DiffEntry::escalated(l.clone(), r.clone())
        } else if equals(l, r) {
            DiffEntry::equal(l.clone(), r.clone())
        } else {
            DiffEntry::modified(l.clone(), r.clone())
        };
        entries.push(entry);
    }

    for (id, r) in right_properties {
        if left_properties.contains_key(id) {
            continue;
        }
        if r.is_deprecated() {
            tracing::debug!("ignoring late addition of deprecated property '{}'", id);
        } else {
            entries.push(DiffEntry::added(r.clone()));
        }
    }

    entries
}

/// Diff two snapshots with the default content-equality policy.
pub fn diff_repositories<L, R>(left: &L, right: &R) -> DiffResult
where
    L: MetadataRepository + ?Sized,
    R: MetadataRepository + ?Sized,
{
    diff_repositories_with(left, right, content_equals)
}

/// Diff two snapshots with an explicit equality policy.
pub fn diff_repositories_with<L, R, F>(left: &L, right: &R, equals: F) -> DiffResult
where
    L: MetadataRepository + ?Sized,
    R: MetadataRepository + ?Sized,
    F: Fn(&Property, &Property) -> bool,
{
    let groups = diff_groups(left, right);
    let properties = diff_properties(left, right, equals);
    let result = DiffResult::new(left.version(), right.version(), groups, properties);
    tracing::debug!(
        "diffed {} -> {}: properties {}",
        left.version(),
        right.version(),
        result.summary().properties
    );
    result
}
