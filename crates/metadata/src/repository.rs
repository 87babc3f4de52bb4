use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::deserialize::MetadataError;
use crate::types::{Group, Property};

/// Id of the group collecting properties that belong to no declared group.
pub const ROOT_GROUP: &str = "_ROOT_GROUP_";

/// Read-only snapshot of the configuration metadata of one framework version.
///
/// Implementations are built once and never mutated afterwards.
pub trait MetadataRepository {
    /// Opaque version label of the snapshot.
    fn version(&self) -> &str;

    /// All properties, flattened across groups, keyed by id.
    fn all_properties(&self) -> &BTreeMap<String, Property>;

    /// All groups keyed by id.
    fn all_groups(&self) -> &BTreeMap<String, Group>;

    fn property(&self, id: &str) -> Option<&Property> {
        self.all_properties().get(id)
    }
}

/// In-memory [`MetadataRepository`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleMetadataRepository {
    version: String,
    groups: BTreeMap<String, Group>,
    properties: BTreeMap<String, Property>,
}

impl SimpleMetadataRepository {
    /// Build a snapshot from fully populated groups.
    ///
    /// The flattened property map is derived from the groups, so a property
    /// is reachable exactly through the group that owns it. A property id
    /// owned by more than one group is rejected.
    pub fn new(
        version: impl Into<String>,
        groups: impl IntoIterator<Item = Group>,
    ) -> Result<Self, MetadataError> {
        let groups: BTreeMap<String, Group> =
            groups.into_iter().map(|g| (g.id.clone(), g)).collect();
        let mut properties = BTreeMap::new();
        for property in groups.values().flat_map(|g| g.properties.values()) {
            if properties
                .insert(property.id.clone(), property.clone())
                .is_some()
            {
                return Err(MetadataError::DuplicateProperty {
                    id: property.id.clone(),
                });
            }
        }
        Ok(SimpleMetadataRepository {
            version: version.into(),
            groups,
            properties,
        })
    }

    /// Snapshot from groups whose property ids are already known to be
    /// disjoint.
    pub(crate) fn from_disjoint_groups(
        version: impl Into<String>,
        groups: impl IntoIterator<Item = Group>,
    ) -> Self {
        let groups: BTreeMap<String, Group> =
            groups.into_iter().map(|g| (g.id.clone(), g)).collect();
        let properties = groups
            .values()
            .flat_map(|g| g.properties.values())
            .map(|p| (p.id.clone(), p.clone()))
            .collect();
        SimpleMetadataRepository {
            version: version.into(),
            groups,
            properties,
        }
    }
}

impl MetadataRepository for SimpleMetadataRepository {
    fn version(&self) -> &str {
        &self.version
    }

    fn all_properties(&self) -> &BTreeMap<String, Property> {
        &self.properties
    }

    fn all_groups(&self) -> &BTreeMap<String, Group> {
        &self.groups
    }
}

/// Order groups with the root group first, then by id.
pub fn compare_groups(a: &Group, b: &Group) -> Ordering {
    match (a.id == ROOT_GROUP, b.id == ROOT_GROUP) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.id.cmp(&b.id),
    }
}

pub fn sort_groups<'a>(groups: impl IntoIterator<Item = &'a Group>) -> Vec<&'a Group> {
    let mut sorted: Vec<&Group> = groups.into_iter().collect();
    sorted.sort_by(|a, b| compare_groups(a, b));
    sorted
}

pub fn sort_properties<'a>(properties: impl IntoIterator<Item = &'a Property>) -> Vec<&'a Property> {
    let mut sorted: Vec<&Property> = properties.into_iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    sorted
}
