//! keyshift-metadata: configuration metadata types and repositories.
//!
//! Provides typed structs for the properties, groups and deprecations a
//! framework publishes for its configuration keys, an immutable
//! [`MetadataRepository`] snapshot per framework version, and a
//! [`MetadataRepositoryBuilder`] that assembles a snapshot from one or more
//! JSON metadata documents.
//!
//! Every other keyshift crate consumes snapshots through the
//! [`MetadataRepository`] trait and never touches the JSON format directly.

pub mod deserialize;
pub mod repository;
pub mod types;

pub use deserialize::{MetadataError, MetadataRepositoryBuilder};
pub use repository::{
    compare_groups, sort_groups, sort_properties, MetadataRepository, SimpleMetadataRepository,
    ROOT_GROUP,
};
pub use types::*;
