//! keyshift-core: what changed between two metadata snapshots, and where
//! deprecated keys went.
//!
//! Two engines live here:
//!
//! - [`diff`] classifies every group and property of an older (left) and a
//!   newer (right) snapshot as ADD, DELETE, EQUALS, MODIFY or DEPRECATE.
//! - [`resolve`] follows a deprecation's declared replacement into a target
//!   snapshot, falling back to map-typed parents when flattened keys were
//!   collapsed into a map.
//!
//! Both are pure functions over read-only [`MetadataRepository`] snapshots.
//!
//! [`MetadataRepository`]: keyshift_metadata::MetadataRepository

pub mod diff;
pub mod equality;
pub mod resolve;

pub use diff::{
    diff_groups, diff_properties, diff_repositories, diff_repositories_with, DiffEntry,
    DiffResult, DiffSummary, DiffType, TypeCounts,
};
pub use equality::{content_equals, identity_equals, EqualityPolicy};
pub use resolve::{
    find_map_replacement, resolve_candidate, resolve_replacement, suggest_replacement,
    Replacement, Resolution,
};
