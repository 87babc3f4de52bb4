//! Content-equality policies deciding EQUALS vs MODIFY for matched properties.
//!
//! A policy is any `Fn(&Property, &Property) -> bool`. The functions here
//! are the stock choices; [`EqualityPolicy`] selects one by name from
//! configuration.

use serde::{Deserialize, Serialize};

use keyshift_metadata::Property;

/// Declared type, default value and description must all match.
///
/// Deprecation changes are classified by the diff rules themselves and are
/// not part of content equality.
pub fn content_equals(left: &Property, right: &Property) -> bool {
    left.declared_type == right.declared_type
        && left.default_value == right.default_value
        && left.description == right.description
}

/// Every matched pair is equal; MODIFY is never produced.
pub fn identity_equals(_left: &Property, _right: &Property) -> bool {
    true
}

/// Named equality policy, as selected in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EqualityPolicy {
    #[default]
    Content,
    Identity,
}

impl EqualityPolicy {
    pub fn equals(self, left: &Property, right: &Property) -> bool {
        match self {
            EqualityPolicy::Content => content_equals(left, right),
            EqualityPolicy::Identity => identity_equals(left, right),
        }
    }
}
