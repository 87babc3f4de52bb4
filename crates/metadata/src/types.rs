//! Typed structs for configuration metadata.
//!
//! A [`Property`] is a single configuration key. Properties are bucketed into
//! [`Group`]s that share a key prefix. A deprecated property carries a
//! [`Deprecation`] whose level is always known.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Raw type names that denote a map container.
const MAP_CONTAINERS: &[&str] = &["java.util.Map", "Map"];

/// Anything that is keyed by a configuration identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

// ── Types ───────────────────────────────────────────────────────────

/// Declared type of a property, kept exactly as published.
///
/// Identity is byte-exact on the declared string. Map containers expose
/// their key and value type parameters through [`PropertyType::map_parameters`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PropertyType(String);

impl PropertyType {
    pub fn new(declared: impl Into<String>) -> Self {
        PropertyType(declared.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the raw type (before any `<`) is a map container.
    pub fn is_map(&self) -> bool {
        let raw = self.0.split('<').next().unwrap_or_default().trim();
        MAP_CONTAINERS.contains(&raw)
    }

    /// Key and value type parameters of a parameterised map.
    ///
    /// Returns `None` for non-map types and for raw maps without
    /// parameters. Nested generics are respected when splitting.
    pub fn map_parameters(&self) -> Option<(&str, &str)> {
        if !self.is_map() {
            return None;
        }
        let open = self.0.find('<')?;
        let inner = self.0[open + 1..].trim_end().strip_suffix('>')?;
        let mut depth = 0usize;
        for (i, c) in inner.char_indices() {
            match c {
                '<' => depth += 1,
                '>' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    return Some((inner[..i].trim(), inner[i + 1..].trim()));
                }
                _ => {}
            }
        }
        None
    }

    /// Value type parameter of a parameterised map.
    pub fn map_value_type(&self) -> Option<&str> {
        self.map_parameters().map(|(_, value)| value)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PropertyType {
    fn from(s: &str) -> Self {
        PropertyType::new(s)
    }
}

// ── Deprecation ─────────────────────────────────────────────────────

/// How hard a property is deprecated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeprecationLevel {
    /// Still honoured, scheduled for removal.
    Warning,
    /// No longer honoured.
    Error,
}

impl fmt::Display for DeprecationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeprecationLevel::Warning => write!(f, "WARNING"),
            DeprecationLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Deprecation record of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deprecation {
    pub level: DeprecationLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Deprecation {
    pub fn new(level: DeprecationLevel) -> Self {
        Deprecation {
            level,
            replacement: None,
            reason: None,
        }
    }

    pub fn warning() -> Self {
        Deprecation::new(DeprecationLevel::Warning)
    }

    pub fn error() -> Self {
        Deprecation::new(DeprecationLevel::Error)
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// The replacement id, ignoring blank values.
    pub fn replacement_id(&self) -> Option<&str> {
        self.replacement
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

// ── Property ────────────────────────────────────────────────────────

/// A single configuration key and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<Deprecation>,
}

impl Property {
    pub fn new(id: impl Into<String>) -> Self {
        Property {
            id: id.into(),
            declared_type: None,
            default_value: None,
            description: None,
            deprecation: None,
        }
    }

    pub fn with_type(mut self, declared_type: impl Into<PropertyType>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_deprecation(mut self, deprecation: Deprecation) -> Self {
        self.deprecation = Some(deprecation);
        self
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }

    pub fn deprecation_level(&self) -> Option<DeprecationLevel> {
        self.deprecation.as_ref().map(|d| d.level)
    }

    /// Whether the property is deprecated with exactly `level`.
    pub fn is_deprecated_at(&self, level: DeprecationLevel) -> bool {
        self.deprecation_level() == Some(level)
    }

    /// Whether the declared type denotes a map container.
    pub fn is_map(&self) -> bool {
        self.declared_type.as_ref().is_some_and(PropertyType::is_map)
    }
}

impl Identified for Property {
    fn id(&self) -> &str {
        &self.id
    }
}

// ── Group ───────────────────────────────────────────────────────────

/// A named bucket of properties sharing a prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub properties: BTreeMap<String, Property>,
}

impl Group {
    pub fn new(id: impl Into<String>) -> Self {
        Group {
            id: id.into(),
            type_name: None,
            description: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.insert(property.id.clone(), property);
        self
    }

    /// Whether both groups own exactly the same property ids.
    pub fn has_same_property_ids(&self, other: &Group) -> bool {
        self.properties.len() == other.properties.len()
            && self
                .properties
                .keys()
                .all(|id| other.properties.contains_key(id))
    }
}

impl Identified for Group {
    fn id(&self) -> &str {
        &self.id
    }
}
