//! Named, ordered value sources with provenance.
//!
//! Values arrive already ingested: each [`ValueRecord`] pairs a property
//! name with its JSON value and, optionally, where it was configured.
//! [`PropertySources`] keeps sources in precedence order, so the earliest
//! source that defines a name wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SourceError;

/// Where a value was configured. `line` is 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Origin {
    pub fn new(source: impl Into<String>) -> Self {
        Origin {
            source: source.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// A single configured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub name: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl ValueRecord {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        ValueRecord {
            name: name.into(),
            value,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// A named, ordered list of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSource {
    pub name: String,
    #[serde(default)]
    pub records: Vec<ValueRecord>,
}

impl ValueSource {
    pub fn new(name: impl Into<String>) -> Self {
        ValueSource {
            name: name.into(),
            records: Vec::new(),
        }
    }

    pub fn with_record(mut self, record: ValueRecord) -> Self {
        self.records.push(record);
        self
    }

    /// First record with the given name.
    pub fn get(&self, name: &str) -> Option<&ValueRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}

/// Value sources in precedence order. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertySources {
    sources: Vec<ValueSource>,
}

impl PropertySources {
    pub fn new() -> Self {
        PropertySources::default()
    }

    /// Parse a JSON array of sources, keeping their order.
    pub fn from_json_str(document: &str) -> Result<Self, SourceError> {
        let sources: Vec<ValueSource> = serde_json::from_str(document)?;
        let mut result = PropertySources::new();
        for source in sources {
            result.add_last(source)?;
        }
        Ok(result)
    }

    /// Insert `source` with the highest precedence.
    pub fn add_first(&mut self, source: ValueSource) -> Result<(), SourceError> {
        self.ensure_absent(&source.name)?;
        self.sources.insert(0, source);
        Ok(())
    }

    /// Insert `source` with the lowest precedence.
    pub fn add_last(&mut self, source: ValueSource) -> Result<(), SourceError> {
        self.ensure_absent(&source.name)?;
        self.sources.push(source);
        Ok(())
    }

    /// Insert `source` immediately before the source named `relative`.
    pub fn add_before(&mut self, relative: &str, source: ValueSource) -> Result<(), SourceError> {
        self.ensure_absent(&source.name)?;
        let index = self
            .position(relative)
            .ok_or_else(|| SourceError::UnknownSource {
                name: relative.to_string(),
            })?;
        self.sources.insert(index, source);
        Ok(())
    }

    /// Take the source named `name` out of the ordering.
    pub fn remove(&mut self, name: &str) -> Option<ValueSource> {
        let index = self.position(name)?;
        Some(self.sources.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&ValueSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValueSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// The record for `name` from the first source that defines it.
    pub fn resolve(&self, name: &str) -> Option<&ValueRecord> {
        self.sources.iter().find_map(|s| s.get(name))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sources.iter().position(|s| s.name == name)
    }

    fn ensure_absent(&self, name: &str) -> Result<(), SourceError> {
        if self.position(name).is_some() {
            return Err(SourceError::DuplicateSource {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PropertySources {
    type Item = &'a ValueSource;
    type IntoIter = std::slice::Iter<'a, ValueSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}
