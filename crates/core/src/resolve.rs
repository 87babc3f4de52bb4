//! Replacement resolution for deprecated properties.
//!
//! A deprecation may name a replacement id. The id either exists verbatim in
//! the target snapshot, or it points into a map-typed property that absorbed
//! a family of flattened keys (`prefix.key1`, `prefix.key2` -> `prefix`).
//! Resolution tries the verbatim id first and then walks shrinking dot
//! prefixes of it.

use serde::Serialize;

use keyshift_metadata::{MetadataRepository, Property};

/// Where a replacement id landed in the target snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Replacement<'a> {
    /// The replacement id exists as-is.
    Direct { property: &'a Property },
    /// The replacement id is an entry of a map-typed container; `key` is the
    /// remainder after the container id.
    MapEntry {
        container: &'a Property,
        key: String,
    },
}

impl<'a> Replacement<'a> {
    /// The property that actually receives the value.
    pub fn property(&self) -> &'a Property {
        match self {
            Replacement::Direct { property } => property,
            Replacement::MapEntry { container, .. } => container,
        }
    }

    pub fn is_map_entry(&self) -> bool {
        matches!(self, Replacement::MapEntry { .. })
    }
}

/// Outcome of resolving a deprecated property's replacement.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    Resolved {
        candidate: String,
        replacement: Replacement<'a>,
    },
    /// A replacement was declared but is not present in the target.
    Invalid { candidate: String },
    /// No replacement declared, or a blank one.
    NoReplacement,
}

impl<'a> Resolution<'a> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }

    pub fn candidate(&self) -> Option<&str> {
        match self {
            Resolution::Resolved { candidate, .. } | Resolution::Invalid { candidate } => {
                Some(candidate)
            }
            Resolution::NoReplacement => None,
        }
    }

    pub fn replacement(&self) -> Option<&Replacement<'a>> {
        match self {
            Resolution::Resolved { replacement, .. } => Some(replacement),
            _ => None,
        }
    }
}

/// Resolve the declared replacement of `property` against `target`.
pub fn resolve_replacement<'a, R>(property: &Property, target: &'a R) -> Resolution<'a>
where
    R: MetadataRepository + ?Sized,
{
    let Some(candidate) = property
        .deprecation
        .as_ref()
        .and_then(|d| d.replacement_id())
    else {
        return Resolution::NoReplacement;
    };

    match resolve_candidate(candidate, target) {
        Some(replacement) => Resolution::Resolved {
            candidate: candidate.to_string(),
            replacement,
        },
        None => Resolution::Invalid {
            candidate: candidate.to_string(),
        },
    }
}

/// Look `candidate` up verbatim, then through map-collapse.
pub fn resolve_candidate<'a, R>(candidate: &str, target: &'a R) -> Option<Replacement<'a>>
where
    R: MetadataRepository + ?Sized,
{
    match target.property(candidate) {
        Some(property) => Some(Replacement::Direct { property }),
        None => find_map_replacement(candidate, target),
    }
}

/// Strip trailing segments off `candidate` until a prefix exists in `target`.
///
/// The first prefix found decides: a map-typed property resolves, anything
/// else stops the search. A candidate without a dot has no fallback.
pub fn find_map_replacement<'a, R>(candidate: &str, target: &'a R) -> Option<Replacement<'a>>
where
    R: MetadataRepository + ?Sized,
{
    let mut prefix = candidate;
    while let Some(dot) = prefix.rfind('.') {
        prefix = &prefix[..dot];
        if let Some(container) = target.property(prefix) {
            if !container.is_map() {
                tracing::debug!(
                    "'{}' is not a map, no replacement for '{}'",
                    prefix,
                    candidate
                );
                return None;
            }
            return Some(Replacement::MapEntry {
                container,
                key: candidate[dot + 1..].to_string(),
            });
        }
    }
    None
}

/// Suggest a live property of `target` that looks like the renamed `id`.
///
/// Tails of `id` are tried from longest to shortest: the whole id when it has
/// two segments, otherwise its last two segments, then its last segment. A
/// target id matches a tail when it equals it or ends with `.tail`. The first
/// tail with exactly one match wins; more than one match is ambiguous and
/// stops the search.
pub fn suggest_replacement<'a, R>(id: &str, target: &'a R) -> Option<&'a Property>
where
    R: MetadataRepository + ?Sized,
{
    for tail in suffix_tails(id) {
        let boundary = format!(".{}", tail);
        let mut matches = target.all_properties().values().filter(|p| {
            p.id != id && !p.is_deprecated() && (p.id == tail || p.id.ends_with(&boundary))
        });
        match (matches.next(), matches.next()) {
            (Some(only), None) => return Some(only),
            (Some(_), Some(_)) => {
                tracing::debug!("ambiguous replacement for '{}' on '{}'", id, tail);
                return None;
            }
            _ => {}
        }
    }
    None
}

fn suffix_tails(id: &str) -> Vec<&str> {
    let segments = id.split('.').count();
    let last = id.rsplit('.').next().unwrap_or(id);
    let mut tails = Vec::new();
    if segments == 2 {
        tails.push(id);
    } else if segments > 2 {
        let mut dots = id.rmatch_indices('.');
        if let (Some(_), Some((second, _))) = (dots.next(), dots.next()) {
            tails.push(&id[second + 1..]);
        }
    }
    tails.push(last);
    tails
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyshift_metadata::{Deprecation, Group, SimpleMetadataRepository, ROOT_GROUP};

    fn target(properties: Vec<Property>) -> SimpleMetadataRepository {
        let group = properties
            .into_iter()
            .fold(Group::new(ROOT_GROUP), Group::with_property);
        SimpleMetadataRepository::new("2.0", vec![group]).unwrap()
    }

    fn deprecated_to(replacement: &str) -> Property {
        Property::new("old.key")
            .with_type("java.lang.String")
            .with_deprecation(Deprecation::warning().with_replacement(replacement))
    }

    #[test]
    fn direct_replacement() {
        let repo = target(vec![Property::new("test.new").with_type("java.lang.String")]);
        let resolution = resolve_replacement(&deprecated_to("test.new"), &repo);
        assert!(resolution.is_resolved());
        let replacement = resolution.replacement().unwrap();
        assert!(!replacement.is_map_entry());
        assert_eq!(replacement.property().id, "test.new");
    }

    #[test]
    fn missing_replacement_is_invalid() {
        let repo = target(vec![]);
        let resolution = resolve_replacement(&deprecated_to("test.missing"), &repo);
        assert_eq!(
            resolution,
            Resolution::Invalid {
                candidate: "test.missing".to_string()
            }
        );
    }

    #[test]
    fn blank_or_absent_replacement() {
        let repo = target(vec![]);
        let blank = deprecated_to("  ");
        assert_eq!(resolve_replacement(&blank, &repo), Resolution::NoReplacement);
        let none = Property::new("old.key").with_deprecation(Deprecation::warning());
        assert_eq!(resolve_replacement(&none, &repo), Resolution::NoReplacement);
        assert_eq!(resolve_replacement(&none, &repo).candidate(), None);
    }

    #[test]
    fn collapses_into_map_container() {
        let repo = target(vec![Property::new("server.headers")
            .with_type("java.util.Map<java.lang.String,java.lang.String>")]);
        let replacement = resolve_candidate("server.headers.x-frame", &repo).unwrap();
        assert_eq!(
            replacement,
            Replacement::MapEntry {
                container: repo.property("server.headers").unwrap(),
                key: "x-frame".to_string(),
            }
        );
    }

    #[test]
    fn collapses_across_several_segments() {
        let repo = target(vec![
            Property::new("a").with_type("java.util.Map<java.lang.String,java.lang.String>")
        ]);
        let replacement = find_map_replacement("a.b.c.d", &repo).unwrap();
        assert_eq!(replacement.property().id, "a");
        match replacement {
            Replacement::MapEntry { key, .. } => assert_eq!(key, "b.c.d"),
            other => panic!("expected map entry, got {:?}", other),
        }
    }

    #[test]
    fn non_map_prefix_stops_the_search() {
        let repo = target(vec![
            Property::new("a").with_type("java.util.Map<java.lang.String,java.lang.String>"),
            Property::new("a.b").with_type("java.lang.String"),
        ]);
        assert_eq!(find_map_replacement("a.b.c", &repo), None);
    }

    #[test]
    fn undotted_candidate_has_no_fallback() {
        let repo = target(vec![Property::new("a").with_type("java.util.Map")]);
        assert_eq!(find_map_replacement("plain", &repo), None);
        assert_eq!(find_map_replacement("", &repo), None);
    }

    #[test]
    fn suggests_unique_suffix_match() {
        let repo = target(vec![
            Property::new("spring.data.mongodb.host"),
            Property::new("spring.redis.port"),
        ]);
        let suggestion = suggest_replacement("spring.mongodb.host", &repo).unwrap();
        assert_eq!(suggestion.id, "spring.data.mongodb.host");
    }

    #[test]
    fn suggestion_falls_back_to_last_segment() {
        let repo = target(vec![Property::new("server.servlet.context-path")]);
        let suggestion = suggest_replacement("server.context-path", &repo);
        assert_eq!(suggestion.unwrap().id, "server.servlet.context-path");
    }

    #[test]
    fn ambiguous_suggestion_yields_nothing() {
        let repo = target(vec![
            Property::new("spring.redis.host"),
            Property::new("spring.data.mongodb.host"),
        ]);
        assert_eq!(suggest_replacement("spring.elastic.host", &repo), None);
    }

    #[test]
    fn suffix_must_end_on_a_segment_boundary() {
        let repo = target(vec![Property::new("server.xport")]);
        assert_eq!(suggest_replacement("client.port", &repo), None);
    }

    #[test]
    fn deprecated_properties_are_not_suggested() {
        let repo = target(vec![
            Property::new("other.timeout").with_deprecation(Deprecation::warning())
        ]);
        assert_eq!(suggest_replacement("legacy.timeout", &repo), None);
    }

    #[test]
    fn tails_by_segment_count() {
        assert_eq!(suffix_tails("a"), vec!["a"]);
        assert_eq!(suffix_tails("a.b"), vec!["a.b", "b"]);
        assert_eq!(suffix_tails("a.b.c.d"), vec!["c.d", "d"]);
    }
}
