//! # Segments
//!
//! Names and containers for the independently validated parts of a request.
//!
//! - [`SegmentName`]: validated identifier (`params`, `query`, `body`, ...).
//! - [`SegmentMap`]: ordered segment-keyed map used for both outcome variants.
//! - [`RequestSegments`]: owned raw segment values of one request.
//! - [`SegmentStore`]: any mutable segment-keyed request representation the
//!   engine can read from and write sanitized values back into.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::ConfigError;

/// Path parameters.
pub const PARAMS: &str = "params";
/// Query string parameters.
pub const QUERY: &str = "query";
/// Request body.
pub const BODY: &str = "body";
/// Request headers.
pub const HEADERS: &str = "headers";

/// Name of one request segment.
///
/// The set of valid names is caller-defined; the only constraint is shape:
/// non-empty ASCII alphanumerics, `_` or `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SegmentName(String);

impl SegmentName {
    /// Validate and wrap a segment name.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        let well_formed = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if well_formed {
            Ok(Self(name))
        } else {
            Err(ConfigError::InvalidSegmentName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SegmentName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SegmentName> for String {
    fn from(name: SegmentName) -> Self {
        name.0
    }
}

impl AsRef<str> for SegmentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Segment-keyed map that remembers insertion order.
///
/// The engine fills it in schema set order, so error details and sanitized
/// values always list segments in the order they were declared. Serializes as
/// a JSON object in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMap<T> {
    entries: Vec<(SegmentName, T)>,
}

impl<T> SegmentMap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace the value for `name`. Replacing keeps the original position.
    pub fn insert(&mut self, name: SegmentName, value: T) -> Option<T> {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SegmentName> {
        self.entries.iter().map(|(n, _)| n)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SegmentName, &T)> {
        self.entries.iter().map(|(n, v)| (n, v))
    }
}

impl<T> Default for SegmentMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for SegmentMap<T> {
    type Item = (SegmentName, T);
    type IntoIter = std::vec::IntoIter<(SegmentName, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T: Serialize> Serialize for SegmentMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name.as_str(), value)?;
        }
        map.end()
    }
}

/// Mutable, segment-keyed request storage.
///
/// The engine reads raw values through [`segment`](Self::segment) and the
/// pipeline step writes sanitized values back through
/// [`set_segment`](Self::set_segment). Segments that are not part of the
/// schema set are never touched.
pub trait SegmentStore {
    /// Raw value of a segment, `None` when the request has no such segment.
    fn segment(&self, name: &str) -> Option<&Value>;

    /// Replace (or create) a segment value.
    fn set_segment(&mut self, name: &str, value: Value);
}

/// Owned raw segment values of one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestSegments {
    segments: BTreeMap<String, Value>,
}

impl RequestSegments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.segments.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.segments.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.segments.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.segments.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Write every entry of a sanitized mapping back, leaving other segments as they were.
    pub fn install(&mut self, sanitized: SegmentMap<Value>) {
        for (name, value) in sanitized {
            self.segments.insert(name.into(), value);
        }
    }

    /// All segments as one JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.segments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl SegmentStore for RequestSegments {
    fn segment(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    fn set_segment(&mut self, name: &str, value: Value) {
        self.segments.insert(name.to_string(), value);
    }
}

impl FromIterator<(String, Value)> for RequestSegments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn segment_name_accepts_identifiers() {
        for name in ["params", "query", "body", "x-custom", "seg_2"] {
            assert!(SegmentName::new(name).is_ok(), "{name} rejected");
        }
    }

    #[test]
    fn segment_name_rejects_malformed() {
        for name in ["", "req.body", "with space", "ünïcode"] {
            assert_eq!(
                SegmentName::new(name),
                Err(ConfigError::InvalidSegmentName(name.to_string()))
            );
        }
    }

    #[test]
    fn segment_name_deserialize_validates() {
        let ok: Result<SegmentName, _> = serde_json::from_value(json!("body"));
        assert!(ok.is_ok());
        let bad: Result<SegmentName, _> = serde_json::from_value(json!("a b"));
        assert!(bad.is_err());
    }

    #[test]
    fn segment_map_keeps_insertion_order() {
        let mut map = SegmentMap::new();
        map.insert(SegmentName::new("query").unwrap(), 1);
        map.insert(SegmentName::new("body").unwrap(), 2);
        map.insert(SegmentName::new("params").unwrap(), 3);
        let keys: Vec<&str> = map.keys().map(SegmentName::as_str).collect();
        assert_eq!(keys, vec!["query", "body", "params"]);
    }

    #[test]
    fn segment_map_replace_keeps_position() {
        let mut map = SegmentMap::new();
        map.insert(SegmentName::new("a").unwrap(), 1);
        map.insert(SegmentName::new("b").unwrap(), 2);
        assert_eq!(map.insert(SegmentName::new("a").unwrap(), 10), Some(1));
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next().map(|(_, v)| *v), Some(10));
    }

    #[test]
    fn segment_map_serializes_in_order() {
        let mut map = SegmentMap::new();
        map.insert(SegmentName::new("zeta").unwrap(), json!(1));
        map.insert(SegmentName::new("alpha").unwrap(), json!(2));
        let text = serde_json::to_string(&map).unwrap();
        assert_eq!(text, r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn install_only_touches_sanitized_segments() {
        let mut segments = RequestSegments::new()
            .with("body", json!({"name": "  x  "}))
            .with("cookies", json!({"session": "abc"}));
        let mut sanitized = SegmentMap::new();
        sanitized.insert(SegmentName::new("body").unwrap(), json!({"name": "x"}));
        segments.install(sanitized);
        assert_eq!(segments.get("body"), Some(&json!({"name": "x"})));
        assert_eq!(segments.get("cookies"), Some(&json!({"session": "abc"})));
    }

    #[test]
    fn request_segments_to_json() {
        let segments = RequestSegments::new()
            .with("params", json!({"id": "1"}))
            .with("body", json!(null));
        assert_eq!(
            segments.to_json(),
            json!({"params": {"id": "1"}, "body": null})
        );
    }
}
