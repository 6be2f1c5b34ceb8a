//! Raw geographic feature as returned by the place data source

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoLocation;

/// Geometry kind of a raw element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Single point
    Node,
    /// Polyline or closed area
    Way,
    /// Collection of other elements
    Relation,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Way => write!(f, "way"),
            Self::Relation => write!(f, "relation"),
        }
    }
}

/// A tagged feature before classification
///
/// Tags are kept in a sorted map so everything derived from them is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawElement {
    /// Geometry kind
    pub kind: ElementKind,
    /// Source identifier
    pub id: i64,
    /// Point location, or the centroid for ways and relations
    pub location: Option<GeoLocation>,
    /// Free-form tags
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl RawElement {
    /// Create an element with no tags
    #[must_use]
    pub fn new(kind: ElementKind, id: i64, location: Option<GeoLocation>) -> Self {
        Self {
            kind,
            id,
            location,
            tags: BTreeMap::new(),
        }
    }

    /// Add a tag
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Value of a tag, ignoring blank values
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// First non-blank value among several tag keys
    #[must_use]
    pub fn first_tag(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.tag(key))
    }

    /// Number of distinct tag keys
    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }
}
