//! Tag attributes.
//!
//! Attribute values are themselves small node trees, so that an attribute can
//! hold a mix of literal text and embedded expressions:
//!
//! ```json
//! { "class": [{ "type": "text", "content": "btn " }, { "type": "code", "content": "locals.kind" }] }
//! ```
//!
//! Attribute order is document order and is kept as-is through a round trip.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::Node;

/// Insertion-ordered mapping from attribute name to its value sub-tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, Vec<Node>)>,
}

impl Attributes {
    /// Creates an empty attribute set.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value sub-tree for `name`.
    pub fn get(&self, name: &str) -> Option<&[Node]> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_slice())
    }

    /// Returns a mutable value sub-tree for `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<Node>> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Sets an attribute, replacing an existing value in place or appending a
    /// new entry at the end. Returns the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: Vec<Node>) -> Option<Vec<Node>> {
        let name = name.into();
        match self.get_mut(&name) {
            Some(existing) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Removes an attribute, keeping the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<Vec<Node>> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterates over `(name, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Node])> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_slice()))
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Node>)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Node>)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.insert(name, value);
        }
        attrs
    }
}

impl Serialize for Attributes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // `serde_json::Map` keeps document order (`preserve_order`).
        Map::<String, Value>::deserialize(deserializer)?
            .into_iter()
            .map(|(name, value)| {
                Vec::<Node>::deserialize(value)
                    .map(|nodes| (name, nodes))
                    .map_err(<D::Error as de::Error>::custom)
            })
            .collect()
    }
}
