//! Ordered map of named fields.
//!
//! [`FieldMap`] wraps an [`IndexMap`] so labeled fields and map entries keep
//! the order they were written in. Re-assigning a key replaces its value but
//! keeps its original position.
//!
//! ## Examples
//!
//! ```rust
//! use plainfields::Document;
//!
//! let doc = Document::parse("b=1,a=2,b=3").unwrap();
//! let keys: Vec<&str> = doc.labeled().keys().map(|k| k.as_ref()).collect();
//! assert_eq!(keys, ["b", "a"]);
//! assert_eq!(doc.get("b").and_then(|n| n.as_value()).map(|v| v.raw()), Some("3"));
//! ```

use crate::Node;
use indexmap::IndexMap;
use std::borrow::Cow;

/// An insertion-ordered map from field names to [`Node`]s.
///
/// Keys borrow from the input unless they had to be de-escaped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMap<'a>(IndexMap<Cow<'a, str>, Node<'a>>);

impl<'a> FieldMap<'a> {
    #[must_use]
    pub fn new() -> Self {
        FieldMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        FieldMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a field, returning the previous value for the same name.
    pub fn insert(&mut self, key: impl Into<Cow<'a, str>>, value: Node<'a>) -> Option<Node<'a>> {
        self.0.insert(key.into(), value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node<'a>> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Cow<'a, str>, Node<'a>> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Cow<'a, str>, Node<'a>> {
        self.0.values()
    }

    /// Returns an iterator over the fields, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Cow<'a, str>, Node<'a>> {
        self.0.iter()
    }

    /// Detaches the map from the input it was parsed from.
    #[must_use]
    pub fn into_owned(self) -> FieldMap<'static> {
        self.0
            .into_iter()
            .map(|(key, node)| (Cow::Owned(key.into_owned()), node.into_owned()))
            .collect()
    }
}

impl<'a> IntoIterator for FieldMap<'a> {
    type Item = (Cow<'a, str>, Node<'a>);
    type IntoIter = indexmap::map::IntoIter<Cow<'a, str>, Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'m, 'a> IntoIterator for &'m FieldMap<'a> {
    type Item = (&'m Cow<'a, str>, &'m Node<'a>);
    type IntoIter = indexmap::map::Iter<'m, Cow<'a, str>, Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> FromIterator<(Cow<'a, str>, Node<'a>)> for FieldMap<'a> {
    fn from_iter<T: IntoIterator<Item = (Cow<'a, str>, Node<'a>)>>(iter: T) -> Self {
        FieldMap(IndexMap::from_iter(iter))
    }
}
