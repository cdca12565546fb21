//! Ordered key-to-schema mappings and their structural composition.
//!
//! Every operation returns a new mapping; an existing schema's entries are
//! never modified in place.

use super::primitive::{picklist, LiteralSchema};
use super::wrapper::{wrap_boxed, wrap_ref, WrapperType};
use crate::core::{BoxedSchema, SchemaRef};
use indexmap::IndexMap;

/// The entries of an object-shaped schema, in insertion order.
///
/// Order is significant: it is the order children are validated in, the
/// order their issues are reported in and the order of [`Entries::keys`].
///
/// # Examples
///
/// ```rust
/// use shape_guard::core::{boxed, Describe};
/// use shape_guard::schemas::{number, string, Entries};
///
/// let base = Entries::from_iter([("a", boxed(string())), ("b", boxed(string()))]);
/// let overlay = Entries::from_iter([("a", boxed(number())), ("c", boxed(number()))]);
///
/// let merged = base.merge(&overlay);
/// assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
/// assert_eq!(merged.get("a").unwrap().type_tag(), "number");
/// ```
#[derive(Debug, Clone)]
pub struct Entries<S = BoxedSchema> {
    entries: IndexMap<String, S>,
}

impl<S> Default for Entries<S> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<S: Clone> Entries<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schema for `key`. An existing key keeps its position and has
    /// its schema replaced wholesale.
    pub fn insert(&mut self, key: impl Into<String>, schema: S) {
        self.entries.insert(key.into(), schema);
    }

    pub fn get(&self, key: &str) -> Option<&S> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &S)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }

    /// `self` overlaid with `other`: on collision `other`'s schema wins.
    pub fn merge(&self, other: &Entries<S>) -> Self {
        let mut merged = self.clone();
        for (key, schema) in &other.entries {
            merged.insert(key.clone(), schema.clone());
        }
        merged
    }

    /// The entries named in `keys`, in this mapping's order. Unknown keys
    /// are ignored.
    pub fn pick(&self, keys: &[&str]) -> Self {
        self.filtered(|key| keys.contains(&key))
    }

    /// Every entry except those named in `keys`.
    pub fn omit(&self, keys: &[&str]) -> Self {
        self.filtered(|key| !keys.contains(&key))
    }

    /// A picklist over the keys, in order.
    pub fn keyof(&self) -> LiteralSchema {
        picklist(self.keys())
    }

    fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(key, _)| keep(key))
                .map(|(key, schema)| (key.clone(), schema.clone()))
                .collect(),
        }
    }

    fn mapped(&self, keys: Option<&[&str]>, wrap: impl Fn(S) -> S) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(key, schema)| {
                    let selected = keys.map_or(true, |keys| keys.contains(&key.as_str()));
                    let schema = if selected {
                        wrap(schema.clone())
                    } else {
                        schema.clone()
                    };
                    (key.clone(), schema)
                })
                .collect(),
        }
    }
}

impl Entries<BoxedSchema> {
    /// Every entry wrapped in `optional`.
    pub fn partial(&self) -> Self {
        self.mapped(None, |s| wrap_boxed(WrapperType::Optional, s))
    }

    /// The named entries wrapped in `optional`, the rest unchanged.
    pub fn partial_keys(&self, keys: &[&str]) -> Self {
        self.mapped(Some(keys), |s| wrap_boxed(WrapperType::Optional, s))
    }

    /// Every entry wrapped in `non_optional`.
    pub fn required(&self) -> Self {
        self.mapped(None, |s| wrap_boxed(WrapperType::NonOptional, s))
    }

    pub fn required_keys(&self, keys: &[&str]) -> Self {
        self.mapped(Some(keys), |s| wrap_boxed(WrapperType::NonOptional, s))
    }
}

impl Entries<SchemaRef> {
    pub fn partial(&self) -> Self {
        self.mapped(None, |s| wrap_ref(WrapperType::Optional, s))
    }

    pub fn partial_keys(&self, keys: &[&str]) -> Self {
        self.mapped(Some(keys), |s| wrap_ref(WrapperType::Optional, s))
    }

    pub fn required(&self) -> Self {
        self.mapped(None, |s| wrap_ref(WrapperType::NonOptional, s))
    }

    pub fn required_keys(&self, keys: &[&str]) -> Self {
        self.mapped(Some(keys), |s| wrap_ref(WrapperType::NonOptional, s))
    }
}

impl<S: Clone, K: Into<String>> FromIterator<(K, S)> for Entries<S> {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        let mut entries = Entries::new();
        for (key, schema) in iter {
            entries.insert(key, schema);
        }
        entries
    }
}

impl<S> IntoIterator for Entries<S> {
    type Item = (String, S);
    type IntoIter = indexmap::map::IntoIter<String, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
