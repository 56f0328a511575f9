//! Attribute bags.

use rhizome_zettel_sx::{ListBuilder, Object, text_value};
use serde::Serialize;
use std::collections::BTreeMap;

/// Key of the default attribute.
pub const DEFAULT_ATTRIBUTE: &str = "-";

const CLASS: &str = "class";

/// Additional information attached to a node.
///
/// A value may hold several space-separated words; [`Attributes::add`],
/// [`Attributes::values`] and [`Attributes::has`] treat it as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the default attribute `-` is set.
    pub fn has_default(&self) -> bool {
        self.0.contains_key(DEFAULT_ATTRIBUTE)
    }

    pub fn remove_default(&mut self) -> &mut Self {
        self.remove(DEFAULT_ATTRIBUTE)
    }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.0.remove(key);
        self
    }

    /// Adds `value` to the words of `key`, unless it is already there.
    pub fn add(&mut self, key: &str, value: &str) -> &mut Self {
        let mut values = self.values(key);
        if !values.contains(&value) {
            values.push(value);
            let joined = values.join(" ");
            self.0.insert(key.to_string(), joined);
        }
        self
    }

    /// The whitespace-separated words of the value of `key`.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|value| value.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has(&self, key: &str, value: &str) -> bool {
        self.values(key).contains(&value)
    }

    pub fn add_class(&mut self, class: &str) -> &mut Self {
        self.add(CLASS, class)
    }

    pub fn classes(&self) -> Vec<&str> {
        self.values(CLASS)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.has(CLASS, class)
    }

    /// Association list of `(key . value)` string pairs, sorted by key.
    pub fn as_assoc(&self) -> Object {
        let mut lb = ListBuilder::new();
        for (key, value) in &self.0 {
            lb.add(Object::cons(key.as_str(), value.as_str()));
        }
        lb.list()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attributes(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Reads an association list into attributes.
///
/// Entries that are not pairs, or whose key or value is not an atom, are
/// skipped. A value given as a list `(key value)` uses its first element.
pub fn get_attributes(assoc: &Object) -> Attributes {
    let mut result = Attributes::new();
    for entry in assoc.iter() {
        let Some(pair) = entry.as_pair() else {
            continue;
        };
        let key = pair.car();
        if !key.is_atom() {
            continue;
        }
        let mut value = pair.cdr();
        if value.is_pair() {
            value = value.car();
        }
        if !value.is_atom() {
            continue;
        }
        result.set(text_value(key), text_value(value));
    }
    result
}
