//! [`FieldSet`], the ordered field mapping every request and response is built from.

use serde::{Serialize, ser::SerializeMap};

use crate::types::FieldValue;

/// An ordered mapping from field names to values.
///
/// Insertion order decides the element order of the encoded document, so it
/// is kept through every transformation. Replacing an existing key keeps its
/// original position.
///
/// ```
/// use genesis_core::types::FieldSet;
///
/// let fields = FieldSet::new()
///     .with("transaction_id", "43671")
///     .with("amount", "5000")
///     .with("currency", "USD");
///
/// let names: Vec<&str> = fields.keys().collect();
/// assert_eq!(names, ["transaction_id", "amount", "currency"]);
/// assert_eq!(fields.get_text("amount"), Some("5000"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    entries: Vec<(String, FieldValue)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable form of [`FieldSet::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name`, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Appends `value` to the repeated field `name`.
    ///
    /// An unset field becomes a one-element list; a scalar already stored
    /// under `name` becomes the first element.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => {
                let slot = &mut self.entries[index].1;
                if let FieldValue::List(items) = slot {
                    items.push(value);
                    return;
                }
                *slot = match std::mem::take(slot) {
                    FieldValue::Null => FieldValue::List(vec![value]),
                    previous => FieldValue::List(vec![previous, value]),
                };
            }
            None => self.entries.push((name, FieldValue::List(vec![value]))),
        }
    }

    /// Merges `other` into `self`, entry by entry.
    pub fn merge(&mut self, other: FieldSet) {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.position(name).map(|index| &self.entries[index].1)
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.position(name).map(|index| self.entries.remove(index).1)
    }

    /// Looks a field up anywhere in the tree.
    ///
    /// A dotted name (`billing_address.country`) follows that exact path.
    /// A plain name is searched depth-first, so the first match in document
    /// order wins, however deeply nested.
    pub fn find(&self, name: &str) -> Option<&FieldValue> {
        if name.contains('.') {
            let mut segments = name.split('.');
            let first = segments.next()?;
            return segments.try_fold(self.get(first)?, |value, segment| {
                value.as_map()?.get(segment)
            });
        }

        for (key, value) in &self.entries {
            if key == name {
                return Some(value);
            }
            if let Some(found) = find_nested(value, name) {
                return Some(found);
            }
        }
        None
    }

    /// Whether [`FieldSet::find`] resolves `name` to a non-empty value.
    pub fn is_set(&self, name: &str) -> bool {
        self.find(name).is_some_and(|value| !value.is_empty())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == name)
    }
}

fn find_nested<'a>(value: &'a FieldValue, name: &str) -> Option<&'a FieldValue> {
    match value {
        FieldValue::Map(fields) => fields.find(name),
        FieldValue::List(items) => items.iter().find_map(|item| find_nested(item, name)),
        _ => None,
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = FieldSet::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl IntoIterator for FieldSet {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for FieldSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
