use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub name: String,
    pub value: f64,
}

/// An ordered `name -> quantity` mapping.
///
/// Insertion order is display order and names are unique. On the wire it is a plain
/// object whose key order follows the insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composition {
    entries: Vec<Quantity>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `name` at the end, or updates its value in place if already present.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|q| q.name == name) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Quantity { name, value }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<f64> {
        let index = self.entries.iter().position(|q| q.name == name)?;
        Some(self.entries.remove(index).value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|q| q.name == name).map(|q| q.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|q| q.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|q| (q.name.as_str(), q.value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|q| q.name.as_str())
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|q| q.value).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Composition {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut composition = Composition::new();
        for (name, value) in iter {
            composition.set(name, value);
        }
        composition
    }
}

impl Serialize for Composition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for q in &self.entries {
            map.serialize_entry(&q.name, &q.value)?;
        }
        map.end()
    }
}

struct CompositionVisitor;

impl<'de> Visitor<'de> for CompositionVisitor {
    type Value = Composition;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of ingredient names to quantities")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut composition = Composition::new();
        while let Some((name, value)) = access.next_entry::<String, f64>()? {
            composition.set(name, value);
        }
        Ok(composition)
    }
}

impl<'de> Deserialize<'de> for Composition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CompositionVisitor)
    }
}
