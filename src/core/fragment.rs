//! Fragment tables.
//!
//! A fragment table maps a library identifier to the ordered implementors
//! that library contributes for one trait. Tables are built fresh per
//! fragment and are never cumulative; accumulation across fragments is the
//! job of [`crate::core::ImplementorIndex`].

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::Implementor;

/// Ordered mapping of library identifier to implementors.
///
/// Library order is insertion order. Serialized as the array-of-pairs form
/// written into generated fragment files (`[["lib",[["text"]]]]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentTable {
    libraries: Vec<(String, Vec<Implementor>)>,
}

impl FragmentTable {
    /// Create an empty table.
    pub fn new() -> Self {
        FragmentTable {
            libraries: Vec::new(),
        }
    }

    /// Builder form of [`FragmentTable::insert`].
    pub fn with_library<I, E>(mut self, library_id: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Implementor>,
    {
        self.insert(library_id, entries.into_iter().map(Into::into).collect());
        self
    }

    /// Set the entries for a library.
    ///
    /// An existing library keeps its position and has its entries replaced.
    /// Returns the previous entries, if any.
    pub fn insert(
        &mut self,
        library_id: impl Into<String>,
        entries: Vec<Implementor>,
    ) -> Option<Vec<Implementor>> {
        let library_id = library_id.into();
        match self.libraries.iter_mut().find(|(id, _)| *id == library_id) {
            Some((_, existing)) => Some(std::mem::replace(existing, entries)),
            None => {
                self.libraries.push((library_id, entries));
                None
            }
        }
    }

    /// Entries for a library.
    pub fn get(&self, library_id: &str) -> Option<&[Implementor]> {
        self.libraries
            .iter()
            .find(|(id, _)| id == library_id)
            .map(|(_, entries)| entries.as_slice())
    }

    /// Library identifiers in table order.
    pub fn libraries(&self) -> impl Iterator<Item = &str> {
        self.libraries.iter().map(|(id, _)| id.as_str())
    }

    /// Iterate over `(library_id, entries)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Implementor])> {
        self.libraries
            .iter()
            .map(|(id, entries)| (id.as_str(), entries.as_slice()))
    }

    /// Number of libraries.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Whether the table has no libraries.
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Number of implementors across all libraries.
    pub fn total_entries(&self) -> usize {
        self.libraries.iter().map(|(_, entries)| entries.len()).sum()
    }

    /// Insert a library parsed from input, rejecting duplicates.
    fn insert_unique<E: de::Error>(
        &mut self,
        library_id: String,
        entries: Vec<Implementor>,
    ) -> Result<(), E> {
        if self.get(&library_id).is_some() {
            return Err(E::custom(format!("duplicate library `{}`", library_id)));
        }
        self.libraries.push((library_id, entries));
        Ok(())
    }
}

impl IntoIterator for FragmentTable {
    type Item = (String, Vec<Implementor>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Implementor>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.libraries.into_iter()
    }
}

impl Serialize for FragmentTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.libraries.len()))?;
        for (id, entries) in &self.libraries {
            seq.serialize_element(&(id, entries))?;
        }
        seq.end()
    }
}

struct FragmentTableVisitor;

impl<'de> Visitor<'de> for FragmentTableVisitor {
    type Value = FragmentTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of [library, [implementors]] pairs or an object of libraries")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<FragmentTable, A::Error> {
        let mut table = FragmentTable::new();
        while let Some((id, entries)) = seq.next_element::<(String, Vec<Implementor>)>()? {
            table.insert_unique(id, entries)?;
        }
        Ok(table)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FragmentTable, A::Error> {
        let mut table = FragmentTable::new();
        while let Some((id, entries)) = map.next_entry::<String, Vec<Implementor>>()? {
            table.insert_unique(id, entries)?;
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for FragmentTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FragmentTableVisitor)
    }
}
