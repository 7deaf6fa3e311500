//! Accumulated implementor index.
//!
//! This is what the page renderer reads once fragments have been
//! delivered: every library's implementors, merged across fragments.

use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use serde::Serialize;

use crate::core::{FragmentTable, Implementor, ImplementorSink};

/// Shared handle to an index, so the renderer can keep reading it after
/// installing a clone as the registry's sink.
#[derive(Debug, Clone, Default)]
pub struct SharedIndex(Rc<RefCell<ImplementorIndex>>);

impl SharedIndex {
    /// Borrow the index.
    pub fn borrow(&self) -> Ref<'_, ImplementorIndex> {
        self.0.borrow()
    }

    /// Take the index out, leaving an empty one behind.
    pub fn take(&self) -> ImplementorIndex {
        self.0.take()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
struct LibraryEntries {
    library: String,
    entries: Vec<Implementor>,
    #[serde(skip)]
    seen: HashSet<String>,
}

/// Implementors per library, merged from every delivered table.
///
/// Libraries keep first-seen order; entries keep delivery order. An entry
/// whose text is already listed for its library is skipped. Libraries
/// marked local are skipped entirely, since the page renders their
/// implementors itself.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImplementorIndex {
    libraries: Vec<LibraryEntries>,
    #[serde(skip)]
    local: HashSet<String>,
    tables_seen: usize,
}

impl ImplementorIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the given libraries when merging.
    pub fn with_local_libraries<I, S>(mut self, local: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.local.extend(local.into_iter().map(Into::into));
        self
    }

    /// Wrap in a shared handle.
    pub fn shared(self) -> SharedIndex {
        SharedIndex(Rc::new(RefCell::new(self)))
    }

    /// Merge one table into the index.
    pub fn merge(&mut self, table: FragmentTable) {
        self.tables_seen += 1;

        for (library, entries) in table {
            if self.local.contains(&library) {
                tracing::debug!("skipping local library `{}`", library);
                continue;
            }

            let pos = match self.libraries.iter().position(|l| l.library == library) {
                Some(pos) => pos,
                None => {
                    self.libraries.push(LibraryEntries {
                        library,
                        ..Default::default()
                    });
                    self.libraries.len() - 1
                }
            };
            let slot = &mut self.libraries[pos];

            for entry in entries {
                if slot.seen.insert(entry.text.clone()) {
                    slot.entries.push(entry);
                }
            }
        }
    }

    /// Library identifiers in first-seen order.
    pub fn libraries(&self) -> impl Iterator<Item = &str> {
        self.libraries.iter().map(|l| l.library.as_str())
    }

    /// Merged entries for a library.
    pub fn entries(&self, library_id: &str) -> Option<&[Implementor]> {
        self.libraries
            .iter()
            .find(|l| l.library == library_id)
            .map(|l| l.entries.as_slice())
    }

    /// Total number of merged implementors.
    pub fn len(&self) -> usize {
        self.libraries.iter().map(|l| l.entries.len()).sum()
    }

    /// Whether nothing has been merged.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tables merged so far.
    pub fn tables_seen(&self) -> usize {
        self.tables_seen
    }

    /// Flatten into a single fragment table.
    pub fn into_table(self) -> FragmentTable {
        self.libraries
            .into_iter()
            .fold(FragmentTable::new(), |mut table, l| {
                table.insert(l.library, l.entries);
                table
            })
    }
}

impl ImplementorSink for ImplementorIndex {
    fn accept(&mut self, table: FragmentTable) {
        self.merge(table);
    }
}

impl ImplementorSink for SharedIndex {
    fn accept(&mut self, table: FragmentTable) {
        self.0.borrow_mut().merge(table);
    }
}
