//! Implementor registry - the page-side latch that collects fragments.
//!
//! Fragments load in whatever order the page happens to fetch them, and
//! the renderer that consumes them may come up before or after any of
//! them. The registry decouples the two: until the renderer installs its
//! sink every table is buffered in arrival order; installing the sink
//! replays the buffer and from then on tables are delivered synchronously.
//!
//! The registry is single-threaded. Sinks may call back into the registry
//! while a table is being delivered; such tables are queued behind the
//! current delivery so that arrival order is kept.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;

use crate::core::FragmentTable;
use crate::format::FragmentError;

/// Latch state of an [`ImplementorRegistry`].
///
/// The only transition is `Uninitialized -> Initialized`, and it is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// No sink installed; tables are buffered.
    Uninitialized,
    /// Sink installed; tables are delivered immediately.
    Initialized,
}

impl fmt::Display for RegistryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryState::Uninitialized => write!(f, "uninitialized"),
            RegistryState::Initialized => write!(f, "initialized"),
        }
    }
}

/// Error from registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("an implementor callback is already installed")]
    AlreadyInitialized,
}

/// Consumer of fragment tables.
///
/// Any `FnMut(FragmentTable)` is a sink.
pub trait ImplementorSink {
    /// Take ownership of one delivered table.
    fn accept(&mut self, table: FragmentTable);
}

impl<F> ImplementorSink for F
where
    F: FnMut(FragmentTable),
{
    fn accept(&mut self, table: FragmentTable) {
        self(table)
    }
}

/// Buffers fragment tables until a sink is installed, then delivers each
/// table to it exactly once, in arrival order.
pub struct ImplementorRegistry {
    state: Cell<RegistryState>,
    /// Tables that arrived before the sink was installed.
    pending: RefCell<Vec<FragmentTable>>,
    sink: RefCell<Option<Box<dyn ImplementorSink>>>,
    /// Tables waiting for the delivery loop. Only non-empty while delivering.
    inbox: RefCell<VecDeque<FragmentTable>>,
    delivering: Cell<bool>,
    delivered: Cell<usize>,
}

impl ImplementorRegistry {
    /// Create a registry with no sink installed.
    pub fn new() -> Self {
        ImplementorRegistry {
            state: Cell::new(RegistryState::Uninitialized),
            pending: RefCell::new(Vec::new()),
            sink: RefCell::new(None),
            inbox: RefCell::new(VecDeque::new()),
            delivering: Cell::new(false),
            delivered: Cell::new(0),
        }
    }

    /// Current latch state.
    pub fn state(&self) -> RegistryState {
        self.state.get()
    }

    /// Whether a sink has been installed.
    pub fn is_initialized(&self) -> bool {
        self.state.get() == RegistryState::Initialized
    }

    /// Number of tables buffered while waiting for a sink.
    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Number of tables handed to the sink so far.
    pub fn delivered_count(&self) -> usize {
        self.delivered.get()
    }

    /// Hand a table to the registry.
    ///
    /// Buffers the table if no sink is installed yet, otherwise delivers it
    /// before returning (or, if called from inside the sink, right after the
    /// delivery in progress).
    pub fn register_implementors(&self, table: FragmentTable) {
        match self.state.get() {
            RegistryState::Uninitialized => {
                let mut pending = self.pending.borrow_mut();
                pending.push(table);
                tracing::debug!("buffered fragment table ({} pending)", pending.len());
            }
            RegistryState::Initialized => {
                self.inbox.borrow_mut().push_back(table);
                self.pump();
            }
        }
    }

    /// Decode a JSON fragment table and register it.
    ///
    /// Malformed payloads are producer defects: they are logged and dropped,
    /// never buffered or delivered.
    pub fn register_serialized(&self, payload: &str) -> Result<(), FragmentError> {
        match serde_json::from_str::<FragmentTable>(payload) {
            Ok(table) => {
                self.register_implementors(table);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("dropping malformed fragment table: {}", e);
                Err(FragmentError::MalformedTable(e))
            }
        }
    }

    /// Install the sink and replay every buffered table into it.
    ///
    /// Fails if a sink is already installed; the installed sink is kept.
    pub fn install_callback<S>(&self, sink: S) -> Result<(), RegistryError>
    where
        S: ImplementorSink + 'static,
    {
        if self.is_initialized() {
            return Err(RegistryError::AlreadyInitialized);
        }

        *self.sink.borrow_mut() = Some(Box::new(sink));
        self.state.set(RegistryState::Initialized);

        let drained = std::mem::take(&mut *self.pending.borrow_mut());
        tracing::debug!("implementor sink installed, replaying {} table(s)", drained.len());
        self.inbox.borrow_mut().extend(drained);
        self.pump();

        Ok(())
    }

    /// Deliver everything in the inbox. A nested call returns immediately
    /// and leaves its table to the outer loop.
    fn pump(&self) {
        if self.delivering.get() {
            return;
        }
        self.delivering.set(true);
        let _guard = DeliveryGuard(&self.delivering);

        let mut slot = self.sink.borrow_mut();
        let Some(sink) = slot.as_mut() else {
            return;
        };

        loop {
            let next = self.inbox.borrow_mut().pop_front();
            let Some(table) = next else {
                break;
            };
            for (library, entries) in table.iter() {
                tracing::trace!("delivering {} implementor(s) from `{}`", entries.len(), library);
            }
            sink.accept(table);
            self.delivered.set(self.delivered.get() + 1);
        }
    }
}

impl Default for ImplementorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ImplementorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementorRegistry")
            .field("state", &self.state.get())
            .field("pending", &self.pending_len())
            .field("delivered", &self.delivered.get())
            .finish_non_exhaustive()
    }
}

struct DeliveryGuard<'a>(&'a Cell<bool>);

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
