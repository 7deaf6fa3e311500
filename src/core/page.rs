//! Page-lifetime registry.
//!
//! Generated fragments have nowhere to receive a registry from, so the page
//! keeps one lazily created registry per thread for them. Code that can pass
//! an [`ImplementorRegistry`] around should do that instead.

use crate::core::{FragmentTable, ImplementorRegistry, ImplementorSink, RegistryError};

thread_local! {
    static PAGE_REGISTRY: ImplementorRegistry = ImplementorRegistry::new();
}

/// Run `f` with this thread's page registry.
pub fn with_registry<R>(f: impl FnOnce(&ImplementorRegistry) -> R) -> R {
    PAGE_REGISTRY.with(f)
}

/// Deliver a table to the page registry.
pub fn register_implementors(table: FragmentTable) {
    with_registry(|registry| registry.register_implementors(table))
}

/// Install the page renderer's sink on the page registry.
pub fn install_callback<S>(sink: S) -> Result<(), RegistryError>
where
    S: ImplementorSink + 'static,
{
    with_registry(|registry| registry.install_callback(sink))
}
