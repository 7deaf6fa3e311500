//! Core data structures for implreg.
//!
//! This module contains the types shared by the producer and page sides:
//! - Implementor entries and fragment tables
//! - The implementor registry latch and its page-lifetime instance
//! - The accumulated index handed to the page renderer
//! - Trait paths and fragment file locations

pub mod fragment;
pub mod implementor;
pub mod index;
pub mod page;
pub mod registry;
pub mod trait_path;

pub use fragment::FragmentTable;
pub use implementor::Implementor;
pub use index::{ImplementorIndex, SharedIndex};
pub use registry::{ImplementorRegistry, ImplementorSink, RegistryError, RegistryState};
pub use trait_path::{TraitPath, TraitPathError, TRAIT_IMPL_DIR};
