//! implreg - implementor cross-reference fragments for generated Rust docs
//!
//! This crate provides the page-side registry that collects implementor
//! fragments regardless of load order, the generated fragment file format,
//! and the operations behind the `implreg` tool.

pub mod core;
pub mod format;
pub mod ops;
pub mod util;

pub use crate::core::{
    fragment::FragmentTable, implementor::Implementor, index::ImplementorIndex,
    registry::ImplementorRegistry, trait_path::TraitPath,
};

pub use format::FragmentError;
pub use util::config::Config;
