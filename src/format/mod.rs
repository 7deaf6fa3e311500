//! Generated fragment files.
//!
//! The documentation generator writes one script per trait under
//! `trait.impl/`. Each script hands its table to the page registry and ends
//! with a comment recording where every library's segment sits in the
//! payload, which lets the generator splice in one library's implementors
//! without re-rendering the others.
//!
//! - [`js`] renders and parses whole files
//! - [`template`] splits a file into its segments for incremental updates
//! - [`offsets`] is the trailing segment metadata

pub mod js;
pub mod offsets;
pub mod template;

use thiserror::Error;

pub use js::{merge, parse, render, FragmentFile, RenderOptions};
pub use offsets::Offset;
pub use template::{FragmentTemplate, TemplateError};

/// Error reading or writing a fragment.
#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("fragment has no `Object.fromEntries(...)` payload")]
    MissingWrapper,

    #[error("malformed fragment table: {0}")]
    MalformedTable(#[source] serde_json::Error),

    #[error(transparent)]
    Template(#[from] TemplateError),
}
