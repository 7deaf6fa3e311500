//! Implementation of `implreg merge`.
//!
//! Folds tables into an existing fragment script, replacing only the
//! segments of the libraries being updated. This is how documentation for
//! several crates built separately ends up in one `trait.impl` tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::FragmentTable;
use crate::format::{self, RenderOptions};
use crate::ops::{load_table, FragmentLoadError};
use crate::util::fs::{read_to_string, write_string};

/// Result of a merge.
#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub target: PathBuf,
    /// Whether the target was created rather than updated.
    pub created: bool,
    /// Libraries replaced, added or removed, in merge order.
    pub libraries: Vec<String>,
}

/// Merge the tables in `inputs` into the fragment script at `target`.
///
/// Inputs are `.json` tables or fragment scripts and are applied in order,
/// so a later input wins for a library present in several. A missing
/// target is created.
pub fn merge_files(target: &Path, inputs: &[PathBuf]) -> Result<MergeSummary> {
    let created = !target.exists();
    let mut current = if created {
        format::render(&FragmentTable::new(), RenderOptions::default())
            .context("failed to render empty fragment")?
    } else {
        read_to_string(target)?
    };

    let mut libraries = Vec::new();
    for input in inputs {
        let table = load_table(input)?;
        tracing::debug!("merging {} librar(ies) from {}", table.len(), input.display());

        current = format::merge(&current, &table).map_err(|source| FragmentLoadError {
            path: target.to_path_buf(),
            source,
        })?;
        libraries.extend(table.libraries().map(str::to_string));
    }

    write_string(target, &current)?;

    Ok(MergeSummary {
        target: target.to_path_buf(),
        created,
        libraries,
    })
}
