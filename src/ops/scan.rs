//! Implementation of `implreg scan`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::{TraitPath, TRAIT_IMPL_DIR};
use crate::ops::load_fragment;
use crate::util::fs::find_files_with_extension;

/// One fragment script found under a documentation root.
#[derive(Debug, Clone, Serialize)]
pub struct ScannedFragment {
    /// Trait the fragment lists implementors for.
    pub trait_path: String,
    /// Location relative to the documentation root.
    pub path: PathBuf,
    pub libraries: usize,
    pub entries: usize,
    /// Why the fragment could not be read, if it could not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// List every implementor fragment under `doc_root/trait.impl`.
///
/// Files that are not fragment scripts by name are skipped; fragments that
/// fail to parse are listed with their error.
pub fn scan(doc_root: &Path) -> Result<Vec<ScannedFragment>> {
    let impl_dir = doc_root.join(TRAIT_IMPL_DIR);
    if !impl_dir.is_dir() {
        bail!("no `{}` directory under {}", TRAIT_IMPL_DIR, doc_root.display());
    }

    let mut found = Vec::new();
    for file in find_files_with_extension(&impl_dir, "js")? {
        let relative = file.strip_prefix(doc_root).unwrap_or(file.as_path()).to_path_buf();
        let trait_path = match TraitPath::from_fragment_path(&relative) {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!("skipping {}: {}", relative.display(), e);
                continue;
            }
        };

        let scanned = match load_fragment(&file) {
            Ok(fragment) => ScannedFragment {
                trait_path: trait_path.to_string(),
                path: relative,
                libraries: fragment.table.len(),
                entries: fragment.table.total_entries(),
                error: None,
            },
            Err(e) => {
                tracing::warn!("{:#}", e);
                ScannedFragment {
                    trait_path: trait_path.to_string(),
                    path: relative,
                    libraries: 0,
                    entries: 0,
                    error: Some(format!("{:#}", e)),
                }
            }
        };
        found.push(scanned);
    }

    found.sort_by(|a, b| a.trait_path.cmp(&b.trait_path));
    Ok(found)
}
