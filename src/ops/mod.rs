//! High-level operations.
//!
//! This module contains the implementation of implreg commands.

pub mod inspect;
pub mod merge;
pub mod render;
pub mod replay;
pub mod scan;

use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::core::FragmentTable;
use crate::format::{self, FragmentError, FragmentFile};
use crate::util::diagnostic::Diagnostic;
use crate::util::fs::read_to_string;

pub use inspect::{format_report, inspect, InspectReport, TrailerStatus};
pub use merge::{merge_files, MergeSummary};
pub use render::{render_table_file, RenderFileOptions};
pub use replay::{format_replay, replay, ReplayOptions, ReplayReport};
pub use scan::{scan, ScannedFragment};

/// A fragment or table file that could not be decoded.
#[derive(Debug, Error)]
#[error("failed to load {}", path.display())]
pub struct FragmentLoadError {
    pub path: PathBuf,
    #[source]
    pub source: FragmentError,
}

impl FragmentLoadError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::for_fragment(&self.source, &self.path)
    }
}

/// Read and parse a fragment script.
pub fn load_fragment(path: &Path) -> Result<FragmentFile> {
    let src = read_to_string(path)?;
    parse_fragment(path, &src)
}

/// Parse fragment script text read from `path`.
pub(crate) fn parse_fragment(path: &Path, src: &str) -> Result<FragmentFile> {
    let file = format::parse(src).map_err(|source| FragmentLoadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file)
}

/// Read a fragment table written as JSON.
pub fn load_table_json(path: &Path) -> Result<FragmentTable> {
    let src = read_to_string(path)?;
    let table = serde_json::from_str(&src).map_err(|e| FragmentLoadError {
        path: path.to_path_buf(),
        source: FragmentError::MalformedTable(e),
    })?;
    Ok(table)
}

/// Read a table from either a `.json` table or a fragment script.
pub fn load_table(path: &Path) -> Result<FragmentTable> {
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        load_table_json(path)
    } else {
        Ok(load_fragment(path)?.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_table_by_extension() {
        let tmp = TempDir::new().unwrap();
        let json = tmp.path().join("table.json");
        std::fs::write(&json, r#"{"libA":[["x"]]}"#).unwrap();
        assert_eq!(load_table(&json).unwrap().len(), 1);

        let js = tmp.path().join("trait.From.js");
        let rendered = format::render(
            &FragmentTable::new().with_library("libB", ["y"]),
            format::RenderOptions::default(),
        )
        .unwrap();
        std::fs::write(&js, rendered).unwrap();
        assert_eq!(load_table(&js).unwrap().get("libB").unwrap()[0].text, "y");
    }

    #[test]
    fn test_load_error_downcasts() {
        let tmp = TempDir::new().unwrap();
        let js = tmp.path().join("broken.js");
        std::fs::write(&js, "nothing here").unwrap();

        let err = load_fragment(&js).unwrap_err();
        let load = err.downcast_ref::<FragmentLoadError>().unwrap();
        assert!(matches!(load.source, FragmentError::MissingWrapper));
        assert!(load.to_diagnostic().to_string().contains("broken.js"));
    }
}
