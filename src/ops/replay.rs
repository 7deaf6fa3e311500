//! Implementation of `implreg replay`.
//!
//! Loads fragment scripts the way a page does: each one is handed to a
//! fresh [`ImplementorRegistry`] in order, and the renderer's index is
//! installed at a chosen point. Useful for checking what a page will show
//! and that nothing is lost whichever order things load in.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use serde::Serialize;

use crate::core::{FragmentTable, ImplementorIndex, ImplementorRegistry, ImplementorSink};
use crate::ops::{load_fragment, FragmentLoadError};

/// Options for a replay.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Fragment scripts, in load order
    pub fragments: Vec<PathBuf>,

    /// Install the index after this many fragments have loaded (None = after all)
    pub install_after: Option<usize>,

    /// Libraries the page renders itself
    pub local_libraries: Vec<String>,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Fragments that loaded and were registered.
    pub loaded: usize,
    /// Fragments rejected as malformed.
    pub rejected: Vec<PathBuf>,
    /// Tables waiting in the registry when the index was installed.
    pub buffered: usize,
    /// Libraries of each delivered table, in delivery order.
    pub deliveries: Vec<Vec<String>>,
    /// The merged index the page would render.
    pub index: FragmentTable,
}

/// Replay fragment loading against a fresh registry.
pub fn replay(opts: &ReplayOptions) -> Result<ReplayReport> {
    let registry = ImplementorRegistry::new();
    let index = ImplementorIndex::new()
        .with_local_libraries(opts.local_libraries.iter().cloned())
        .shared();
    let deliveries: Rc<RefCell<Vec<Vec<String>>>> = Rc::default();

    let install_at = opts.install_after.unwrap_or(opts.fragments.len());
    let mut buffered = 0;
    let mut install = |registry: &ImplementorRegistry| -> Result<()> {
        buffered = registry.pending_len();
        let mut sink_index = index.clone();
        let sink_deliveries = Rc::clone(&deliveries);
        registry.install_callback(move |table: FragmentTable| {
            sink_deliveries
                .borrow_mut()
                .push(table.libraries().map(str::to_string).collect());
            sink_index.accept(table);
        })?;
        Ok(())
    };

    let mut loaded = 0;
    let mut rejected = Vec::new();
    for (i, path) in opts.fragments.iter().enumerate() {
        if i == install_at {
            install(&registry)?;
        }

        match load_fragment(path) {
            Ok(file) => {
                registry.register_implementors(file.table);
                loaded += 1;
            }
            Err(e) if e.is::<FragmentLoadError>() => {
                tracing::warn!("dropping {}: {:#}", path.display(), e);
                rejected.push(path.clone());
            }
            Err(e) => return Err(e),
        }
    }
    if !registry.is_initialized() {
        install(&registry)?;
    }

    let deliveries = deliveries.take();
    Ok(ReplayReport {
        loaded,
        rejected,
        buffered,
        deliveries,
        index: index.take().into_table(),
    })
}

/// Format a report for terminal output.
pub fn format_replay(report: &ReplayReport) -> String {
    let mut out = format!(
        "{} fragment(s) loaded, {} buffered before install, {} rejected\n",
        report.loaded,
        report.buffered,
        report.rejected.len()
    );

    for path in &report.rejected {
        out.push_str(&format!("  rejected {}\n", path.display()));
    }

    for (library, entries) in report.index.iter() {
        out.push_str(&format!("{}\n", library));
        for entry in entries {
            out.push_str(&format!("    {}\n", entry.text));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{render, RenderOptions};
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, table: FragmentTable) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, render(&table, RenderOptions::default()).unwrap()).unwrap();
        path
    }

    fn fixtures(dir: &Path) -> Vec<PathBuf> {
        vec![
            write(dir, "one.js", FragmentTable::new().with_library("libA", ["a"])),
            write(dir, "two.js", FragmentTable::new().with_library("libB", ["b"])),
            write(dir, "three.js", FragmentTable::new().with_library("libA", ["a", "a2"])),
        ]
    }

    #[test]
    fn test_replay_install_last() {
        let tmp = TempDir::new().unwrap();
        let report = replay(&ReplayOptions {
            fragments: fixtures(tmp.path()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(report.loaded, 3);
        assert_eq!(report.buffered, 3);
        assert_eq!(report.deliveries, [vec!["libA"], vec!["libB"], vec!["libA"]]);

        let texts: Vec<_> = report.index.get("libA").unwrap().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["a", "a2"]);
    }

    #[test]
    fn test_replay_install_first_buffers_nothing() {
        let tmp = TempDir::new().unwrap();
        let report = replay(&ReplayOptions {
            fragments: fixtures(tmp.path()),
            install_after: Some(0),
            local_libraries: vec!["libB".to_string()],
        })
        .unwrap();

        assert_eq!(report.buffered, 0);
        assert_eq!(report.deliveries.len(), 3);
        assert!(report.index.get("libB").is_none());
        assert!(format_replay(&report).contains("    a2"));
    }

    #[test]
    fn test_replay_rejects_malformed_fragment() {
        let tmp = TempDir::new().unwrap();
        let mut fragments = fixtures(tmp.path());
        let broken = tmp.path().join("broken.js");
        std::fs::write(&broken, "Object.fromEntries([[\"lib\", \"nope\"]]);").unwrap();
        fragments.insert(1, broken.clone());

        let report = replay(&ReplayOptions {
            fragments,
            install_after: Some(2),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(report.loaded, 3);
        assert_eq!(report.rejected, [broken]);
        assert_eq!(report.buffered, 1);
        assert_eq!(report.deliveries.len(), 3);
    }

    #[test]
    fn test_replay_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = replay(&ReplayOptions {
            fragments: vec![tmp.path().join("missing.js")],
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
