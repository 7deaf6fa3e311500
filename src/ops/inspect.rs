//! Implementation of `implreg inspect`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::format::FragmentTemplate;
use crate::ops::parse_fragment;
use crate::util::fs::read_to_string;

/// State of a fragment's offset trailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum TrailerStatus {
    /// No trailer line.
    Missing,
    /// Trailer describes the payload exactly.
    Consistent,
    /// Trailer present but does not describe the payload.
    Stale { reason: String },
}

/// Per-library summary.
#[derive(Debug, Clone, Serialize)]
pub struct LibrarySummary {
    pub library: String,
    pub entries: usize,
    pub synthetic: usize,
}

/// What a fragment script contains.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub path: PathBuf,
    pub libraries: Vec<LibrarySummary>,
    pub total_entries: usize,
    pub trailer: TrailerStatus,
}

/// Inspect a fragment script.
pub fn inspect(path: &Path) -> Result<InspectReport> {
    let src = read_to_string(path)?;
    let file = parse_fragment(path, &src)?;

    let trailer = match file.trailer {
        None => TrailerStatus::Missing,
        Some(_) => match src.parse::<FragmentTemplate>() {
            Ok(_) => TrailerStatus::Consistent,
            Err(e) => TrailerStatus::Stale {
                reason: e.to_string(),
            },
        },
    };

    let libraries = file
        .table
        .iter()
        .map(|(library, entries)| LibrarySummary {
            library: library.to_string(),
            entries: entries.len(),
            synthetic: entries.iter().filter(|e| e.synthetic).count(),
        })
        .collect();

    Ok(InspectReport {
        path: path.to_path_buf(),
        libraries,
        total_entries: file.table.total_entries(),
        trailer,
    })
}

/// Format a report for terminal output.
pub fn format_report(report: &InspectReport) -> String {
    let mut out = format!("{}\n", report.path.display());

    for lib in &report.libraries {
        if lib.synthetic > 0 {
            out.push_str(&format!(
                "  {} ({} implementor(s), {} synthetic)\n",
                lib.library, lib.entries, lib.synthetic
            ));
        } else {
            out.push_str(&format!("  {} ({} implementor(s))\n", lib.library, lib.entries));
        }
    }

    let trailer = match &report.trailer {
        TrailerStatus::Missing => "missing".to_string(),
        TrailerStatus::Consistent => "consistent".to_string(),
        TrailerStatus::Stale { reason } => format!("stale ({})", reason),
    };
    out.push_str(&format!(
        "{} librar(ies), {} implementor(s), trailer {}\n",
        report.libraries.len(),
        report.total_entries,
        trailer
    ));
    out
}
