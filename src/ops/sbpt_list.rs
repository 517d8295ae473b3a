//! Implementation of `sbpt list`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::ops::scan::{scan, ScanProblem};

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub name: String,
    pub path: PathBuf,
    pub dependencies: Vec<String>,
    pub exports: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Listing {
    pub entries: Vec<ListEntry>,
    pub problems: Vec<ScanProblem>,
}

/// Scan `root` and describe every subproject found, in name order.
pub fn list_subprojects(root: &Path) -> Result<Listing> {
    let scan = scan(root)?;
    let entries = scan
        .registry
        .iter()
        .map(|sp| ListEntry {
            name: sp.name().to_string(),
            path: sp.path().to_path_buf(),
            dependencies: sp.dependencies().to_vec(),
            exports: sp.exports().to_vec(),
            tags: sp.tags().to_vec(),
        })
        .collect();

    Ok(Listing {
        entries,
        problems: scan.problems,
    })
}

/// Human-readable listing: one `name  path` line per subproject, names
/// padded to a common width.
pub fn format_listing(entries: &[ListEntry]) -> String {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|e| format!("{:<width$}  {}\n", e.name, e.path.display(), width = width))
        .collect()
}
