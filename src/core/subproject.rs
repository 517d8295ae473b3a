//! Registry entries.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::manifest::ManifestDeclaration;

/// A subproject known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subproject {
    name: String,
    path: PathBuf,
    dependencies: Vec<String>,
    exports: Vec<String>,
    tags: Vec<String>,
}

impl Subproject {
    /// Build an entry from a parsed manifest found in `path`.
    pub fn from_manifest(decl: ManifestDeclaration, path: impl Into<PathBuf>) -> Self {
        Subproject {
            name: decl.name,
            path: path.into(),
            dependencies: decl.dependencies,
            exports: decl.exports,
            tags: decl.tags,
        }
    }

    /// Entry for a module that was just attached and whose manifest has not
    /// been read yet.
    pub fn acquired(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Subproject {
            name: name.into(),
            path: path.into(),
            dependencies: Vec::new(),
            exports: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn exports(&self) -> &[String] {
        &self.exports
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Length of the path string, the quantity the duplicate policy compares.
    pub fn path_len(&self) -> usize {
        self.path.as_os_str().len()
    }
}

/// Name of the subproject rooted at `dir`: the directory's base name.
///
/// Paths without a final component (`.`, `..`) are canonicalized first.
pub fn subproject_name(dir: &Path) -> String {
    let base = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned());

    base(dir)
        .filter(|n| n != "." && n != "..")
        .or_else(|| dir.canonicalize().ok().and_then(|p| base(&p)))
        .unwrap_or_else(|| "unnamed".to_string())
}
