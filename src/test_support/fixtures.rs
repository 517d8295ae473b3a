//! Fixture writers for subproject trees.

use std::path::Path;

use crate::core::manifest::{ManifestDeclaration, MANIFEST_NAME};
use crate::core::subproject::subproject_name;

/// Manifest text declaring `deps` and `exports`.
pub fn manifest_text(deps: &[&str], exports: &[&str]) -> String {
    ManifestDeclaration {
        dependencies: deps.iter().map(|s| s.to_string()).collect(),
        exports: exports.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
    .render()
}

/// Create `dir` as a subproject with the given dependencies and exports.
/// Exported headers are created as empty files.
pub fn write_subproject(dir: &Path, deps: &[&str], exports: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(MANIFEST_NAME), manifest_text(deps, exports)).unwrap();

    for export in exports {
        let header = dir.join(export);
        if let Some(parent) = header.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(header, format!("// {}\n", subproject_name(dir))).unwrap();
    }
}
