//! Implementation of `sbpt create`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::manifest::{ManifestDeclaration, MANIFEST_NAME};
use crate::core::subproject::subproject_name;
use crate::util::fs::{create_if_absent, ensure_dir};

/// Files touched by a scaffold run.
#[derive(Debug, Default)]
pub struct Scaffold {
    pub name: String,
    /// Files written by this run
    pub created: Vec<PathBuf>,
    /// Files that already existed and were left alone
    pub skipped: Vec<PathBuf>,
}

/// Include guard macro for a subproject header, e.g. `MY_LIB_HPP`.
pub fn include_guard(name: &str) -> String {
    format!("{}_HPP", name.to_uppercase()).replace(['-', ' '], "_")
}

/// Create a new subproject in `dir` with a header, a source file and a
/// manifest exporting the header. Existing files are never overwritten.
pub fn create_subproject(dir: &Path) -> Result<Scaffold> {
    ensure_dir(dir)?;

    let name = subproject_name(dir);
    let header = format!("{}.hpp", name);
    let guard = include_guard(&name);

    let header_content = format!(
        "#ifndef {guard}\n\
         #define {guard}\n\
         \n\
         // {name} declarations go here\n\
         \n\
         #endif // {guard}\n"
    );
    let source_content = format!(
        "#include \"{header}\"\n\
         \n\
         // {name} definitions go here\n"
    );
    let manifest_content = ManifestDeclaration {
        name: name.clone(),
        exports: vec![header.clone()],
        ..Default::default()
    }
    .render();

    let files = [
        (dir.join(&header), header_content),
        (dir.join(format!("{}.cpp", name)), source_content),
        (dir.join(MANIFEST_NAME), manifest_content),
    ];

    let mut scaffold = Scaffold {
        name,
        ..Default::default()
    };
    for (path, content) in files {
        if create_if_absent(&path, &content)? {
            tracing::debug!("created {}", path.display());
            scaffold.created.push(path);
        } else {
            scaffold.skipped.push(path);
        }
    }

    Ok(scaffold)
}
