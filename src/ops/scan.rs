//! Subproject discovery.
//!
//! Walks a source tree and registers every directory holding an `sbpt.ini`.
//! Discovery does not stop at a subproject: nested subprojects (for example
//! a dependency attached inside another module) are found as well.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use walkdir::WalkDir;

use crate::core::manifest::{ManifestDeclaration, ManifestError, MANIFEST_NAME};
use crate::core::registry::{Insertion, Registry};
use crate::core::subproject::{subproject_name, Subproject};
use crate::util::diagnostic::{render_report, suggestions, Diagnostic};
use crate::util::shell::{Shell, Status};

/// A problem found while scanning. None of these stop the scan.
#[derive(Debug)]
pub enum ScanProblem {
    /// Two manifests share a subproject name.
    DuplicateName {
        name: String,
        kept: PathBuf,
        discarded: PathBuf,
    },
    /// A manifest could not be read or parsed; the directory is skipped.
    Manifest(ManifestError),
}

impl ScanProblem {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ScanProblem::DuplicateName {
                name,
                kept,
                discarded,
            } => Diagnostic::warning(format!("duplicate subproject name `{}`", name))
                .with_context(format!("using {}", kept.display()))
                .with_context(format!("ignoring {}", discarded.display()))
                .with_suggestion(suggestions::DUPLICATE_NAME),

            ScanProblem::Manifest(ManifestError::Parse(e)) => Diagnostic::error(format!(
                "invalid manifest: {} (line {}, column {})",
                e.message, e.line, e.column
            ))
            .with_location(&e.path),

            ScanProblem::Manifest(e @ ManifestError::Read { .. }) => {
                let mut diag = Diagnostic::error(e.to_string()).with_location(e.path());
                if let Some(source) = std::error::Error::source(e) {
                    diag = diag.with_context(source.to_string());
                }
                diag
            }
        }
    }
}

/// Outcome of scanning one source tree.
#[derive(Debug, Default)]
pub struct Scan {
    pub registry: Registry,
    pub problems: Vec<ScanProblem>,
}

/// Discover all subprojects under `root`.
///
/// Entries are visited in file-name order so repeated scans of an unchanged
/// tree produce the same registry, including for duplicate-name ties.
pub fn scan(root: &Path) -> Result<Scan> {
    if !root.is_dir() {
        bail!("`{}` is not a directory", root.display());
    }

    let mut out = Scan::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != ".git");

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_dir() || !entry.path().join(MANIFEST_NAME).is_file() {
            continue;
        }

        let dir = entry.path();
        let name = subproject_name(dir);
        let decl = match ManifestDeclaration::load(name.as_str(), dir) {
            Ok(decl) => decl,
            Err(e) => {
                tracing::debug!("{}", e);
                out.problems.push(ScanProblem::Manifest(e));
                continue;
            }
        };

        tracing::debug!("found subproject {} at {}", name, dir.display());
        match out.registry.insert(Subproject::from_manifest(decl, dir)) {
            Insertion::Added => {}
            Insertion::Replaced { previous } => out.problems.push(ScanProblem::DuplicateName {
                name,
                kept: dir.to_path_buf(),
                discarded: previous.path().to_path_buf(),
            }),
            Insertion::Kept { discarded } => {
                let kept = out
                    .registry
                    .get(&name)
                    .map(|sp| sp.path().to_path_buf())
                    .unwrap_or_default();
                out.problems.push(ScanProblem::DuplicateName {
                    name,
                    kept,
                    discarded: discarded.path().to_path_buf(),
                });
            }
        }
    }

    Ok(out)
}

/// Print what a scan found.
pub fn report(scan: &Scan, root: &Path, shell: &Shell) {
    for sp in &scan.registry {
        shell.detail(format!("{} at {}", sp.name(), sp.path().display()));
    }
    shell.status(
        Status::Found,
        format!(
            "{} subproject{} in {}",
            scan.registry.len(),
            if scan.registry.len() == 1 { "" } else { "s" },
            root.display()
        ),
    );

    for problem in &scan.problems {
        if let (true, ScanProblem::Manifest(ManifestError::Parse(e))) =
            (shell.is_verbose(), problem)
        {
            eprint!("{}", render_report(e, shell.use_color()));
            continue;
        }
        shell.diagnostic(&problem.to_diagnostic());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_subproject;
    use tempfile::TempDir;

    #[test]
    fn test_scan_finds_nested_subprojects() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_subproject(&root.join("alpha"), &["beta"], &["alpha.hpp"]);
        write_subproject(&root.join("alpha/vendor/beta"), &[], &["beta.hpp"]);
        std::fs::create_dir_all(root.join("docs")).unwrap();

        let scan = scan(root).unwrap();
        assert!(scan.problems.is_empty());
        assert_eq!(scan.registry.len(), 2);

        let alpha = scan.registry.get("alpha").unwrap();
        assert_eq!(alpha.path(), root.join("alpha"));
        assert_eq!(alpha.dependencies(), ["beta"]);
        assert_eq!(
            scan.registry.get("beta").unwrap().path(),
            root.join("alpha/vendor/beta")
        );
    }

    #[test]
    fn test_duplicate_name_keeps_shorter_path() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        // `a/b/util` is visited before `libs/util` in file-name order.
        write_subproject(&root.join("a/b/util"), &[], &["deep.hpp"]);
        write_subproject(&root.join("libs/util"), &[], &["util.hpp"]);

        let scan = scan(&root).unwrap();
        let util = scan.registry.get("util").unwrap();
        assert_eq!(util.path(), root.join("libs/util"));
        assert_eq!(util.exports(), ["util.hpp"]);

        assert_eq!(scan.problems.len(), 1);
        match &scan.problems[0] {
            ScanProblem::DuplicateName {
                name,
                kept,
                discarded,
            } => {
                assert_eq!(name, "util");
                assert_eq!(kept, &root.join("libs/util"));
                assert_eq!(discarded, &root.join("a/b/util"));
            }
            other => panic!("unexpected problem: {:?}", other),
        }

        let diag = scan.problems[0].to_diagnostic().format(false);
        assert!(diag.contains(&root.join("libs/util").display().to_string()));
        assert!(diag.contains(&root.join("a/b/util").display().to_string()));
    }

    #[test]
    fn test_duplicate_name_visited_shorter_first() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        write_subproject(&root.join("a/util"), &[], &["short.hpp"]);
        write_subproject(&root.join("z/y/util"), &[], &["long.hpp"]);

        let scan = scan(&root).unwrap();
        assert_eq!(scan.registry.get("util").unwrap().path(), root.join("a/util"));
        assert!(matches!(
            &scan.problems[..],
            [ScanProblem::DuplicateName { discarded, .. }] if discarded == &root.join("z/y/util")
        ));
    }

    #[test]
    fn test_bad_manifest_does_not_stop_scan() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_subproject(&root.join("good"), &[], &["good.hpp"]);
        std::fs::create_dir_all(root.join("bad")).unwrap();
        std::fs::write(root.join("bad").join(MANIFEST_NAME), "[subproject\nexport = x\n")
            .unwrap();

        let scan = scan(root).unwrap();
        assert!(scan.registry.contains("good"));
        assert!(!scan.registry.contains("bad"));
        assert!(matches!(
            &scan.problems[..],
            [ScanProblem::Manifest(ManifestError::Parse(_))]
        ));
    }

    #[test]
    fn test_git_directory_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_subproject(&root.join(".git/modules/ghost"), &[], &[]);
        write_subproject(&root.join("real"), &[], &[]);

        let scan = scan(root).unwrap();
        assert_eq!(scan.registry.names().collect::<Vec<_>>(), vec!["real"]);
    }

    #[test]
    fn test_scan_requires_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(scan(&tmp.path().join("missing")).is_err());
    }
}
