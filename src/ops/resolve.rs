//! Resolving subproject dependencies.
//!
//! Resolution runs in passes. Each pass scans the tree, verifies that every
//! declared dependency is present and acquires the ones that are not. Once a
//! pass finds nothing missing, include files are generated exactly once.
//!
//! Acquired modules are only known to the pass that attached them; the next
//! pass always rescans and reads their real manifests, which may declare
//! further dependencies.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::subproject::Subproject;
use crate::ops::acquire::{Acquire, Acquisition};
use crate::ops::generate::{self, Generation};
use crate::ops::scan;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::shell::{Shell, Status};

/// Where a resolution currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scanning,
    Verifying,
    AcquiringMissing,
    Generating,
    Done,
    Aborted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Scanning => "scanning",
            Phase::Verifying => "verifying",
            Phase::AcquiringMissing => "acquiring missing",
            Phase::Generating => "generating",
            Phase::Done => "done",
            Phase::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Why resolution stopped without generating includes.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("could not acquire `{dependency}` (required by `{dependent}`): {reason}")]
    AcquisitionAborted {
        dependency: String,
        dependent: String,
        reason: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ResolveError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::AcquisitionAborted { .. } => Diagnostic::error(self.to_string())
                .with_context("include files were not generated")
                .with_suggestion(suggestions::ACQUISITION_ABORTED),
            ResolveError::Other(e) => Diagnostic::error(format!("{:#}", e)),
        }
    }
}

/// Outcome of a completed resolution.
#[derive(Debug)]
pub struct Resolution {
    /// Number of scan passes, including the final one.
    pub passes: usize,
    /// Modules attached along the way, in acquisition order.
    pub acquired: Vec<(String, PathBuf)>,
    pub generation: Generation,
}

fn enter(phase: Phase, pass: usize) {
    tracing::debug!(pass, "resolution {}", phase);
}

/// Bring the tree under `root` to a state where every declared dependency
/// is present, then generate include files.
pub fn resolve(
    root: &Path,
    acquirer: &mut dyn Acquire,
    shell: &Shell,
) -> Result<Resolution, ResolveError> {
    let mut passes = 0;
    let mut acquired = Vec::new();

    let registry = loop {
        passes += 1;

        enter(Phase::Scanning, passes);
        shell.status(Status::Scanning, root.display());
        let scan = scan::scan(root)?;
        scan::report(&scan, root, shell);
        let mut registry = scan.registry;

        enter(Phase::Verifying, passes);
        shell.status(
            Status::Verifying,
            format!("dependencies of {} subprojects", registry.len()),
        );
        let missing = registry.missing_dependencies();
        if missing.is_empty() {
            break registry;
        }

        enter(Phase::AcquiringMissing, passes);
        for m in missing {
            // Several subprojects may share one missing dependency.
            if registry.contains(&m.dependency) {
                continue;
            }

            shell.status(
                Status::Missing,
                format!("`{}` (required by `{}`)", m.dependency, m.dependent),
            );
            let aborted = |reason: String| {
                enter(Phase::Aborted, passes);
                ResolveError::AcquisitionAborted {
                    dependency: m.dependency.clone(),
                    dependent: m.dependent.clone(),
                    reason,
                }
            };

            match acquirer.acquire(root, &m.dependency) {
                Ok(Acquisition::Attached(path)) => {
                    shell.status(
                        Status::Attached,
                        format!("`{}` at {}", m.dependency, path.display()),
                    );
                    registry.insert(Subproject::acquired(m.dependency.as_str(), path.as_path()));
                    acquired.push((m.dependency.clone(), path));
                }
                Ok(Acquisition::Declined) => {
                    return Err(aborted("declined".to_string()));
                }
                Err(e) => {
                    return Err(aborted(format!("{:#}", e)));
                }
            }
        }
    };

    enter(Phase::Generating, passes);
    shell.status(Status::Generating, "include files");
    let generation = generate::generate(&registry);
    generate::report(&generation, shell);

    enter(Phase::Done, passes);
    Ok(Resolution {
        passes,
        acquired,
        generation,
    })
}
