//! Include file generation.
//!
//! Every subproject gets a `sbpt_generated_includes.hpp` listing the exported
//! headers of its direct dependencies, relative to the subproject directory,
//! and a `.gitignore` that keeps the generated file out of version control.

use std::path::{Path, PathBuf};

use crate::core::registry::Registry;
use crate::core::subproject::Subproject;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::{create_if_absent, relative_path, to_slash, write_replace};
use crate::util::shell::{Shell, Status};

/// Name of the generated include file.
pub const GENERATED_FILE_NAME: &str = "sbpt_generated_includes.hpp";

/// Name of the ignore file created next to it.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// A problem found while generating. None of these stop generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateProblem {
    /// `dependent` declares `dependency`, which is not in the registry.
    MissingDependency {
        dependent: String,
        dependency: String,
    },
    /// `dependency` of `dependent` exports nothing.
    NoExports {
        dependent: String,
        dependency: String,
    },
    /// A file of `subproject` could not be written.
    Write {
        subproject: String,
        path: PathBuf,
        message: String,
    },
}

impl GenerateProblem {
    pub fn is_error(&self) -> bool {
        !matches!(self, GenerateProblem::NoExports { .. })
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            GenerateProblem::MissingDependency {
                dependent,
                dependency,
            } => Diagnostic::error(format!(
                "dependency `{}` not found for subproject `{}`",
                dependency, dependent
            ))
            .with_suggestion(suggestions::MISSING_DEPENDENCY),

            GenerateProblem::NoExports {
                dependent,
                dependency,
            } => Diagnostic::warning(format!(
                "dependency `{}` of `{}` exports no files",
                dependency, dependent
            ))
            .with_suggestion(suggestions::NO_EXPORTS),

            GenerateProblem::Write {
                subproject,
                path,
                message,
            } => Diagnostic::error(format!("failed to write includes for `{}`", subproject))
                .with_location(path)
                .with_context(message.clone()),
        }
    }
}

/// Outcome of one generation run.
#[derive(Debug, Default)]
pub struct Generation {
    /// Include files written, in registry order.
    pub written: Vec<PathBuf>,
    pub problems: Vec<GenerateProblem>,
}

/// Compute the include lines for `subproject`.
///
/// Only direct dependencies contribute; a dependency's own dependencies are
/// its business.
pub fn include_directives(
    registry: &Registry,
    subproject: &Subproject,
) -> (Vec<String>, Vec<GenerateProblem>) {
    let mut lines = Vec::new();
    let mut problems = Vec::new();

    for dep_name in subproject.dependencies() {
        let Some(dep) = registry.get(dep_name) else {
            problems.push(GenerateProblem::MissingDependency {
                dependent: subproject.name().to_string(),
                dependency: dep_name.clone(),
            });
            continue;
        };

        if dep.exports().is_empty() {
            problems.push(GenerateProblem::NoExports {
                dependent: subproject.name().to_string(),
                dependency: dep_name.clone(),
            });
            continue;
        }

        let rel = relative_path(subproject.path(), dep.path());
        for export in dep.exports() {
            lines.push(format!(
                "#include \"{}\"",
                to_slash(&rel.join(Path::new(export)))
            ));
        }
    }

    (lines, problems)
}

/// Write include files (and ignore files where absent) for every subproject.
pub fn generate(registry: &Registry) -> Generation {
    let mut out = Generation::default();

    for sp in registry {
        let (lines, problems) = include_directives(registry, sp);
        out.problems.extend(problems);

        let target = sp.path().join(GENERATED_FILE_NAME);
        let write_problem = |path: &Path, e: anyhow::Error| GenerateProblem::Write {
            subproject: sp.name().to_string(),
            path: path.to_path_buf(),
            message: format!("{:#}", e),
        };

        if let Err(e) = write_replace(&target, &lines.join("\n")) {
            tracing::warn!("{}: {:#}", target.display(), e);
            out.problems.push(write_problem(&target, e));
            continue;
        }
        tracing::debug!("wrote {} include(s) to {}", lines.len(), target.display());
        out.written.push(target);

        let ignore = sp.path().join(IGNORE_FILE_NAME);
        let ignore_content = format!("{}\n{}\n", IGNORE_FILE_NAME, GENERATED_FILE_NAME);
        match create_if_absent(&ignore, &ignore_content) {
            Ok(true) => tracing::debug!("created {}", ignore.display()),
            Ok(false) => {}
            Err(e) => out.problems.push(write_problem(&ignore, e)),
        }
    }

    out
}

/// Print what a generation run did.
pub fn report(generation: &Generation, shell: &Shell) {
    for path in &generation.written {
        shell.detail(path.display());
    }
    for problem in &generation.problems {
        shell.diagnostic(&problem.to_diagnostic());
    }
    shell.status(
        Status::Generated,
        format!(
            "include file{} for {} subproject{}",
            if generation.written.len() == 1 { "" } else { "s" },
            generation.written.len(),
            if generation.written.len() == 1 { "" } else { "s" },
        ),
    );
}
