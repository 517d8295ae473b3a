//! Attaching remote modules as git submodules.

use std::io;
use std::path::{Path, PathBuf};

use git2::Repository;
use thiserror::Error;

use crate::util::fs::{relative_path, to_slash};
use crate::util::process::{find_git, ProcessBuilder};

/// Failure to bring a remote module under version control.
#[derive(Debug, Error)]
pub enum AttachError {
    #[error("`{}` is not inside a git work tree", .path.display())]
    NotARepository {
        path: PathBuf,
        #[source]
        source: Option<git2::Error>,
    },

    #[error("`{}` is already registered as a submodule", .path.display())]
    AlreadyRegistered { path: PathBuf },

    #[error("destination `{}` already exists and is not empty", .path.display())]
    DestinationOccupied { path: PathBuf },

    #[error("git executable not found in PATH")]
    GitNotFound,

    #[error("failed to attach `{remote}` at `{}`: {message}", .path.display())]
    CommandFailed {
        remote: String,
        path: PathBuf,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Brings a named remote module's content under version control at a path.
pub trait ModuleAttacher {
    fn attach(&mut self, remote: &str, destination: &Path) -> Result<(), AttachError>;
}

/// Attaches modules with `git submodule add` inside the enclosing
/// repository.
#[derive(Debug, Default)]
pub struct GitSubmoduleAttacher;

impl GitSubmoduleAttacher {
    pub fn new() -> Self {
        GitSubmoduleAttacher
    }

    /// Locate the repository enclosing `destination` and return it together
    /// with the destination's path relative to the work tree.
    fn locate(destination: &Path) -> Result<(Repository, PathBuf), AttachError> {
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let not_a_repo = |source| AttachError::NotARepository {
            path: destination.to_path_buf(),
            source,
        };

        let repo = Repository::discover(parent).map_err(|e| not_a_repo(Some(e)))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| not_a_repo(None))?
            .canonicalize()?;

        let file_name = destination.file_name().ok_or_else(|| not_a_repo(None))?;
        let absolute = parent.canonicalize()?.join(file_name);
        if !absolute.starts_with(&workdir) {
            return Err(not_a_repo(None));
        }

        let relative = relative_path(&workdir, &absolute);
        Ok((repo, relative))
    }
}

impl ModuleAttacher for GitSubmoduleAttacher {
    fn attach(&mut self, remote: &str, destination: &Path) -> Result<(), AttachError> {
        let (repo, relative) = Self::locate(destination)?;

        if let Ok(submodules) = repo.submodules() {
            if submodules.iter().any(|sm| sm.path() == relative.as_path()) {
                return Err(AttachError::AlreadyRegistered {
                    path: destination.to_path_buf(),
                });
            }
        }

        if destination.is_dir() && destination.read_dir()?.next().is_some() {
            return Err(AttachError::DestinationOccupied {
                path: destination.to_path_buf(),
            });
        }

        let git = find_git().ok_or(AttachError::GitNotFound)?;
        let workdir = repo.workdir().unwrap_or(Path::new("."));

        tracing::info!("git submodule add {} {}", remote, to_slash(&relative));
        ProcessBuilder::new(git)
            .args(["submodule", "add", remote])
            .arg(to_slash(&relative))
            .cwd(workdir)
            .exec_and_check()
            .map_err(|e| AttachError::CommandFailed {
                remote: remote.to_string(),
                path: destination.to_path_buf(),
                message: format!("{:#}", e),
            })?;

        Ok(())
    }
}
