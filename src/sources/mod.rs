//! Where subprojects come from.
//!
//! - `remote`: lookups against the hosting organization
//! - `known_repos`: the cached listing of that organization
//! - `git`: attaching a module as a submodule of the local repository

pub mod git;
pub mod known_repos;
pub mod remote;

pub use git::{AttachError, GitSubmoduleAttacher, ModuleAttacher};
pub use known_repos::KnownRepos;
pub use remote::{GithubCatalog, RemoteCatalog};
