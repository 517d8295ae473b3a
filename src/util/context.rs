//! Global context for sbpt operations.
//!
//! Provides centralized access to the merged configuration and the cache
//! directory.

use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;

use crate::util::config::{self, Config};

/// Global context shared by commands.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    config: Config,
    cache_dir: PathBuf,
}

impl GlobalContext {
    /// Create a context whose project config is read from `project_root`.
    ///
    /// `cwd` only matters when no per-user cache directory can be found.
    pub fn for_project(cwd: &Path, project_root: &Path) -> Result<Self> {
        let global = config::global_config_path();
        let config = config::load_config(
            global.as_deref(),
            &config::project_config_path(project_root),
        );

        let cache_dir = match ProjectDirs::from("", "", "sbpt") {
            Some(dirs) => dirs.cache_dir().to_path_buf(),
            None => config::global_config_dir()
                .map(|d| d.join("cache"))
                .unwrap_or_else(|| cwd.join(".sbpt").join("cache")),
        };

        Ok(GlobalContext {
            config,
            cache_dir,
        })
    }

    /// Override the configuration (tests, embedding).
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Override the cache directory.
    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the cached list of known remote repositories.
    pub fn known_repos_path(&self) -> PathBuf {
        self.cache_dir.join("known_repos.json")
    }
}
