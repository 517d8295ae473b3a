//! Configuration file support for sbpt.
//!
//! Two configuration file locations are merged:
//! - Global: `~/.sbpt/config.toml` - User-wide defaults
//! - Project: `<root>/.sbpt/config.toml` - Overrides for one source tree
//!
//! Project config takes precedence over global config.
//!
//! ```toml
//! [remote]
//! organization = "cpp-toolbox"
//! clone_url = "git@github.com:{org}/{name}.git"
//!
//! [net]
//! timeout = 10
//! offline = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Organization that hosts subproject repositories by default.
pub const DEFAULT_ORGANIZATION: &str = "cpp-toolbox";

/// sbpt configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where subprojects are fetched from
    pub remote: RemoteConfig,

    /// Network settings
    pub net: NetConfig,
}

/// Remote repository settings.
///
/// Every field is optional in the file so a project config can override a
/// single value without restating the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// GitHub organization owning the subproject repositories
    pub organization: Option<String>,

    /// Branch the remote manifests are read from
    pub branch: Option<String>,

    /// Base URL serving raw repository files
    pub raw_base_url: Option<String>,

    /// Base URL of the repository web pages
    pub web_base_url: Option<String>,

    /// Base URL of the hosting API
    pub api_base_url: Option<String>,

    /// Clone URL template; `{org}` and `{name}` are substituted
    pub clone_url: Option<String>,
}

impl RemoteConfig {
    pub fn organization(&self) -> &str {
        self.organization.as_deref().unwrap_or(DEFAULT_ORGANIZATION)
    }

    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or("main")
    }

    pub fn raw_base_url(&self) -> &str {
        self.raw_base_url
            .as_deref()
            .unwrap_or("https://raw.githubusercontent.com/")
    }

    pub fn web_base_url(&self) -> &str {
        self.web_base_url.as_deref().unwrap_or("https://github.com/")
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or("https://api.github.com/")
    }

    /// Clone URL for the named module.
    pub fn clone_url_for(&self, name: &str) -> String {
        self.clone_url
            .as_deref()
            .unwrap_or("git@github.com:{org}/{name}.git")
            .replace("{org}", self.organization())
            .replace("{name}", name)
    }
}

/// Network-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Request timeout in seconds
    pub timeout: Option<u64>,

    /// Offline mode (every remote lookup reports "not found")
    #[serde(default)]
    pub offline: bool,
}

impl NetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(10))
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let remote = other.remote;
        if remote.organization.is_some() {
            self.remote.organization = remote.organization;
        }
        if remote.branch.is_some() {
            self.remote.branch = remote.branch;
        }
        if remote.raw_base_url.is_some() {
            self.remote.raw_base_url = remote.raw_base_url;
        }
        if remote.web_base_url.is_some() {
            self.remote.web_base_url = remote.web_base_url;
        }
        if remote.api_base_url.is_some() {
            self.remote.api_base_url = remote.api_base_url;
        }
        if remote.clone_url.is_some() {
            self.remote.clone_url = remote.clone_url;
        }

        if other.net.timeout.is_some() {
            self.net.timeout = other.net.timeout;
        }
        if other.net.offline {
            self.net.offline = true;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`<root>/.sbpt/config.toml`)
/// 2. Global config (`~/.sbpt/config.toml`)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global sbpt config directory (`~/.sbpt`).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".sbpt"))
}

/// Get the global config path (`~/.sbpt/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (`<root>/.sbpt/config.toml`).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".sbpt").join("config.toml")
}
