//! Cached list of known remote subprojects.
//!
//! Listing an organization is slow and rate limited, so the names are kept
//! in a JSON file in the user cache directory and only refreshed on demand
//! (`sbpt refresh-known-repos`) or when no cache exists yet.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sources::remote::RemoteCatalog;
use crate::util::fs;

/// Contents of the known repositories cache file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownRepos {
    /// Organization the names were listed from
    pub organization: String,
    /// Seconds since the Unix epoch at fetch time
    pub fetched_at: u64,
    /// Repository names, sorted
    pub names: Vec<String>,
}

impl KnownRepos {
    pub fn new(organization: impl Into<String>, mut names: Vec<String>) -> Self {
        names.sort();
        names.dedup();
        let fetched_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        KnownRepos {
            organization: organization.into(),
            fetched_at,
            names,
        }
    }

    /// Load the cache, `None` if it does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let repos = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Some(repos))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("failed to serialize known repos")?;
        fs::write_string(path, &content)
    }

    /// Fetch the listing from `catalog` and overwrite the cache.
    pub fn refresh(catalog: &dyn RemoteCatalog, organization: &str, path: &Path) -> Result<Self> {
        let names = catalog.list_modules()?;
        let repos = KnownRepos::new(organization, names);
        repos.save(path)?;
        tracing::info!(
            "cached {} repositories of {} in {}",
            repos.names.len(),
            organization,
            path.display()
        );
        Ok(repos)
    }

    /// Load the cache, fetching it when missing, unreadable or listed from a
    /// different organization.
    pub fn load_or_fetch(
        catalog: &dyn RemoteCatalog,
        organization: &str,
        path: &Path,
    ) -> Result<Self> {
        match Self::load(path) {
            Ok(Some(repos)) if repos.organization == organization => return Ok(repos),
            Ok(_) => {}
            Err(e) => tracing::warn!("ignoring known repos cache: {:#}", e),
        }
        Self::refresh(catalog, organization, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubCatalog;
    use tempfile::TempDir;

    #[test]
    fn test_new_sorts_and_dedups() {
        let repos = KnownRepos::new(
            "org",
            vec!["b".to_string(), "a".to_string(), "b".to_string()],
        );
        assert_eq!(repos.names, vec!["a", "b"]);
        assert!(repos.fetched_at > 0);
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache/known_repos.json");

        assert!(KnownRepos::load(&path).unwrap().is_none());

        let repos = KnownRepos::new("org", vec!["util".to_string()]);
        repos.save(&path).unwrap();
        assert_eq!(KnownRepos::load(&path).unwrap(), Some(repos));
    }

    #[test]
    fn test_load_or_fetch_uses_cache() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("known_repos.json");
        KnownRepos::new("org", vec!["cached".to_string()])
            .save(&path)
            .unwrap();

        let catalog = StubCatalog::new().with_module("fetched", None);

        let repos = KnownRepos::load_or_fetch(&catalog, "org", &path).unwrap();
        assert_eq!(repos.names, vec!["cached"]);

        let other = KnownRepos::load_or_fetch(&catalog, "other-org", &path).unwrap();
        assert_eq!(other.names, vec!["fetched"]);
        assert_eq!(KnownRepos::load(&path).unwrap().unwrap().organization, "other-org");
    }

    #[test]
    fn test_corrupt_cache_is_refetched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("known_repos.json");
        std::fs::write(&path, "not json").unwrap();

        let catalog = StubCatalog::new().with_module("fresh", None);
        let repos = KnownRepos::load_or_fetch(&catalog, "org", &path).unwrap();
        assert_eq!(repos.names, vec!["fresh"]);
    }
}
