//! Remote subproject catalog.
//!
//! Subprojects live as individual repositories under one hosting
//! organization. The catalog answers three questions about that
//! organization: does a repository exist, what does its manifest declare,
//! and which repositories are there at all.
//!
//! Lookups that only inform a decision (manifest probe, existence check)
//! never fail: any transport error or non-success status is "not found".

use std::path::Path;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

use crate::core::manifest::{ManifestDeclaration, MANIFEST_NAME};
use crate::util::config::{Config, RemoteConfig};

/// Lookups against the place subprojects are published.
pub trait RemoteCatalog {
    /// Fetch and parse the manifest of the named remote module.
    fn probe_manifest(&self, name: &str) -> Option<ManifestDeclaration>;

    /// Whether the named remote module exists.
    fn module_exists(&self, name: &str) -> bool;

    /// Names of every published module.
    fn list_modules(&self) -> Result<Vec<String>>;

    /// Identifier handed to the attach operation for the named module.
    fn remote_url(&self, name: &str) -> String;
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    name: String,
}

/// Repositories per page when listing an organization.
const PAGE_SIZE: usize = 100;

/// Catalog backed by a GitHub organization.
pub struct GithubCatalog {
    client: Client,
    remote: RemoteConfig,
    offline: bool,
}

impl GithubCatalog {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.net.timeout())
            .user_agent(concat!("sbpt/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(GithubCatalog {
            client,
            remote: config.remote.clone(),
            offline: config.net.offline,
        })
    }

    /// URL of the raw manifest file of a module.
    pub fn manifest_url(&self, name: &str) -> Result<Url> {
        join_url(
            self.remote.raw_base_url(),
            &format!(
                "{}/{}/{}/{}",
                self.remote.organization(),
                name,
                self.remote.branch(),
                MANIFEST_NAME
            ),
        )
    }

    /// URL of the repository page of a module.
    pub fn repository_url(&self, name: &str) -> Result<Url> {
        join_url(
            self.remote.web_base_url(),
            &format!("{}/{}", self.remote.organization(), name),
        )
    }

    /// URL of one page of the organization's repository listing.
    pub fn listing_url(&self, page: usize) -> Result<Url> {
        let mut url = join_url(
            self.remote.api_base_url(),
            &format!("orgs/{}/repos", self.remote.organization()),
        )?;
        url.query_pairs_mut()
            .append_pair("per_page", &PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    fn get_text(&self, url: &Url) -> Option<String> {
        let response = match self.client.get(url.clone()).send() {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("request to {} failed: {}", url, e);
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::debug!("{} returned {}", url, response.status());
            return None;
        }
        response.text().ok()
    }
}

impl RemoteCatalog for GithubCatalog {
    fn probe_manifest(&self, name: &str) -> Option<ManifestDeclaration> {
        if self.offline {
            return None;
        }

        let url = self.manifest_url(name).ok()?;
        let text = self.get_text(&url)?;

        match ManifestDeclaration::parse(name, &text, Path::new(url.as_str())) {
            Ok(decl) => Some(decl),
            Err(e) => {
                tracing::warn!("ignoring remote manifest of `{}`: {}", name, e);
                None
            }
        }
    }

    fn module_exists(&self, name: &str) -> bool {
        if self.offline {
            return false;
        }

        let Ok(url) = self.repository_url(name) else {
            return false;
        };
        match self.client.head(url.clone()).send() {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("request to {} failed: {}", url, e);
                false
            }
        }
    }

    fn list_modules(&self) -> Result<Vec<String>> {
        if self.offline {
            bail!("cannot list remote modules in offline mode");
        }

        let mut names = Vec::new();
        for page in 1.. {
            let url = self.listing_url(page)?;
            let response = self
                .client
                .get(url.clone())
                .send()
                .with_context(|| format!("failed to fetch {}", url))?;

            if !response.status().is_success() {
                bail!("failed to fetch {}: HTTP {}", url, response.status());
            }

            let repos: Vec<RepoInfo> = response
                .json()
                .with_context(|| format!("unexpected response from {}", url))?;
            let count = repos.len();
            names.extend(repos.into_iter().map(|r| r.name));

            if count < PAGE_SIZE {
                break;
            }
        }

        names.sort();
        Ok(names)
    }

    fn remote_url(&self, name: &str) -> String {
        self.remote.clone_url_for(name)
    }
}

/// Join `path` onto `base`, treating `base` as a directory.
fn join_url(base: &str, path: &str) -> Result<Url> {
    let base = if base.ends_with('/') {
        Url::parse(base)
    } else {
        Url::parse(&format!("{}/", base))
    }
    .with_context(|| format!("invalid base URL: {}", base))?;

    base.join(path)
        .with_context(|| format!("invalid URL path: {}", path))
}
