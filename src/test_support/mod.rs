//! Test doubles for the interactive and remote seams.
//!
//! The resolver and acquirer talk to the operator, the network and git
//! through traits. The stubs here answer deterministically so unit tests
//! never prompt, fetch or shell out.
//!
//! # Example
//!
//! ```rust,ignore
//! use sbpt::test_support::{Answer, StubAttacher, StubCatalog, StubPrompter};
//!
//! let catalog = StubCatalog::new().with_module("util", None);
//! let prompter = StubPrompter::new([Answer::Directory(Some(root.clone()))]);
//! let acquirer = InteractiveAcquirer::new(prompter, catalog, StubAttacher::new());
//! ```

pub mod fixtures;

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::manifest::{ManifestDeclaration, MANIFEST_NAME};
use crate::core::subproject::subproject_name;
use crate::ops::acquire::{Acquire, Acquisition};
use crate::sources::git::{AttachError, ModuleAttacher};
use crate::sources::remote::RemoteCatalog;
use crate::util::prompt::Prompter;

pub use fixtures::*;

/// A scripted answer for [`StubPrompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Select(Option<usize>),
    Confirm(bool),
    Directory(Option<PathBuf>),
}

/// Prompter that replays scripted answers in order.
///
/// Asking a question of a different kind than the next answer, or running
/// out of answers, is an error so tests fail loudly on unexpected prompts.
#[derive(Debug, Default)]
pub struct StubPrompter {
    answers: VecDeque<Answer>,
    /// Prompts seen so far.
    pub asked: Vec<String>,
}

impl StubPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        StubPrompter {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.answers.is_empty()
    }

    fn next(&mut self, prompt: &str) -> Result<Answer> {
        self.asked.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("unexpected prompt: {}", prompt),
        }
    }
}

impl Prompter for StubPrompter {
    fn select(&mut self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        match self.next(prompt)? {
            Answer::Select(Some(i)) if i >= options.len() => {
                bail!("scripted choice {} out of {} options", i, options.len())
            }
            Answer::Select(choice) => Ok(choice),
            other => bail!("expected a select answer for `{}`, got {:?}", prompt, other),
        }
    }

    fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
        match self.next(prompt)? {
            Answer::Confirm(yes) => Ok(yes),
            other => bail!("expected a confirm answer for `{}`, got {:?}", prompt, other),
        }
    }

    fn choose_directory(&mut self, prompt: &str, _under: &Path) -> Result<Option<PathBuf>> {
        match self.next(prompt)? {
            Answer::Directory(dir) => Ok(dir),
            other => bail!("expected a directory answer for `{}`, got {:?}", prompt, other),
        }
    }
}

/// In-memory remote catalog.
#[derive(Debug, Default)]
pub struct StubCatalog {
    modules: BTreeMap<String, Option<ManifestDeclaration>>,
}

impl StubCatalog {
    pub fn new() -> Self {
        StubCatalog::default()
    }

    /// Publish `name`, optionally with a remote manifest.
    pub fn with_module(mut self, name: &str, manifest: Option<ManifestDeclaration>) -> Self {
        self.modules.insert(name.to_string(), manifest);
        self
    }
}

impl RemoteCatalog for StubCatalog {
    fn probe_manifest(&self, name: &str) -> Option<ManifestDeclaration> {
        self.modules.get(name).cloned().flatten()
    }

    fn module_exists(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    fn list_modules(&self) -> Result<Vec<String>> {
        Ok(self.modules.keys().cloned().collect())
    }

    fn remote_url(&self, name: &str) -> String {
        format!("stub://{}", name)
    }
}

/// Attacher that creates the destination directory instead of running git.
#[derive(Debug, Default)]
pub struct StubAttacher {
    manifests: HashMap<String, String>,
    fail: bool,
    attached: Vec<(String, PathBuf)>,
}

impl StubAttacher {
    pub fn new() -> Self {
        StubAttacher::default()
    }

    /// An attacher whose every attach fails like a failed `git` run.
    pub fn failing() -> Self {
        StubAttacher {
            fail: true,
            ..Default::default()
        }
    }

    /// Write a manifest when a destination named `name` is attached.
    pub fn with_manifest(mut self, name: &str, deps: &[&str], exports: &[&str]) -> Self {
        self.manifests
            .insert(name.to_string(), manifest_text(deps, exports));
        self
    }

    /// `(remote, destination)` pairs attached so far.
    pub fn attached(&self) -> &[(String, PathBuf)] {
        &self.attached
    }
}

impl ModuleAttacher for StubAttacher {
    fn attach(&mut self, remote: &str, destination: &Path) -> Result<(), AttachError> {
        if self.fail {
            return Err(AttachError::CommandFailed {
                remote: remote.to_string(),
                path: destination.to_path_buf(),
                message: "stub failure".to_string(),
            });
        }

        std::fs::create_dir_all(destination)?;
        let name = subproject_name(destination);
        if let Some(manifest) = self.manifests.get(&name) {
            std::fs::write(destination.join(MANIFEST_NAME), manifest)?;
        }
        self.attached
            .push((remote.to_string(), destination.to_path_buf()));
        Ok(())
    }
}

/// Acquirer that materializes configured modules directly under the root
/// and declines everything else.
#[derive(Debug, Default)]
pub struct StubAcquirer {
    modules: HashMap<String, (Vec<String>, Vec<String>)>,
    requests: Vec<String>,
}

impl StubAcquirer {
    pub fn new() -> Self {
        StubAcquirer::default()
    }

    pub fn with_module(mut self, name: &str, deps: &[&str], exports: &[&str]) -> Self {
        let owned =
            |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        self.modules
            .insert(name.to_string(), (owned(deps), owned(exports)));
        self
    }

    /// Names acquisition was requested for, in order.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}

impl Acquire for StubAcquirer {
    fn acquire(&mut self, root: &Path, name: &str) -> Result<Acquisition> {
        self.requests.push(name.to_string());

        let Some((deps, exports)) = self.modules.get(name) else {
            return Ok(Acquisition::Declined);
        };
        let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
        let exports: Vec<&str> = exports.iter().map(String::as_str).collect();

        let dir = root.join(name);
        write_subproject(&dir, &deps, &exports);
        Ok(Acquisition::Attached(dir))
    }
}
