//! Acquiring missing subprojects.
//!
//! When a declared dependency is nowhere in the tree, the resolver asks an
//! [`Acquire`] implementation to bring it in. The interactive implementation
//! consults the remote catalog for a placement hint, asks the operator where
//! the module should live and attaches it as a git submodule there.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::sources::git::ModuleAttacher;
use crate::sources::remote::RemoteCatalog;
use crate::util::fs::ensure_dir;
use crate::util::prompt::Prompter;

/// Outcome of one acquisition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// The module now lives at this path.
    Attached(PathBuf),
    /// The operator chose not to acquire the module.
    Declined,
}

/// Obtains a missing subproject and places it inside `root`.
pub trait Acquire {
    fn acquire(&mut self, root: &Path, name: &str) -> Result<Acquisition>;
}

/// Acquirer that asks the operator and attaches modules with git.
pub struct InteractiveAcquirer<P, C, A> {
    prompter: P,
    catalog: C,
    attacher: A,
}

impl<P, C, A> InteractiveAcquirer<P, C, A>
where
    P: Prompter,
    C: RemoteCatalog,
    A: ModuleAttacher,
{
    pub fn new(prompter: P, catalog: C, attacher: A) -> Self {
        InteractiveAcquirer {
            prompter,
            catalog,
            attacher,
        }
    }

    pub fn prompter_mut(&mut self) -> &mut P {
        &mut self.prompter
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Decide where `name` should be placed inside `root`.
    ///
    /// A first tag in the remote manifest suggests `root/<tag>/<name>`; the
    /// operator may accept it or pick a directory, and the module is placed
    /// in a directory named after it inside the pick.
    pub fn choose_destination(&mut self, root: &Path, name: &str) -> Result<Option<PathBuf>> {
        let tag = match self.catalog.probe_manifest(name) {
            Some(decl) => decl.placement_tag().map(str::to_string),
            None => {
                tracing::info!("no remote manifest for `{}`, proceeding without tags", name);
                None
            }
        };

        if let Some(tag) = tag {
            let suggested = root.join(&tag).join(name);
            let question = format!(
                "`{}` is tagged `{}`. Place it at {}?",
                name,
                tag,
                suggested.display()
            );
            if self.prompter.confirm(&question, true)? {
                return Ok(Some(suggested));
            }
        }

        let question = format!("Where should `{}` be placed?", name);
        Ok(self
            .prompter
            .choose_directory(&question, root)?
            .map(|dir| dir.join(name)))
    }

    /// Attach `name` at `destination`, creating parent directories.
    pub fn attach_at(&mut self, name: &str, destination: &Path) -> Result<()> {
        if let Some(parent) = destination.parent() {
            ensure_dir(parent)?;
        }

        let remote = self.catalog.remote_url(name);
        self.attacher
            .attach(&remote, destination)
            .with_context(|| format!("failed to attach `{}`", name))
    }
}

impl<P, C, A> Acquire for InteractiveAcquirer<P, C, A>
where
    P: Prompter,
    C: RemoteCatalog,
    A: ModuleAttacher,
{
    fn acquire(&mut self, root: &Path, name: &str) -> Result<Acquisition> {
        if !self.catalog.module_exists(name) {
            let question = format!(
                "`{}` was not found in the remote catalog. Try to attach it anyway?",
                name
            );
            if !self.prompter.confirm(&question, false)? {
                return Ok(Acquisition::Declined);
            }
        }

        let Some(destination) = self.choose_destination(root, name)? else {
            return Ok(Acquisition::Declined);
        };

        tracing::info!("attaching `{}` at {}", name, destination.display());
        self.attach_at(name, &destination)?;
        Ok(Acquisition::Attached(destination))
    }
}
