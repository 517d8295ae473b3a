//! Implementation of `sbpt add`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::ops::acquire::InteractiveAcquirer;
use crate::ops::resolve::{resolve, Resolution};
use crate::ops::scan::scan;
use crate::sources::git::ModuleAttacher;
use crate::sources::known_repos::KnownRepos;
use crate::sources::remote::RemoteCatalog;
use crate::util::prompt::Prompter;
use crate::util::shell::{Shell, Status};

/// What `sbpt add` ended up doing.
#[derive(Debug)]
pub enum AddOutcome {
    /// `name` was attached at `path` and the tree was resolved.
    Added {
        name: String,
        path: PathBuf,
        resolution: Resolution,
    },
    /// The operator backed out before anything was attached.
    Cancelled,
}

/// Known module names not already present under `root`.
pub fn candidates(known: &KnownRepos, root: &Path) -> Result<Vec<String>> {
    let present = scan(root)?.registry;
    Ok(known
        .names
        .iter()
        .filter(|name| !present.contains(name))
        .cloned()
        .collect())
}

/// Let the operator pick a known module, attach it under `root` and resolve
/// the tree, acquiring whatever the new module depends on.
pub fn add_subproject<P, C, A>(
    root: &Path,
    known: &KnownRepos,
    acquirer: &mut InteractiveAcquirer<P, C, A>,
    shell: &Shell,
) -> Result<AddOutcome>
where
    P: Prompter,
    C: RemoteCatalog,
    A: ModuleAttacher,
{
    let options = candidates(known, root)?;
    if options.is_empty() {
        shell.note(format!(
            "every known subproject of {} is already present",
            known.organization
        ));
        return Ok(AddOutcome::Cancelled);
    }

    let Some(index) = acquirer
        .prompter_mut()
        .select("Which subproject do you want to add?", &options)?
    else {
        return Ok(AddOutcome::Cancelled);
    };
    let name = options[index].clone();

    let Some(path) = acquirer.choose_destination(root, &name)? else {
        return Ok(AddOutcome::Cancelled);
    };

    shell.status(Status::Acquiring, format!("`{}`", name));
    acquirer.attach_at(&name, &path)?;
    shell.status(Status::Added, format!("`{}` at {}", name, path.display()));

    let resolution = resolve(root, acquirer, shell)?;
    Ok(AddOutcome::Added {
        name,
        path,
        resolution,
    })
}
