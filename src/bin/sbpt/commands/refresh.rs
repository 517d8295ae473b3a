//! `sbpt refresh-known-repos` command

use anyhow::{Context, Result};

use crate::GlobalOptions;
use sbpt::sources::{GithubCatalog, KnownRepos};
use sbpt::util::diagnostic::suggestions;
use sbpt::util::Status;

pub fn execute(global: &GlobalOptions) -> Result<()> {
    let shell = &global.shell;
    let ctx = global.context(&std::env::current_dir()?)?;

    let catalog = GithubCatalog::new(ctx.config())?;
    let organization = ctx.config().remote.organization().to_string();
    let path = ctx.known_repos_path();

    let repos = {
        let _spinner = shell.spinner(Status::Fetching, format!("repositories of {}", organization));
        KnownRepos::refresh(&catalog, &organization, &path)
    };
    let repos = repos
        .map_err(|e| {
            shell.note(suggestions::FETCH_FAILED);
            e
        })
        .with_context(|| format!("failed to refresh known subprojects of {}", organization))?;

    shell.status(
        Status::Finished,
        format!(
            "cached {} known subprojects in {}",
            repos.names.len(),
            path.display()
        ),
    );

    Ok(())
}
