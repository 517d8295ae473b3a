//! `sbpt add` command

use anyhow::{Context, Result};

use crate::cli::AddArgs;
use crate::GlobalOptions;
use sbpt::ops::{add_subproject, AddOutcome, InteractiveAcquirer};
use sbpt::sources::{GitSubmoduleAttacher, GithubCatalog, KnownRepos};
use sbpt::util::diagnostic::suggestions;
use sbpt::util::{InquirePrompter, Status};

pub fn execute(args: AddArgs, global: &GlobalOptions) -> Result<()> {
    let shell = &global.shell;
    let ctx = global.context(&args.dir)?;

    let catalog = GithubCatalog::new(ctx.config())?;
    let organization = ctx.config().remote.organization().to_string();

    let known = {
        let _spinner = shell.spinner(Status::Fetching, "known subprojects");
        KnownRepos::load_or_fetch(&catalog, &organization, &ctx.known_repos_path())
    };
    let known = known
        .map_err(|e| {
            shell.note(suggestions::FETCH_FAILED);
            e
        })
        .with_context(|| format!("failed to load known subprojects of {}", organization))?;

    let mut acquirer =
        InteractiveAcquirer::new(InquirePrompter::new(), catalog, GitSubmoduleAttacher::new());

    match add_subproject(&args.dir, &known, &mut acquirer, shell)? {
        AddOutcome::Added { name, path, .. } => {
            shell.status(
                Status::Finished,
                format!("`{}` added at {}", name, path.display()),
            );
            shell.status(Status::Finished, "subprojects successfully configured");
        }
        AddOutcome::Cancelled => shell.note("nothing added"),
    }

    Ok(())
}
