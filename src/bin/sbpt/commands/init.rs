//! `sbpt init` command

use anyhow::Result;

use crate::cli::InitArgs;
use crate::GlobalOptions;
use sbpt::ops::{resolve, InteractiveAcquirer};
use sbpt::sources::{GitSubmoduleAttacher, GithubCatalog};
use sbpt::util::{InquirePrompter, Status};

pub fn execute(args: InitArgs, global: &GlobalOptions) -> Result<()> {
    let shell = &global.shell;
    let ctx = global.context(&args.dir)?;

    let catalog = GithubCatalog::new(ctx.config())?;
    let mut acquirer =
        InteractiveAcquirer::new(InquirePrompter::new(), catalog, GitSubmoduleAttacher::new());

    let resolution = resolve(&args.dir, &mut acquirer, shell)?;

    for (name, path) in &resolution.acquired {
        shell.detail(format!("acquired `{}` at {}", name, path.display()));
    }
    if resolution.passes > 1 {
        shell.note(format!(
            "configured in {} passes after acquiring {} subproject(s)",
            resolution.passes,
            resolution.acquired.len()
        ));
    }
    shell.status(Status::Finished, "subprojects successfully configured");

    Ok(())
}
