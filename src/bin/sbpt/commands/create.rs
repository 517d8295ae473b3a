//! `sbpt create` command

use anyhow::Result;

use crate::cli::CreateArgs;
use crate::GlobalOptions;
use sbpt::ops::create_subproject;
use sbpt::util::Status;

pub fn execute(args: CreateArgs, global: &GlobalOptions) -> Result<()> {
    let shell = &global.shell;
    let scaffold = create_subproject(&args.dir)?;

    for path in &scaffold.created {
        shell.status(Status::Created, path.display());
    }
    for path in &scaffold.skipped {
        shell.status(
            Status::Skipped,
            format!("{} (already exists)", path.display()),
        );
    }
    shell.status(
        Status::Finished,
        format!("subproject `{}` created", scaffold.name),
    );

    Ok(())
}
