//! `sbpt list` command

use anyhow::Result;

use crate::cli::ListArgs;
use crate::GlobalOptions;
use sbpt::ops::{format_listing, list_subprojects};

pub fn execute(args: ListArgs, global: &GlobalOptions) -> Result<()> {
    let shell = &global.shell;
    let listing = list_subprojects(&args.dir)?;

    if shell.is_json() {
        let problems: Vec<String> = listing
            .problems
            .iter()
            .map(|p| p.to_diagnostic().message)
            .collect();
        shell.json_event(&serde_json::json!({
            "subprojects": listing.entries,
            "problems": problems,
        }));
        return Ok(());
    }

    for problem in &listing.problems {
        shell.diagnostic(&problem.to_diagnostic());
    }
    print!("{}", format_listing(&listing.entries));

    Ok(())
}
