//! sbpt CLI - C++ subproject tool

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use sbpt::ops::ResolveError;
use sbpt::util::{GlobalContext, Shell};

/// Options shared by every command.
pub struct GlobalOptions {
    pub shell: Shell,
    pub offline: bool,
}

impl GlobalOptions {
    /// Context for a command operating on the tree at `project_root`.
    pub fn context(&self, project_root: &Path) -> Result<GlobalContext> {
        let cwd = std::env::current_dir()?;
        let ctx = GlobalContext::for_project(&cwd, project_root)?;

        if self.offline {
            let mut config = ctx.config().clone();
            config.net.offline = true;
            return Ok(ctx.with_config(config));
        }
        Ok(ctx)
    }
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("sbpt=debug")
    } else {
        EnvFilter::new("sbpt=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let json = matches!(&cli.command, Commands::List(args) if args.json);
    let global = GlobalOptions {
        shell: Shell::from_flags(cli.quiet, cli.verbose, cli.color, json),
        offline: cli.offline,
    };

    if let Err(e) = run(cli.command, &global) {
        match e.downcast_ref::<ResolveError>() {
            Some(err) => global.shell.diagnostic(&err.to_diagnostic()),
            None => global.shell.error(format!("{:#}", e)),
        }
        std::process::exit(1);
    }
}

fn run(command: Commands, global: &GlobalOptions) -> Result<()> {
    match command {
        Commands::Init(args) => commands::init::execute(args, global),
        Commands::List(args) => commands::list::execute(args, global),
        Commands::Create(args) => commands::create::execute(args, global),
        Commands::Add(args) => commands::add::execute(args, global),
        Commands::RefreshKnownRepos => commands::refresh::execute(global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
