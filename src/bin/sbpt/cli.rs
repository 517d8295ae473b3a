//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sbpt::util::shell::ColorChoice;

/// sbpt - reuse C++ subprojects across projects without hardcoded include paths
#[derive(Parser)]
#[command(name = "sbpt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Do not contact the remote catalog
    #[arg(long, global = true, env = "SBPT_OFFLINE")]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Acquire missing dependencies and generate include files
    Init(InitArgs),

    /// List the subprojects in a source tree
    List(ListArgs),

    /// Create a new subproject with boilerplate files
    Create(CreateArgs),

    /// Add a known remote subproject to a source tree
    Add(AddArgs),

    /// Re-fetch the list of known remote subprojects
    RefreshKnownRepos,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Source tree to configure
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Args)]
pub struct ListArgs {
    /// Source tree to scan
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Directory of the new subproject; its name is the directory name
    pub dir: PathBuf,
}

#[derive(Args)]
pub struct AddArgs {
    /// Source tree to add the subproject to
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
