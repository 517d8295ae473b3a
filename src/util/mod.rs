//! Shared utilities

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod fs;
pub mod process;
pub mod prompt;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use diagnostic::Diagnostic;
pub use prompt::{InquirePrompter, Prompter};
pub use shell::{Shell, Status};
