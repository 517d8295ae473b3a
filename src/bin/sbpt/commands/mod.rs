//! Command implementations

pub mod add;
pub mod completions;
pub mod create;
pub mod init;
pub mod list;
pub mod refresh;
