//! sbpt - subproject tool for C++ source trees
//!
//! This crate provides the core library functionality for sbpt: discovering
//! subprojects by their `sbpt.ini` manifests, generating include files that
//! point at their dependencies' exported headers, and acquiring missing
//! dependencies as git submodules.

pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test doubles and fixtures for sbpt unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides scripted prompters, in-memory remote catalogs and attachers
/// that create directories instead of running git.
#[cfg(test)]
pub mod test_support;

pub use core::{ManifestDeclaration, Registry, Subproject};
pub use ops::{resolve, scan, Resolution, ResolveError};
pub use util::context::GlobalContext;
