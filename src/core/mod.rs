//! Core data structures for sbpt.
//!
//! - Manifest declarations read from `sbpt.ini`
//! - Subproject entries
//! - The name-keyed registry and its duplicate policy

pub mod manifest;
pub mod registry;
pub mod subproject;

pub use manifest::{ManifestDeclaration, ManifestError, ManifestParseError, MANIFEST_NAME};
pub use registry::{Insertion, MissingDependency, Registry};
pub use subproject::{subproject_name, Subproject};
