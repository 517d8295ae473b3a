//! High-level operations.
//!
//! This module contains the implementation of sbpt commands and the
//! scan / generate / resolve pipeline they share.

pub mod acquire;
pub mod generate;
pub mod resolve;
pub mod sbpt_add;
pub mod sbpt_create;
pub mod sbpt_list;
pub mod scan;

pub use acquire::{Acquire, Acquisition, InteractiveAcquirer};
pub use generate::{
    generate, include_directives, GenerateProblem, Generation, GENERATED_FILE_NAME,
    IGNORE_FILE_NAME,
};
pub use resolve::{resolve, Phase, Resolution, ResolveError};
pub use sbpt_add::{add_subproject, AddOutcome};
pub use sbpt_create::{create_subproject, Scaffold};
pub use sbpt_list::{format_listing, list_subprojects, ListEntry, Listing};
pub use scan::{scan, Scan, ScanProblem};
