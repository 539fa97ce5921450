//! Core data structures for Sandcastle.
//!
//! This module contains the foundational types used throughout Sandcastle:
//! - The in-memory source tree
//! - The package.json manifest
//! - Template classification
//! - The sandbox descriptor and tree denormalization

pub mod descriptor;
pub mod manifest;
pub mod template;
pub mod tree;

pub use descriptor::{
    DenormalizedTree, Denormalize, FlatDenormalizer, SandboxDescriptor, SandboxDirectory,
    SandboxFile,
};
pub use manifest::{DependencyMap, PackageJson, MANIFEST_NAME};
pub use template::Template;
pub use tree::{Module, SourceTree};
