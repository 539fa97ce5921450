//! Sandcastle - turns a fetched source tree into a sandbox descriptor
//!
//! This crate provides template detection, dependency usage scanning,
//! version resolution and HTML resource extraction, composed into a single
//! descriptor-building operation.

pub mod core;
pub mod html;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities and mocks for Sandcastle unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides deterministic version sources, a counting
/// denormalizer and source tree fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    descriptor::SandboxDescriptor, manifest::PackageJson, template::Template, tree::SourceTree,
};

pub use ops::{create_sandbox, CreateOptions, SandboxError};
pub use sources::VersionSource;
