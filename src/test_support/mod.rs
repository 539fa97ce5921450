//! Test utilities and mocks for Sandcastle unit tests.
//!
//! This module provides deterministic stand-ins for the pipeline's external
//! collaborators so the core can be tested without a registry.
//!
//! # Example
//!
//! ```rust,ignore
//! use sandcastle::test_support::{MockVersionSource, TreeFixture};
//!
//! #[test]
//! fn test_example() {
//!     let tree = TreeFixture::react_app().build();
//!     let source = MockVersionSource::new().with_version("react", "18.3.1");
//!
//!     // Use mocks in tests...
//! }
//! ```

pub mod fixtures;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use crate::core::descriptor::{Denormalize, DenormalizedTree, SandboxFile};
use crate::core::tree::SourceTree;
use crate::resolver::errors::ResolveError;
use crate::sources::source::{collect_outcomes, VersionSource};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Mock version source with a fixed name → version table.
///
/// Records every request so tests can assert on what was asked for.
#[derive(Debug, Clone, Default)]
pub struct MockVersionSource {
    versions: BTreeMap<String, String>,
    omitted: BTreeSet<String>,
    unavailable: bool,
    requests: Arc<Mutex<Vec<BTreeMap<String, String>>>>,
}

impl MockVersionSource {
    /// Create a source that knows no packages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source that fails every requested name, known or not.
    pub fn failing() -> Self {
        MockVersionSource {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Register a package version.
    pub fn with_version(mut self, name: &str, version: &str) -> Self {
        self.versions.insert(name.to_string(), version.to_string());
        self
    }

    /// Silently leave a name out of successful answers.
    pub fn omitting(mut self, name: &str) -> Self {
        self.omitted.insert(name.to_string());
        self
    }

    /// Number of `resolve_versions` calls made.
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// The most recent request (empty if none).
    pub fn requested(&self) -> BTreeMap<String, String> {
        self.requests
            .lock()
            .ok()
            .and_then(|r| r.last().cloned())
            .unwrap_or_default()
    }
}

impl VersionSource for MockVersionSource {
    fn resolve_versions(
        &self,
        requested: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, ResolveError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(requested.clone());
        }

        let outcomes = requested.keys().map(|name| {
            let outcome = if self.unavailable {
                Err("source unavailable".to_string())
            } else {
                self.versions
                    .get(name)
                    .cloned()
                    .ok_or_else(|| "package not found".to_string())
            };
            (name.clone(), outcome)
        });

        let mut resolved = collect_outcomes(outcomes)?;
        resolved.retain(|name, _| !self.omitted.contains(name));
        Ok(resolved)
    }
}

/// Denormalizer that records how many times it ran.
#[derive(Debug, Default)]
pub struct CountingDenormalizer {
    pub runs: Mutex<usize>,
}

impl Denormalize for CountingDenormalizer {
    fn denormalize(&self, tree: &SourceTree) -> DenormalizedTree {
        if let Ok(mut runs) = self.runs.lock() {
            *runs += 1;
        }
        crate::core::descriptor::FlatDenormalizer.denormalize(tree)
    }
}

/// Build a top-level script file record.
pub fn js_file(path: &str, code: &str) -> SandboxFile {
    let title = path.rsplit('/').next().unwrap_or(path);
    SandboxFile {
        shortid: crate::core::descriptor::shortid("file", path),
        title: title.to_string(),
        directory_shortid: None,
        code: code.to_string(),
        is_binary: false,
    }
}

/// Check a resolve error names exactly the given packages.
pub fn assert_failed_names(err: &ResolveError, expected: &[&str]) {
    assert_eq!(err.names(), expected, "unexpected failing packages: {}", err);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_records_requests() {
        let source = MockVersionSource::new().with_version("react", "18.3.1");
        let mut requested = BTreeMap::new();
        requested.insert("react".to_string(), "^18".to_string());

        let out = source.resolve_versions(&requested).unwrap();
        assert_eq!(out["react"], "18.3.1");
        assert_eq!(source.calls(), 1);
        assert_eq!(source.requested(), requested);
    }

    #[test]
    fn test_mock_source_fails_unknown_names() {
        let mut requested = BTreeMap::new();
        requested.insert("ghost".to_string(), "^1".to_string());

        let err = MockVersionSource::failing()
            .resolve_versions(&requested)
            .unwrap_err();
        assert_failed_names(&err, &["ghost"]);
    }

    #[test]
    fn test_failing_source_fails_known_names() {
        let mut requested = BTreeMap::new();
        requested.insert("react".to_string(), "^18".to_string());

        let source = MockVersionSource::failing().with_version("react", "18.3.1");
        let err = source.resolve_versions(&requested).unwrap_err();
        assert_failed_names(&err, &["react"]);
        assert_eq!(source.calls(), 1);

        let ok = MockVersionSource::new().with_version("react", "18.3.1");
        assert!(ok.resolve_versions(&requested).is_ok());
    }
}
