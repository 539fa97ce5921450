//! VersionSource trait - common interface for version resolution backends.

use std::collections::BTreeMap;

use crate::resolver::errors::ResolveError;

/// Resolves declared version specifiers to concrete versions.
///
/// Implementations receive every surviving dependency in one call and must
/// either return exactly one version per requested name or fail.
pub trait VersionSource {
    /// Resolve name → specifier pairs to name → concrete version.
    fn resolve_versions(
        &self,
        requested: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, ResolveError>;
}

impl<T: VersionSource + ?Sized> VersionSource for &T {
    fn resolve_versions(
        &self,
        requested: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, ResolveError> {
        (**self).resolve_versions(requested)
    }
}

impl<T: VersionSource + ?Sized> VersionSource for Box<T> {
    fn resolve_versions(
        &self,
        requested: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, ResolveError> {
        (**self).resolve_versions(requested)
    }
}

/// Collect per-package outcomes into one all-or-nothing result.
pub fn collect_outcomes<I>(outcomes: I) -> Result<BTreeMap<String, String>, ResolveError>
where
    I: IntoIterator<Item = (String, Result<String, String>)>,
{
    let mut resolved = BTreeMap::new();
    let mut failures = Vec::new();

    for (name, outcome) in outcomes {
        match outcome {
            Ok(version) => {
                resolved.insert(name, version);
            }
            Err(reason) => failures.push((name, reason)),
        }
    }

    if failures.is_empty() {
        Ok(resolved)
    } else {
        failures.sort();
        Err(ResolveError::Unresolvable { failures })
    }
}
