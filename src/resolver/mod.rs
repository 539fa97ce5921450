//! Dependency resolution.
//!
//! Turns the manifest's declared dependencies into the concrete set a
//! sandbox installs: runtime dependencies, plus the dev dependencies the code
//! actually references, minus what the sandbox runtime has no use for, each
//! pinned to one version. Only direct dependencies are considered.

pub mod errors;
pub mod exclusions;
pub mod usage;
pub mod version;

pub use errors::ResolveError;
pub use exclusions::ExclusionPolicy;

use std::collections::{BTreeMap, BTreeSet};

use crate::core::descriptor::SandboxFile;
use crate::core::manifest::{DependencyMap, PackageJson};
use crate::sources::VersionSource;

/// Resolve the dependencies a sandbox needs.
///
/// Fails when any surviving dependency cannot be resolved; a partial set is
/// never returned.
pub fn resolve(
    pkg: &PackageJson,
    files: &[SandboxFile],
    policy: &ExclusionPolicy,
    source: &dyn VersionSource,
) -> Result<BTreeMap<String, String>, ResolveError> {
    let runtime = pkg.runtime_dependencies();
    let dev = pkg.dev_dependencies();

    let dev_used = if dev.is_empty() {
        DependencyMap::new()
    } else {
        used_dev_dependencies(dev, &usage::scan(files))
    };

    let candidates = policy.apply(merge_dependencies(runtime, dev_used));
    if candidates.is_empty() {
        return Ok(BTreeMap::new());
    }

    tracing::debug!(
        "resolving {} dependencies: {}",
        candidates.len(),
        candidates.keys().cloned().collect::<Vec<_>>().join(", ")
    );

    let resolved = source.resolve_versions(&candidates)?;

    let missing: Vec<String> = candidates
        .keys()
        .filter(|name| !resolved.contains_key(*name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ResolveError::Incomplete { missing });
    }

    // Sources may hand back more than was asked; only requested names are kept.
    Ok(resolved
        .into_iter()
        .filter(|(name, _)| candidates.contains_key(name))
        .collect())
}

/// Keep the dev dependencies referenced by at least one usage reference.
pub fn used_dev_dependencies(dev: DependencyMap, references: &BTreeSet<String>) -> DependencyMap {
    dev.into_iter()
        .filter(|(name, _)| {
            let used = references
                .iter()
                .any(|r| usage::references_dependency(r, name));
            if !used {
                tracing::debug!("dropping unused dev dependency `{}`", name);
            }
            used
        })
        .collect()
}

/// Merge runtime and used dev dependencies.
///
/// Runtime entries always win: a dev entry only adds names the runtime set
/// does not declare.
pub fn merge_dependencies(runtime: DependencyMap, dev_used: DependencyMap) -> DependencyMap {
    let mut merged = runtime;
    for (name, version) in dev_used {
        merged.entry(name).or_insert(version);
    }
    merged
}
