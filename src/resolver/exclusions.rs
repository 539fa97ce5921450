//! Dependencies that are irrelevant in the sandbox runtime.
//!
//! Some declared dependencies mean nothing once code runs in a browser
//! sandbox (type-only packages, git hooks, native watchers) and some must be
//! swapped for a browser-capable counterpart. The policy applies both.

use crate::core::manifest::DependencyMap;

/// What happens to a dependency under the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Keep,
    Remove,
    /// Replace with another package and version specifier
    Rewrite { name: String, version: String },
}

/// Names dropped from every sandbox.
const EXCLUDED: &[&str] = &["node", "fsevents", "husky", "lint-staged"];

/// Name prefixes dropped from every sandbox.
const EXCLUDED_PREFIXES: &[&str] = &["@types/"];

/// Packages replaced by a browser-capable counterpart.
const REWRITES: &[(&str, &str, &str)] = &[("react-native", "react-native-web", "*")];

/// Exclusion and alteration policy.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPolicy {
    /// Additional names to exclude (from configuration)
    extra: Vec<String>,
}

impl ExclusionPolicy {
    /// Create the built-in policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add names to exclude on top of the built-in table.
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(names.into_iter().map(Into::into));
        self
    }

    /// Decide what to do with one dependency.
    pub fn action(&self, name: &str) -> Action {
        if EXCLUDED.contains(&name)
            || EXCLUDED_PREFIXES.iter().any(|p| name.starts_with(p))
            || self.extra.iter().any(|e| e == name)
        {
            return Action::Remove;
        }

        match REWRITES.iter().find(|(from, _, _)| *from == name) {
            Some((_, to, version)) => Action::Rewrite {
                name: to.to_string(),
                version: version.to_string(),
            },
            None => Action::Keep,
        }
    }

    /// Apply the policy to a candidate dependency set.
    ///
    /// A rewrite never replaces a dependency that is already present under
    /// the target name.
    pub fn apply(&self, candidates: DependencyMap) -> DependencyMap {
        let mut kept = DependencyMap::new();
        let mut rewrites = Vec::new();

        for (name, version) in candidates {
            match self.action(&name) {
                Action::Keep => {
                    kept.insert(name, version);
                }
                Action::Remove => tracing::debug!("excluding dependency `{}`", name),
                Action::Rewrite { name: to, version } => {
                    tracing::debug!("rewriting dependency `{}` to `{}`", name, to);
                    rewrites.push((to, version));
                }
            }
        }

        for (name, version) in rewrites {
            kept.entry(name).or_insert(version);
        }

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(entries: &[(&str, &str)]) -> DependencyMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_builtin_exclusions() {
        let policy = ExclusionPolicy::new();
        let out = policy.apply(deps(&[
            ("react", "^18"),
            ("@types/react", "^18"),
            ("husky", "^8"),
            ("node", "^20"),
        ]));
        assert_eq!(out, deps(&[("react", "^18")]));
    }

    #[test]
    fn test_rewrite_replaces_original_identity() {
        let policy = ExclusionPolicy::new();
        let out = policy.apply(deps(&[("react-native", "0.72.0")]));
        assert!(!out.contains_key("react-native"));
        assert_eq!(out["react-native-web"], "*");
    }

    #[test]
    fn test_rewrite_does_not_override_declared_target() {
        let policy = ExclusionPolicy::new();
        let out = policy.apply(deps(&[
            ("react-native", "0.72.0"),
            ("react-native-web", "^0.19.0"),
        ]));
        assert_eq!(out, deps(&[("react-native-web", "^0.19.0")]));
    }

    #[test]
    fn test_configured_exclusions() {
        let policy = ExclusionPolicy::new().with_excluded(["eslint"]);
        assert_eq!(policy.action("eslint"), Action::Remove);
        assert_eq!(policy.action("prettier"), Action::Keep);
    }
}
