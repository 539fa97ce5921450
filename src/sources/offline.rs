//! Offline source - resolves versions from the specifiers alone.

use std::collections::BTreeMap;

use crate::resolver::errors::ResolveError;
use crate::resolver::version::{lower_bound, parse_specifier, Specifier};
use crate::sources::source::{collect_outcomes, VersionSource};

/// A source that never touches the network.
///
/// Each specifier is pinned to the lowest version it names. Tags and ranges
/// without a lower bound cannot be answered and fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl OfflineSource {
    fn resolve_one(spec: &str) -> Result<String, String> {
        match parse_specifier(spec)? {
            Specifier::Verbatim(s) => Ok(s),
            Specifier::Tag(tag) => Err(format!("dist-tag `{}` needs the registry", tag)),
            Specifier::Range(_) => lower_bound(spec)
                .map(|v| v.to_string())
                .ok_or_else(|| format!("`{}` has no lower bound to pin offline", spec)),
        }
    }
}

impl VersionSource for OfflineSource {
    fn resolve_versions(
        &self,
        requested: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, ResolveError> {
        collect_outcomes(
            requested
                .iter()
                .map(|(name, spec)| (name.clone(), Self::resolve_one(spec))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_offline_pins_lower_bounds() {
        let out = OfflineSource
            .resolve_versions(&request(&[
                ("react", "^18.2.0"),
                ("lodash", "~4.17"),
                ("local", "file:../local"),
            ]))
            .unwrap();
        assert_eq!(out["react"], "18.2.0");
        assert_eq!(out["lodash"], "4.17.0");
        assert_eq!(out["local"], "file:../local");
    }

    #[test]
    fn test_offline_fails_for_every_unpinnable_name() {
        let err = OfflineSource
            .resolve_versions(&request(&[
                ("a", "latest"),
                ("b", "<2"),
                ("c", "1.0.0"),
            ]))
            .unwrap_err();
        assert_eq!(err.names(), vec!["a", "b"]);
    }
}
