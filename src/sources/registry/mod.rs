//! Registry source - versions from an npm-compatible registry.
//!
//! Each surviving dependency costs one request for its abbreviated package
//! document:
//!
//! ```text
//! GET {registry}/react
//! GET {registry}/@babel%2Fcore
//! Accept: application/vnd.npm.install-v1+json
//! ```
//!
//! Requests for different packages run in parallel inside a single
//! [`VersionSource::resolve_versions`] call, and every request is bounded by
//! the client timeout.

pub mod packument;

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use rayon::prelude::*;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use url::Url;

use crate::resolver::errors::ResolveError;
use crate::resolver::version::{parse_specifier, select_version, Specifier};
use crate::sources::source::{collect_outcomes, VersionSource};

pub use packument::Packument;

/// Default public registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ABBREVIATED_METADATA: &str = "application/vnd.npm.install-v1+json";

/// A source backed by an npm-compatible registry.
pub struct RegistrySource {
    /// Registry base URL
    registry_url: Url,

    /// HTTP client with the request timeout applied
    client: Client,
}

impl RegistrySource {
    /// Create a new registry source.
    pub fn new(registry_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sandcastle/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "failed to build registry HTTP client")?;

        Ok(RegistrySource {
            registry_url,
            client,
        })
    }

    /// Create a source for the public npm registry.
    pub fn public() -> Result<Self> {
        let url = Url::parse(DEFAULT_REGISTRY_URL).with_context(|| "invalid default registry URL")?;
        Self::new(url, DEFAULT_TIMEOUT)
    }

    /// The registry base URL.
    pub fn registry_url(&self) -> &Url {
        &self.registry_url
    }

    /// URL of a package document.
    pub fn package_url(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.registry_url.as_str().trim_end_matches('/'),
            escape_package_name(name)
        )
    }

    /// Fetch and parse a package document.
    fn fetch_packument(&self, name: &str) -> Result<Packument, String> {
        let url = self.package_url(name);
        tracing::debug!("fetching {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, ABBREVIATED_METADATA)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    format!("request to {} timed out", url)
                } else {
                    format!("request to {} failed: {}", url, e)
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err("package not found in registry".to_string());
        }
        if !status.is_success() {
            return Err(format!("registry returned HTTP {}", status));
        }

        let body = response
            .text()
            .map_err(|e| format!("failed to read registry response: {}", e))?;

        Packument::parse(&body).map_err(|e| format!("invalid registry response: {}", e))
    }

    fn resolve_one(&self, name: &str, spec: &str) -> Result<String, String> {
        let specifier = parse_specifier(spec)?;

        if let Specifier::Verbatim(s) = specifier {
            return Ok(s);
        }

        let packument = self.fetch_packument(name)?;
        choose_version(&packument, &specifier, spec)
    }
}

/// Pick a concrete version from a package document.
pub fn choose_version(
    packument: &Packument,
    specifier: &Specifier,
    spec: &str,
) -> Result<String, String> {
    match specifier {
        Specifier::Verbatim(s) => Ok(s.clone()),
        Specifier::Tag(tag) => packument
            .tagged(tag)
            .map(str::to_string)
            .ok_or_else(|| format!("no dist-tag `{}`", tag)),
        Specifier::Range(reqs) => select_version(reqs, packument.version_strings())
            .map(|v| v.to_string())
            .ok_or_else(|| format!("no published version matches `{}`", spec)),
    }
}

impl VersionSource for RegistrySource {
    fn resolve_versions(
        &self,
        requested: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, ResolveError> {
        let outcomes: Vec<(String, Result<String, String>)> = requested
            .par_iter()
            .map(|(name, spec)| (name.clone(), self.resolve_one(name, spec)))
            .collect();

        collect_outcomes(outcomes)
    }
}

/// Scoped names keep their `@` but escape the separating slash.
fn escape_package_name(name: &str) -> String {
    if name.starts_with('@') {
        name.replacen('/', "%2F", 1)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packument() -> Packument {
        Packument::parse(
            r#"{
                "dist-tags": { "latest": "4.17.21", "legacy": "3.10.1" },
                "versions": { "3.10.1": {}, "4.17.20": {}, "4.17.21": {}, "5.0.0-beta.1": {} }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_escape_package_name() {
        assert_eq!(escape_package_name("react"), "react");
        assert_eq!(escape_package_name("@babel/core"), "@babel%2Fcore");
    }

    #[test]
    fn test_package_url() {
        let source =
            RegistrySource::new(Url::parse("https://registry.example.com/").unwrap(), DEFAULT_TIMEOUT)
                .unwrap();
        assert_eq!(
            source.package_url("@types/node"),
            "https://registry.example.com/@types%2Fnode"
        );
        assert_eq!(source.package_url("lodash"), "https://registry.example.com/lodash");
    }

    #[test]
    fn test_choose_version() {
        let doc = packument();
        let pick = |spec: &str| choose_version(&doc, &parse_specifier(spec).unwrap(), spec);

        assert_eq!(pick("^4.17.0").unwrap(), "4.17.21");
        assert_eq!(pick("latest").unwrap(), "4.17.21");
        assert_eq!(pick("legacy").unwrap(), "3.10.1");
        assert_eq!(pick("~3.10").unwrap(), "3.10.1");
        assert!(pick("^6").unwrap_err().contains("no published version"));
        assert!(pick("canary").unwrap_err().contains("no dist-tag"));
    }

    #[test]
    fn test_verbatim_specifiers_skip_the_network() {
        // Port 9 (discard) is never contacted: verbatim specifiers return early.
        let source =
            RegistrySource::new(Url::parse("http://127.0.0.1:9").unwrap(), Duration::from_millis(50))
                .unwrap();
        let mut requested = BTreeMap::new();
        requested.insert("pkg".to_string(), "git+https://example.com/pkg.git".to_string());

        let out = source.resolve_versions(&requested).unwrap();
        assert_eq!(out["pkg"], "git+https://example.com/pkg.git");
    }
}
