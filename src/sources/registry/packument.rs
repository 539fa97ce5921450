//! Registry package documents.
//!
//! Only the parts needed to pick a version are deserialized. Version
//! manifests are skipped without being materialized.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::Deserialize;

/// An abbreviated npm package document.
#[derive(Debug, Deserialize)]
pub struct Packument {
    /// Package name as reported by the registry
    #[serde(default)]
    pub name: Option<String>,

    /// Tag name → version
    #[serde(default, rename = "dist-tags")]
    pub dist_tags: BTreeMap<String, String>,

    /// Published versions
    #[serde(default)]
    pub versions: BTreeMap<String, IgnoredAny>,
}

impl Packument {
    /// Parse a package document.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Version a dist-tag points at.
    pub fn tagged(&self, tag: &str) -> Option<&str> {
        self.dist_tags.get(tag).map(String::as_str)
    }

    /// All published version strings.
    pub fn version_strings(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_abbreviated_document() {
        let doc = r#"{
            "name": "react",
            "modified": "2024-04-26T16:42:56.895Z",
            "dist-tags": { "latest": "18.3.1", "next": "19.0.0-rc.1" },
            "versions": {
                "18.2.0": { "name": "react", "dependencies": { "loose-envify": "^1.1.0" } },
                "18.3.1": { "name": "react", "dist": { "tarball": "https://x" } }
            }
        }"#;

        let packument = Packument::parse(doc).unwrap();
        assert_eq!(packument.name.as_deref(), Some("react"));
        assert_eq!(packument.tagged("latest"), Some("18.3.1"));
        assert_eq!(packument.tagged("beta"), None);
        let versions: Vec<_> = packument.version_strings().collect();
        assert_eq!(versions, vec!["18.2.0", "18.3.1"]);
    }
}
