//! package.json manifest parsing.
//!
//! Only the fields the assembly pipeline reads are modeled. Unknown fields
//! are ignored; fields with the wrong type are a parse error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Path of the manifest inside a source tree.
pub const MANIFEST_NAME: &str = "package.json";

/// A name → version-specifier map as declared in the manifest.
pub type DependencyMap = BTreeMap<String, String>;

/// The parsed package.json manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    /// Package name
    #[serde(default)]
    pub name: Option<String>,

    /// Display title, preferred over `name` when present
    #[serde(default)]
    pub title: Option<String>,

    /// Package description
    #[serde(default)]
    pub description: Option<String>,

    /// Keywords for discovery
    #[serde(default)]
    pub keywords: Option<Vec<String>>,

    /// Declared entry file
    #[serde(default)]
    pub main: Option<String>,

    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: Option<DependencyMap>,

    /// Development dependencies
    #[serde(default)]
    pub dev_dependencies: Option<DependencyMap>,
}

impl PackageJson {
    /// Parse manifest content.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Sandbox title: `title`, falling back to `name`.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }

    /// Keywords, or an empty slice.
    pub fn tags(&self) -> &[String] {
        self.keywords.as_deref().unwrap_or(&[])
    }

    /// Runtime dependencies (empty when absent).
    pub fn runtime_dependencies(&self) -> DependencyMap {
        self.dependencies.clone().unwrap_or_default()
    }

    /// Dev dependencies (empty when absent).
    pub fn dev_dependencies(&self) -> DependencyMap {
        self.dev_dependencies.clone().unwrap_or_default()
    }

    /// Check whether a name is declared in either dependency group.
    pub fn declares(&self, name: &str) -> bool {
        let in_map = |map: &Option<DependencyMap>| {
            map.as_ref().is_some_and(|m| m.contains_key(name))
        };
        in_map(&self.dependencies) || in_map(&self.dev_dependencies)
    }

    /// Check whether the manifest declares no dependencies at all.
    pub fn has_no_dependencies(&self) -> bool {
        let empty = |map: &Option<DependencyMap>| map.as_ref().map_or(true, |m| m.is_empty());
        empty(&self.dependencies) && empty(&self.dev_dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_manifest() {
        let content = r#"{
            "name": "my-app",
            "description": "A test app",
            "keywords": ["react", "demo"],
            "main": "src/index.js",
            "dependencies": { "react": "^18.2.0" },
            "devDependencies": { "jest": "^29.0.0" },
            "scripts": { "start": "react-scripts start" }
        }"#;

        let pkg = PackageJson::parse(content).unwrap();
        assert_eq!(pkg.display_title(), Some("my-app"));
        assert_eq!(pkg.description.as_deref(), Some("A test app"));
        assert_eq!(pkg.tags(), ["react".to_string(), "demo".to_string()]);
        assert_eq!(pkg.main.as_deref(), Some("src/index.js"));
        assert_eq!(pkg.runtime_dependencies()["react"], "^18.2.0");
        assert_eq!(pkg.dev_dependencies()["jest"], "^29.0.0");
        assert!(pkg.declares("jest"));
        assert!(!pkg.declares("vue"));
    }

    #[test]
    fn test_title_preferred_over_name() {
        let pkg = PackageJson::parse(r#"{"name": "pkg", "title": "Nice Title"}"#).unwrap();
        assert_eq!(pkg.display_title(), Some("Nice Title"));
    }

    #[test]
    fn test_missing_dependency_maps_are_empty() {
        let pkg = PackageJson::parse(r#"{"name": "bare"}"#).unwrap();
        assert!(pkg.runtime_dependencies().is_empty());
        assert!(pkg.dev_dependencies().is_empty());
        assert!(pkg.has_no_dependencies());
        assert!(pkg.tags().is_empty());
    }

    #[test]
    fn test_wrong_field_type_is_error() {
        assert!(PackageJson::parse(r#"{"dependencies": ["react"]}"#).is_err());
        assert!(PackageJson::parse("not json").is_err());
    }
}
