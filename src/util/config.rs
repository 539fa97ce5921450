//! Configuration file support for Sandcastle.
//!
//! Sandcastle supports two configuration file locations:
//! - Global: `~/.sandcastle/config.toml` - User-wide defaults
//! - Project: `.sandcastle/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::resolver::ExclusionPolicy;
use crate::sources::registry::{DEFAULT_REGISTRY_URL, DEFAULT_TIMEOUT};

/// Sandcastle configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry settings
    pub registry: RegistryConfig,

    /// Network settings
    pub net: NetConfig,

    /// Source tree loading
    pub tree: TreeConfig,

    /// Dependency filtering
    pub dependencies: DependencyConfig,
}

/// Registry-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry base URL (defaults to the public npm registry)
    pub url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Network-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Offline mode (don't contact the registry)
    #[serde(default)]
    pub offline: bool,
}

/// Source tree loading configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Glob patterns (relative to the project root) to leave out of the tree
    pub ignore: Vec<String>,
}

/// Dependency filtering configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Extra dependency names to exclude from every sandbox
    pub exclude: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Parse configuration content.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.registry.url.is_some() {
            self.registry.url = other.registry.url;
        }
        if other.registry.timeout_secs.is_some() {
            self.registry.timeout_secs = other.registry.timeout_secs;
        }

        if other.net.offline {
            self.net.offline = true;
        }

        // List settings accumulate across layers.
        self.tree.ignore.extend(other.tree.ignore);
        self.dependencies.exclude.extend(other.dependencies.exclude);
    }

    /// Registry URL, validated.
    pub fn registry_url(&self) -> Result<Url> {
        let raw = self.registry.url.as_deref().unwrap_or(DEFAULT_REGISTRY_URL);
        Url::parse(raw).with_context(|| format!("invalid registry URL: {}", raw))
    }

    /// Per-request registry timeout.
    pub fn registry_timeout(&self) -> Duration {
        self.registry
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Exclusion policy with configured extras.
    pub fn exclusion_policy(&self) -> ExclusionPolicy {
        ExclusionPolicy::new().with_excluded(self.dependencies.exclude.iter().cloned())
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.sandcastle/config.toml)
/// 2. Global config (~/.sandcastle/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global sandcastle config directory (~/.sandcastle).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".sandcastle"))
}

/// Get the global config path (~/.sandcastle/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.sandcastle/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".sandcastle").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let config = Config::parse(
            r#"
[registry]
url = "https://registry.example.com"
timeout_secs = 3

[net]
offline = true

[tree]
ignore = ["dist/**"]

[dependencies]
exclude = ["eslint"]
"#,
        )
        .unwrap();

        assert_eq!(config.registry_url().unwrap().as_str(), "https://registry.example.com/");
        assert_eq!(config.registry_timeout(), Duration::from_secs(3));
        assert!(config.net.offline);
        assert_eq!(config.tree.ignore, vec!["dist/**"]);
        assert_eq!(
            config.exclusion_policy().action("eslint"),
            crate::resolver::exclusions::Action::Remove
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.registry_url().unwrap().as_str(), "https://registry.npmjs.org/");
        assert_eq!(config.registry_timeout(), DEFAULT_TIMEOUT);
        assert!(!config.net.offline);
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");

        std::fs::write(
            &global,
            "[registry]\nurl = \"https://global.example.com\"\ntimeout_secs = 30\n[tree]\nignore = [\"a\"]\n",
        )
        .unwrap();
        std::fs::write(
            &project,
            "[registry]\nurl = \"https://project.example.com\"\n[tree]\nignore = [\"b\"]\n",
        )
        .unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.registry.url.as_deref(), Some("https://project.example.com"));
        assert_eq!(config.registry.timeout_secs, Some(30));
        assert_eq!(config.tree.ignore, vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[registry\nurl = ").unwrap();

        let config = Config::load_or_default(&path);
        assert!(config.registry.url.is_none());
    }

    #[test]
    fn test_invalid_registry_url() {
        let config = Config::parse("[registry]\nurl = \"not a url\"\n").unwrap();
        assert!(config.registry_url().is_err());
    }
}
