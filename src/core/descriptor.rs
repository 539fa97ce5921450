//! Sandbox descriptor and tree denormalization.
//!
//! The descriptor is the sole output of the assembly pipeline. Files and
//! directories are flat records pointing at their parent directory by
//! shortid, so the structure has no owning cycles and serializes directly.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::template::Template;
use crate::core::tree::SourceTree;

/// Length of generated shortids in hex characters.
const SHORTID_LEN: usize = 10;

/// A denormalized file record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxFile {
    pub shortid: String,
    /// File name without directories
    pub title: String,
    /// Shortid of the containing directory (None at the root)
    pub directory_shortid: Option<String>,
    pub code: String,
    pub is_binary: bool,
}

/// A denormalized directory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxDirectory {
    pub shortid: String,
    pub title: String,
    pub directory_shortid: Option<String>,
}

/// Output of a [`Denormalize`] implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DenormalizedTree {
    pub modules: Vec<SandboxFile>,
    pub directories: Vec<SandboxDirectory>,
}

/// Converts a path-keyed tree into flat, parent-referencing records.
pub trait Denormalize {
    fn denormalize(&self, tree: &SourceTree) -> DenormalizedTree;
}

/// Default denormalizer with content-independent, path-derived shortids.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatDenormalizer;

impl Denormalize for FlatDenormalizer {
    fn denormalize(&self, tree: &SourceTree) -> DenormalizedTree {
        // Every ancestor directory of every file, each exactly once.
        let mut dir_paths = BTreeSet::new();
        for path in tree.paths() {
            let mut current = path;
            while let Some((parent, _)) = current.rsplit_once('/') {
                dir_paths.insert(parent.to_string());
                current = parent;
            }
        }

        // Sorting by depth first keeps parents ahead of their children.
        let mut dir_paths: Vec<_> = dir_paths.into_iter().collect();
        dir_paths.sort_by(|a, b| depth(a).cmp(&depth(b)).then_with(|| a.cmp(b)));

        let directories = dir_paths
            .iter()
            .map(|path| {
                let (parent, title) = split_parent(path);
                SandboxDirectory {
                    shortid: shortid("dir", path),
                    title: title.to_string(),
                    directory_shortid: parent.map(|p| shortid("dir", p)),
                }
            })
            .collect();

        let modules = tree
            .iter()
            .map(|(path, module)| {
                let (parent, title) = split_parent(path);
                SandboxFile {
                    shortid: shortid("file", path),
                    title: title.to_string(),
                    directory_shortid: parent.map(|p| shortid("dir", p)),
                    code: module.content.clone(),
                    is_binary: module.is_binary,
                }
            })
            .collect();

        DenormalizedTree {
            modules,
            directories,
        }
    }
}

fn depth(path: &str) -> usize {
    path.matches('/').count()
}

fn split_parent(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('/') {
        Some((parent, name)) => (Some(parent), name),
        None => (None, path),
    }
}

/// Deterministic shortid for a tree entry.
pub fn shortid(kind: &str, path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(b":");
    hasher.update(path.as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(SHORTID_LEN);
    id
}

/// The assembled sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxDescriptor {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub modules: Vec<SandboxFile>,
    pub directories: Vec<SandboxDirectory>,
    /// Resolved dependency name → concrete version
    pub dependencies: BTreeMap<String, String>,
    pub external_resources: Vec<String>,
    pub template: Template,
    pub entry: String,
}

impl SandboxDescriptor {
    /// Find a file record by its full tree path.
    pub fn module(&self, path: &str) -> Option<&SandboxFile> {
        let id = shortid("file", path);
        self.modules.iter().find(|m| m.shortid == id)
    }
}
