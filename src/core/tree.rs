//! In-memory source tree.
//!
//! A source tree maps normalized relative paths to module entries. Paths use
//! `/` separators and never start with `./` or `/`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single file in a source tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Raw text content (empty for binary files)
    pub content: String,

    /// Whether the content could not be read as text
    #[serde(default)]
    pub is_binary: bool,
}

impl Module {
    /// Create a text module.
    pub fn new(content: impl Into<String>) -> Self {
        Module {
            content: content.into(),
            is_binary: false,
        }
    }

    /// Create a binary module with no text content.
    pub fn binary() -> Self {
        Module {
            content: String::new(),
            is_binary: true,
        }
    }
}

/// A path-keyed source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTree {
    modules: BTreeMap<String, Module>,
}

impl SourceTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        SourceTree {
            modules: BTreeMap::new(),
        }
    }

    /// Insert a module, normalizing its path.
    pub fn insert(&mut self, path: impl AsRef<str>, module: Module) {
        self.modules.insert(normalize_path(path.as_ref()), module);
    }

    /// Builder-style insert of a text file.
    pub fn with_file(mut self, path: impl AsRef<str>, content: impl Into<String>) -> Self {
        self.insert(path, Module::new(content));
        self
    }

    /// Look up a module by path.
    pub fn get(&self, path: &str) -> Option<&Module> {
        self.modules.get(&normalize_path(path))
    }

    /// Look up a module mutably by path.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut Module> {
        self.modules.get_mut(&normalize_path(path))
    }

    /// Check whether a path exists in the tree.
    pub fn contains(&self, path: &str) -> bool {
        self.modules.contains_key(&normalize_path(path))
    }

    /// Iterate over all modules in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Module)> {
        self.modules.iter().map(|(p, m)| (p.as_str(), m))
    }

    /// Iterate over all paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<P: AsRef<str>> FromIterator<(P, Module)> for SourceTree {
    fn from_iter<I: IntoIterator<Item = (P, Module)>>(iter: I) -> Self {
        let mut tree = SourceTree::new();
        for (path, module) in iter {
            tree.insert(path, module);
        }
        tree
    }
}

/// Normalize a tree path: `\` becomes `/`, leading `./` and `/` are stripped.
pub fn normalize_path(path: &str) -> String {
    let mut path = path.replace('\\', "/");
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest.to_string();
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest.to_string();
        } else {
            break;
        }
    }
    path
}
