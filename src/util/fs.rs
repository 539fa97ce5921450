//! Filesystem utilities.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::core::tree::{Module, SourceTree};

/// Directories never loaded into a source tree.
pub const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", ".sandcastle"];

/// Load a directory into a source tree.
///
/// Paths are relative to `root` and `/`-separated. Files that are not valid
/// UTF-8 are kept as binary modules with empty content. `ignore` holds glob
/// patterns matched against those relative paths.
pub fn load_tree(root: &Path, ignore: &[String]) -> Result<SourceTree> {
    let patterns = ignore
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("invalid ignore pattern: {}", p)))
        .collect::<Result<Vec<_>>>()?;

    if !root.is_dir() {
        anyhow::bail!("not a directory: {}", root.display());
    }

    let mut tree = SourceTree::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));

    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
            Err(_) => continue,
        };

        if patterns.iter().any(|p| p.matches(&relative)) {
            tracing::debug!("ignoring {}", relative);
            continue;
        }

        let bytes = fs::read(entry.path())
            .with_context(|| format!("failed to read file: {}", entry.path().display()))?;
        let module = match String::from_utf8(bytes) {
            Ok(content) => Module::new(content),
            Err(_) => Module::binary(),
        };
        tree.insert(&relative, module);
    }

    Ok(tree)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_load_tree() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "package.json", b"{}");
        write(tmp.path(), "src/index.js", b"import 'react'");
        write(tmp.path(), "node_modules/react/index.js", b"x");
        write(tmp.path(), ".git/HEAD", b"ref");

        let tree = load_tree(tmp.path(), &[]).unwrap();
        let paths: Vec<_> = tree.paths().collect();
        assert_eq!(paths, vec!["package.json", "src/index.js"]);
        assert_eq!(tree.get("src/index.js").unwrap().content, "import 'react'");
    }

    #[test]
    fn test_round_trips_a_fixture() {
        let tmp = TempDir::new().unwrap();
        let fixture = crate::test_support::TreeFixture::react_app();
        fixture.write_to(tmp.path()).unwrap();

        let tree = load_tree(tmp.path(), &[]).unwrap();
        assert_eq!(tree, fixture.build());
    }

    #[test]
    fn test_binary_files() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "logo.png", &[0x89, 0x50, 0xff, 0xfe]);

        let tree = load_tree(tmp.path(), &[]).unwrap();
        let module = tree.get("logo.png").unwrap();
        assert!(module.is_binary);
        assert!(module.content.is_empty());
    }

    #[test]
    fn test_ignore_patterns() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "index.js", b"");
        write(tmp.path(), "dist/bundle.js", b"");
        write(tmp.path(), "notes.md", b"");

        let ignore = vec!["dist/**".to_string(), "*.md".to_string()];
        let tree = load_tree(tmp.path(), &ignore).unwrap();
        assert_eq!(tree.paths().collect::<Vec<_>>(), vec!["index.js"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let tmp = TempDir::new().unwrap();
        assert!(load_tree(tmp.path(), &["[".to_string()]).is_err());
    }

    #[test]
    fn test_missing_root() {
        let tmp = TempDir::new().unwrap();
        assert!(load_tree(&tmp.path().join("nope"), &[]).is_err());
    }

    #[test]
    fn test_write_string_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out/sandbox.json");
        write_string(&path, "{}").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "{}");
    }
}
