//! Command implementations

pub mod completions;
pub mod create;
pub mod detect;
pub mod html;
pub mod scan;

use std::path::Path;

use anyhow::Result;
use sandcastle::core::SourceTree;
use sandcastle::util::config::{global_config_path, load_config, project_config_path};
use sandcastle::util::fs::load_tree;
use sandcastle::util::{Config, Shell, Status};

/// Load merged configuration and the source tree for a project directory.
pub fn load_project(path: &Path, shell: &Shell) -> Result<(Config, SourceTree)> {
    let config = load_config(global_config_path().as_deref(), &project_config_path(path));

    if shell.is_verbose() {
        shell.status(Status::Loading, path.display());
    }
    let tree = load_tree(path, &config.tree.ignore)?;
    tracing::debug!("loaded {} files from {}", tree.len(), path.display());

    Ok((config, tree))
}

/// Serialize a value as compact or pretty JSON.
pub fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
