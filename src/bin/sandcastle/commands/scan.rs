//! `sandcastle scan` command
//!
//! Prints every external module specifier the project's code references,
//! one per line, marking the ones the manifest declares.

use anyhow::Result;

use crate::cli::ScanArgs;
use crate::commands::load_project;
use sandcastle::core::descriptor::{Denormalize, FlatDenormalizer};
use sandcastle::core::{PackageJson, MANIFEST_NAME};
use sandcastle::resolver::usage::{references_dependency, scan};
use sandcastle::util::Shell;

pub fn execute(args: ScanArgs, shell: &Shell) -> Result<()> {
    let (_, tree) = load_project(&args.path, shell)?;

    // The manifest is optional here; without one nothing is marked.
    let pkg = match tree.get(MANIFEST_NAME) {
        Some(module) => PackageJson::parse(&module.content).unwrap_or_else(|e| {
            shell.warn(format!("ignoring unparsable package.json: {}", e));
            PackageJson::default()
        }),
        None => PackageJson::default(),
    };

    let declared: Vec<String> = pkg
        .runtime_dependencies()
        .into_keys()
        .chain(pkg.dev_dependencies().into_keys())
        .collect();

    let files = FlatDenormalizer.denormalize(&tree).modules;
    for reference in scan(&files) {
        let marker = if declared.iter().any(|name| references_dependency(&reference, name)) {
            ""
        } else {
            " (undeclared)"
        };
        println!("{}{}", reference, marker);
    }

    Ok(())
}
