//! `sandcastle detect` command

use anyhow::Result;

use crate::cli::DetectArgs;
use crate::commands::load_project;
use sandcastle::ops::detect;
use sandcastle::util::Shell;

pub fn execute(args: DetectArgs, shell: &Shell) -> Result<()> {
    let (_, tree) = load_project(&args.path, shell)?;
    let detection = detect(&tree)?;

    println!("template: {}", detection.template);
    println!("entry: {}", detection.entry);
    if let Some(title) = detection.manifest.display_title() {
        println!("title: {}", title);
    }

    Ok(())
}
