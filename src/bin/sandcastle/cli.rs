//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Sandcastle - turns a project directory into a sandbox descriptor
#[derive(Parser)]
#[command(name = "sandcastle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a sandbox descriptor for a project directory
    Create(CreateArgs),

    /// Show the detected template and entry file
    Detect(DetectArgs),

    /// List the module specifiers referenced by the project's code
    Scan(ScanArgs),

    /// Extract the body and external resources of an HTML file
    Html(HtmlArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    /// Project directory (defaults to the current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Resolve versions without contacting the registry
    #[arg(long)]
    pub offline: bool,

    /// Write the descriptor to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the descriptor JSON
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct DetectArgs {
    /// Project directory (defaults to the current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Project directory (defaults to the current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Args)]
pub struct HtmlArgs {
    /// HTML file to extract
    pub file: PathBuf,

    /// Pretty-print the result JSON
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
