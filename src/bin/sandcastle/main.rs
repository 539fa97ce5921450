//! Sandcastle CLI - turns a project directory into a sandbox descriptor

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sandcastle::util::diagnostic::emit;
use sandcastle::util::Shell;
use sandcastle::SandboxError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    // Parse CLI
    let cli = Cli::parse();
    let shell = Shell::from_flags(cli.verbose, cli.no_color);

    if let Err(e) = run(cli, &shell) {
        match e.downcast_ref::<SandboxError>() {
            Some(err) => emit(&err.to_diagnostic(), shell.use_color()),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, shell: &Shell) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("sandcastle=debug")
    } else {
        EnvFilter::new("sandcastle=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(shell.use_color())
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Create(args) => commands::create::execute(args, shell),
        Commands::Detect(args) => commands::detect::execute(args, shell),
        Commands::Scan(args) => commands::scan::execute(args, shell),
        Commands::Html(args) => commands::html::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
