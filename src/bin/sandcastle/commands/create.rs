//! `sandcastle create` command

use anyhow::Result;

use crate::cli::CreateArgs;
use crate::commands::{load_project, to_json};
use sandcastle::ops::{create_sandbox, CreateOptions};
use sandcastle::sources::{OfflineSource, RegistrySource, VersionSource};
use sandcastle::util::fs::write_string;
use sandcastle::util::{Shell, Status};

pub fn execute(args: CreateArgs, shell: &Shell) -> Result<()> {
    let (config, tree) = load_project(&args.path, shell)?;

    let offline = args.offline || config.net.offline;
    let source: Box<dyn VersionSource> = if offline {
        tracing::debug!("offline: pinning each specifier to its lower bound");
        Box::new(OfflineSource)
    } else {
        Box::new(RegistrySource::new(
            config.registry_url()?,
            config.registry_timeout(),
        )?)
    };

    let options = CreateOptions::new(source.as_ref()).with_policy(config.exclusion_policy());

    let spinner = shell.spinner(Status::Resolving, "dependencies");
    let result = create_sandbox(&tree, &options);
    spinner.finish();
    let descriptor = result?;

    let json = to_json(&descriptor, args.pretty)?;
    match args.output {
        Some(ref path) => {
            write_string(path, &json)?;
            shell.status(
                Status::Created,
                format!(
                    "{} sandbox with {} files and {} dependencies at {}",
                    descriptor.template,
                    descriptor.modules.len(),
                    descriptor.dependencies.len(),
                    path.display()
                ),
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
