//! Implementation of `sandcastle create`.
//!
//! Assembles a sandbox descriptor from a source tree: template detection,
//! entry lookup, HTML extraction, denormalization and dependency resolution,
//! in that order. Nothing is returned unless every step succeeds.

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::core::descriptor::{Denormalize, FlatDenormalizer, SandboxDescriptor};
use crate::core::manifest::{PackageJson, MANIFEST_NAME};
use crate::core::template::{classify, Template};
use crate::core::tree::{normalize_path, SourceTree};
use crate::html;
use crate::resolver::{self, ExclusionPolicy, ResolveError};
use crate::sources::VersionSource;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Where an HTML entry is looked for, in order.
pub const HTML_ENTRY_CANDIDATES: &[&str] = &["index.html", "public/index.html"];

/// Error while assembling a sandbox.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum SandboxError {
    #[error("no `package.json` found at the root of the source tree")]
    #[diagnostic(
        code(sandcastle::manifest::missing),
        help("Add a package.json at the root of the project")
    )]
    ManifestMissing,

    #[error("failed to parse `package.json`: {source}")]
    #[diagnostic(
        code(sandcastle::manifest::parse),
        help("Check package.json for trailing commas or comments")
    )]
    ManifestParse {
        source: serde_json::Error,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid here")]
        span: SourceSpan,
    },

    #[error("{}", entry_not_found(.main.as_deref(), .default))]
    #[diagnostic(code(sandcastle::entry::not_found))]
    EntryNotFound {
        /// Declared `main`, normalized
        main: Option<String>,
        /// Default entry for the detected template
        default: &'static str,
    },

    #[error("dependency resolution failed: {0}")]
    #[diagnostic(code(sandcastle::resolve::failed))]
    DependencyResolutionFailed(#[from] ResolveError),
}

fn entry_not_found(main: Option<&str>, default: &str) -> String {
    match main {
        Some(main) if main != default => format!(
            "entry file not found: neither `{}` (from `main`) nor `{}` exists",
            main, default
        ),
        _ => format!("entry file `{}` not found", default),
    }
}

impl SandboxError {
    fn manifest_parse(content: &str, source: serde_json::Error) -> Self {
        let offset = byte_offset(content, source.line(), source.column());
        SandboxError::ManifestParse {
            source,
            src: NamedSource::new(MANIFEST_NAME, content.to_string()),
            span: (offset, 0).into(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SandboxError::ManifestMissing => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::NO_MANIFEST)
            }

            SandboxError::ManifestParse { source, .. } => Diagnostic::error(self.to_string())
                .with_location(MANIFEST_NAME)
                .with_context(format!(
                    "at line {}, column {}",
                    source.line(),
                    source.column()
                ))
                .with_suggestion(suggestions::BAD_MANIFEST),

            SandboxError::EntryNotFound { main, default } => {
                let mut diag = Diagnostic::error(self.to_string()).with_location(MANIFEST_NAME);
                if main.is_none() {
                    diag = diag.with_context("package.json declares no `main`");
                }
                diag.with_suggestion(suggestions::NO_ENTRY)
                    .with_suggestion(format!("Create `{}`", default))
            }

            SandboxError::DependencyResolutionFailed(err) => err.to_diagnostic(),
        }
    }
}

/// Convert serde_json's 1-based line/column into a byte offset.
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(content.len())
}

/// Collaborators for [`create_sandbox`].
pub struct CreateOptions<'a> {
    /// Dependencies to drop or rewrite
    pub policy: ExclusionPolicy,
    /// Where concrete versions come from
    pub source: &'a dyn VersionSource,
    /// How the tree is flattened into records
    pub denormalizer: &'a dyn Denormalize,
}

impl<'a> CreateOptions<'a> {
    /// Options with the default policy and the flat denormalizer.
    pub fn new(source: &'a dyn VersionSource) -> Self {
        CreateOptions {
            policy: ExclusionPolicy::new(),
            source,
            denormalizer: &FlatDenormalizer,
        }
    }

    pub fn with_policy(mut self, policy: ExclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_denormalizer(mut self, denormalizer: &'a dyn Denormalize) -> Self {
        self.denormalizer = denormalizer;
        self
    }
}

/// Template and entry detected for a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub manifest: PackageJson,
    pub template: Template,
    pub entry: String,
}

/// Parse the manifest, classify the tree and locate its entry file.
pub fn detect(tree: &SourceTree) -> Result<Detection, SandboxError> {
    let manifest = tree
        .get(MANIFEST_NAME)
        .ok_or(SandboxError::ManifestMissing)?;
    let pkg = PackageJson::parse(&manifest.content)
        .map_err(|e| SandboxError::manifest_parse(&manifest.content, e))?;

    let template = classify(&pkg, tree);
    let entry = find_entry(&pkg, template, tree)?;

    Ok(Detection {
        manifest: pkg,
        template,
        entry,
    })
}

fn find_entry(pkg: &PackageJson, template: Template, tree: &SourceTree) -> Result<String, SandboxError> {
    let main = pkg.main.as_deref().map(normalize_path);
    let default = template.default_entry_file();

    let found = main
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(default))
        .find(|candidate| tree.contains(candidate))
        .map(str::to_string);

    match found {
        Some(entry) => Ok(entry),
        None => Err(SandboxError::EntryNotFound { main, default }),
    }
}

/// Build a sandbox descriptor from a source tree.
///
/// The input tree is left untouched; the HTML entry's content is replaced
/// with its body fragment on a private copy.
pub fn create_sandbox(
    tree: &SourceTree,
    options: &CreateOptions<'_>,
) -> Result<SandboxDescriptor, SandboxError> {
    let Detection {
        manifest,
        template,
        entry,
    } = detect(tree)?;

    let mut tree = tree.clone();
    let mut external_resources = Vec::new();

    if let Some(path) = HTML_ENTRY_CANDIDATES.iter().find(|p| tree.contains(p)) {
        if let Some(module) = tree.get_mut(path).filter(|m| !m.is_binary) {
            let info = html::extract(Some(&module.content));
            tracing::debug!(
                "{}: {} external resources",
                path,
                info.external_resources.len()
            );
            if let Some(body) = info.body {
                module.content = body;
            }
            external_resources = info.external_resources;
        }
    }

    let denormalized = options.denormalizer.denormalize(&tree);
    let dependencies = resolver::resolve(
        &manifest,
        &denormalized.modules,
        &options.policy,
        options.source,
    )?;

    tracing::info!("Creating sandbox with template {}", template);

    Ok(SandboxDescriptor {
        title: manifest.display_title().map(str::to_string),
        description: manifest.description.clone(),
        tags: manifest.tags().to_vec(),
        modules: denormalized.modules,
        directories: denormalized.directories,
        dependencies,
        external_resources,
        template,
        entry,
    })
}
