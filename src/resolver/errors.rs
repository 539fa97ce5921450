//! Resolution error types and diagnostics.

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error during dependency version resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("could not resolve {}", failure_names(.failures))]
    Unresolvable {
        failures: Vec<(String, String)>, // (package, reason)
    },

    #[error("version source returned no version for {}", quoted(.missing))]
    Incomplete { missing: Vec<String> },
}

fn failure_names(failures: &[(String, String)]) -> String {
    let names: Vec<String> = failures.iter().map(|(n, _)| n.clone()).collect();
    quoted(&names)
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("`{}`", n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ResolveError {
    /// Names of every package that failed.
    pub fn names(&self) -> Vec<&str> {
        match self {
            ResolveError::Unresolvable { failures } => {
                failures.iter().map(|(n, _)| n.as_str()).collect()
            }
            ResolveError::Incomplete { missing } => missing.iter().map(String::as_str).collect(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::Unresolvable { failures } => {
                let mut diag = Diagnostic::error(self.to_string());
                for (name, reason) in failures {
                    diag = diag.with_context(format!("`{}`: {}", name, reason));
                }
                diag.with_suggestion("Check the version specifiers in package.json")
                    .with_suggestion(suggestions::FETCH_FAILED)
            }

            ResolveError::Incomplete { missing } => {
                Diagnostic::error(self.to_string())
                    .with_context(format!("missing: {}", missing.join(", ")))
                    .with_suggestion("Check that the registry mirrors every requested package")
            }
        }
    }
}
