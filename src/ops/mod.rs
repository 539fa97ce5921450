//! High-level operations.
//!
//! This module contains the implementation of Sandcastle commands.

pub mod create_sandbox;

pub use create_sandbox::{
    create_sandbox, detect, CreateOptions, Detection, SandboxError, HTML_ENTRY_CANDIDATES,
};
