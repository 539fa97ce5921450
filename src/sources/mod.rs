//! Version sources.
//!
//! A source turns declared version specifiers into concrete versions, either
//! by asking an npm-compatible registry or from the specifiers alone.

pub mod offline;
pub mod registry;
pub mod source;

pub use offline::OfflineSource;
pub use registry::RegistrySource;
pub use source::VersionSource;
