//! Content loaders for reading skill data from files.
//!
//! Templates and rule tables are RON; generator tuning is TOML. Every loader
//! can also parse the copies embedded in this crate at build time.

pub mod config;
pub mod factory;
pub mod rules;
pub mod templates;

pub use config::ConfigLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use rules::RulesLoader;
pub use templates::TemplateRegistry;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
