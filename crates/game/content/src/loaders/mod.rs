//! Content loaders for reading combat data from files.
//!
//! Registries are RON, balance config is TOML. Every loader has a `parse`
//! entry point for in-memory text (used by [`embedded`]) and a `load` entry
//! point that reads a file first.

pub mod config;
pub mod embedded;
pub mod enemies;
pub mod factory;
pub mod items;
pub mod skills;
pub mod statuses;

pub use config::ConfigLoader;
pub use enemies::{EnemyCatalog, EnemyLoader, PlayerLoader};
pub use factory::{ContentFactory, GameContent};
pub use items::{ItemCatalog, ItemLoader};
pub use skills::{SkillCatalog, SkillLoader};
pub use statuses::{StatusCatalog, StatusLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parses RON text, naming the catalog in the error.
pub(crate) fn parse_ron<T: serde::de::DeserializeOwned>(content: &str, what: &str) -> LoadResult<T> {
    ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))
}
