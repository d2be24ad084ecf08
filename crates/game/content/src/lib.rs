//! Combat content: templates, spawning and data loaders.
//!
//! This crate turns static data into the registries and actors
//! `combat-core` consumes:
//! - Status, skill and item catalogs (RON)
//! - Enemy templates and the player's starting loadout (RON)
//! - Combat balance configuration (TOML)
//!
//! Default content is embedded at compile time; [`loaders::ContentFactory`]
//! reads the same layout from a directory.

pub mod spawn;
pub mod templates;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use spawn::{EnemyFactory, RarityTier, SpawnRules};
pub use templates::{EnemyTemplate, PlayerTemplate, SpawnError};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EnemyLoader, GameContent, ItemLoader, LoadResult, PlayerLoader,
    SkillLoader, StatusLoader, embedded,
};
