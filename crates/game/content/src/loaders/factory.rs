//! Content factory for building registries from data files.

use std::path::{Path, PathBuf};

use combat_core::{Actor, CombatConfig, Env, ItemOracle, Registries, StatusOracle};

use crate::loaders::{
    ConfigLoader, EnemyLoader, ItemLoader, LoadResult, PlayerLoader, SkillLoader, StatusLoader,
};
use crate::spawn::EnemyFactory;
use crate::templates::{PlayerTemplate, SpawnError};

/// Everything an encounter needs, loaded and cross-checked.
#[derive(Clone, Debug)]
pub struct GameContent {
    pub config: CombatConfig,
    pub registries: Registries,
    pub enemies: EnemyFactory,
    pub player: PlayerTemplate,
}

impl GameContent {
    pub fn env(&self) -> Env<'_> {
        self.registries.env(&self.config)
    }

    /// Builds the player from its starting loadout.
    pub fn spawn_player(&self) -> Result<Actor, SpawnError> {
        self.player.build(&self.registries.items)
    }

    /// Cross-checks every id reference between the catalogs.
    pub fn validate(&self) -> LoadResult<()> {
        self.registries.validate()?;

        if self.registries.statuses.rule(&self.config.defend_status).is_none() {
            anyhow::bail!(
                "config defend_status '{}' is not a known status",
                self.config.defend_status
            );
        }

        for template in self.enemies.templates() {
            self.registries
                .validate_skills(&template.id, &template.skills)?;
            for entry in &template.loot {
                if self.registries.items.item(&entry.item).is_none() {
                    anyhow::bail!(
                        "enemy template '{}' drops unknown item '{}'",
                        template.id,
                        entry.item
                    );
                }
            }
        }

        self.registries
            .validate_skills(&self.player.name, &self.player.skills)?;
        self.spawn_player()?;
        Ok(())
    }
}

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── statuses.ron
/// ├── skills.ron
/// ├── items.ron
/// ├── enemies.ron
/// └── player.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the status, skill and item catalogs.
    pub fn load_registries(&self) -> LoadResult<Registries> {
        let statuses = StatusLoader::load(&self.data_dir.join("statuses.ron"))?;
        let skills = SkillLoader::load(&self.data_dir.join("skills.ron"))?;
        let items = ItemLoader::load(&self.data_dir.join("items.ron"))?;
        Ok(Registries::new(statuses, skills, items))
    }

    /// Load enemy templates from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<EnemyFactory> {
        let catalog = EnemyLoader::load(&self.data_dir.join("enemies.ron"))?;
        Ok(EnemyFactory::new(catalog.enemies, catalog.spawn))
    }

    /// Load the starting loadout from `player.ron`.
    pub fn load_player(&self) -> LoadResult<PlayerTemplate> {
        PlayerLoader::load(&self.data_dir.join("player.ron"))
    }

    /// Loads and validates the whole directory.
    pub fn load_all(&self) -> LoadResult<GameContent> {
        let content = GameContent {
            config: self.load_config()?,
            registries: self.load_registries()?,
            enemies: self.load_enemies()?,
            player: self.load_player()?,
        };
        content.validate()?;

        tracing::info!(
            target: "combat::content",
            dir = %self.data_dir.display(),
            statuses = content.registries.statuses.len(),
            skills = content.registries.skills.len(),
            items = content.registries.items.len(),
            "loaded content"
        );
        Ok(content)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::embedded;

    fn write_defaults(dir: &Path) {
        for (name, content) in embedded::FILES {
            std::fs::write(dir.join(name), content).unwrap();
        }
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path());

        let content = ContentFactory::new(dir.path()).load_all().unwrap();
        let defaults = embedded::load().unwrap();
        assert_eq!(content.config, defaults.config);
        assert_eq!(content.registries.skills, defaults.registries.skills);
        assert_eq!(content.player, defaults.player);
        let player = content.spawn_player().unwrap();
        assert!(player.inventory.count("healing_potion") > 0);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentFactory::new(dir.path()).load_config().unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn dangling_skill_reference_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path());
        std::fs::write(
            dir.path().join("enemies.ron"),
            r#"(enemies: [(id: "imp", stats: (hp: 5, damage: 1, defence: 0), skills: ["hexbolt"])])"#,
        )
        .unwrap();

        let err = ContentFactory::new(dir.path()).load_all().unwrap_err();
        assert!(err.to_string().contains("hexbolt"));
    }

    #[test]
    fn unknown_loot_item_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path());
        std::fs::write(
            dir.path().join("enemies.ron"),
            r#"(enemies: [(id: "imp", stats: (hp: 5, damage: 1, defence: 0), loot: [(item: "halo", chance: 0.5)])])"#,
        )
        .unwrap();

        let err = ContentFactory::new(dir.path()).load_all().unwrap_err();
        assert!(err.to_string().contains("halo"));
    }
}
