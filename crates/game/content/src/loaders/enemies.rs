//! Enemy template and player loadout loaders.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};
use crate::spawn::SpawnRules;
use crate::templates::{EnemyTemplate, PlayerTemplate};

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    /// Rarity table; the built-in tiers when omitted.
    #[serde(default)]
    pub spawn: SpawnRules,
    pub enemies: Vec<EnemyTemplate>,
}

/// Loader for enemy templates from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<EnemyCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EnemyCatalog> {
        let catalog: EnemyCatalog = parse_ron(content, "enemy catalog")?;

        for (index, template) in catalog.enemies.iter().enumerate() {
            if catalog.enemies[..index].iter().any(|other| other.id == template.id) {
                anyhow::bail!("duplicate enemy template '{}'", template.id);
            }
            if template.stats.hp <= 0 {
                anyhow::bail!("enemy template '{}' has no hit points", template.id);
            }
            if let Some(entry) = template
                .loot
                .iter()
                .find(|entry| !(0.0..=1.0).contains(&entry.chance))
            {
                anyhow::bail!(
                    "enemy template '{}' drops '{}' with chance {} outside [0, 1]",
                    template.id,
                    entry.item,
                    entry.chance
                );
            }
        }
        Ok(catalog)
    }
}

/// Loader for the player's starting loadout.
pub struct PlayerLoader;

impl PlayerLoader {
    pub fn load(path: &Path) -> LoadResult<PlayerTemplate> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<PlayerTemplate> {
        let template: PlayerTemplate = parse_ron(content, "player template")?;
        if template.stats.hp <= 0 {
            anyhow::bail!("player '{}' has no hit points", template.name);
        }
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Affinity, Behavior, Rarity};

    #[test]
    fn parses_templates_and_default_rules() {
        let catalog = EnemyLoader::parse(
            r#"(enemies: [
                (
                    id: "bat",
                    stats: (hp: 8, damage: 2, defence: 0),
                    behavior: ranged,
                    rarity: Some(elite),
                    loot: [(item: "wing", chance: 0.5)],
                    affinities: {"stun": immune},
                ),
            ])"#,
        )
        .unwrap();

        assert_eq!(catalog.spawn, SpawnRules::default());
        let bat = &catalog.enemies[0];
        assert_eq!(bat.display_name(), "bat");
        assert_eq!(bat.behavior, Behavior::Ranged);
        assert_eq!(bat.rarity, Some(Rarity::Elite));
        assert_eq!(bat.affinities["stun"], Affinity::Immune);
        assert_eq!(bat.speed, None);
    }

    #[test]
    fn rejects_bad_loot_chance() {
        let err = EnemyLoader::parse(
            r#"(enemies: [(id: "rat", stats: (hp: 3, damage: 1, defence: 0), loot: [(item: "tail", chance: 1.5)])])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("tail"));
    }

    #[test]
    fn parses_player_loadout() {
        let player = PlayerLoader::parse(
            r#"(name: "Ada", stats: (hp: 30, damage: 5, defence: 1), inventory: [("potion", 3)])"#,
        )
        .unwrap();
        assert_eq!(player.inventory, vec![("potion".to_string(), 3)]);
        assert!(player.equipment.is_empty());
    }
}
