//! Actor templates: static descriptions that become live [`Actor`]s.

use std::collections::BTreeMap;

use combat_core::env::ItemOracle;
use combat_core::state::LootEntry;
use combat_core::{Actor, Affinity, BaseStats, Behavior, EnemyProfile, Rarity};

/// Errors raised while turning templates into actors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("unknown enemy template '{0}'")]
    UnknownTemplate(String),

    #[error("template '{template}' references unknown item '{item}'")]
    UnknownItem { template: String, item: String },

    #[error("template '{template}' cannot equip '{item}'")]
    NotEquippable { template: String, item: String },
}

/// Static description of one enemy kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub behavior: Behavior,
    /// Fixed tier. When absent the tier is rolled at spawn time.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rarity: Option<Rarity>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub xp_reward: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gold_reward: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot: Vec<LootEntry>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub affinities: BTreeMap<String, Affinity>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub speed: Option<i32>,
}

impl EnemyTemplate {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Starting loadout of the player character.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerTemplate {
    pub name: String,
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<String>,
    /// Item ids equipped at start.
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Vec<String>,
    /// `(item id, count)` pairs.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Vec<(String, u32)>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub affinities: BTreeMap<String, Affinity>,
}

impl PlayerTemplate {
    /// Builds the player at full health, resolving item ids through `items`.
    pub fn build(&self, items: &dyn ItemOracle) -> Result<Actor, SpawnError> {
        let mut player = Actor::player(self.name.clone(), self.stats)
            .with_resource(self.resource)
            .with_skills(self.skills.iter().cloned());
        player.affinities = self.affinities.clone();

        let lookup = |id: &str| {
            items.item(id).cloned().ok_or_else(|| SpawnError::UnknownItem {
                template: self.name.clone(),
                item: id.to_string(),
            })
        };

        for id in &self.equipment {
            let item = lookup(id)?;
            player
                .equipment
                .equip(item)
                .map_err(|_| SpawnError::NotEquippable {
                    template: self.name.clone(),
                    item: id.clone(),
                })?;
        }
        for (id, count) in &self.inventory {
            player.inventory.add(lookup(id)?, *count);
        }
        player.set_hp(player.max_hp());
        Ok(player)
    }
}

/// Builds an enemy of the given tier from a template. Stats are already
/// scaled by the caller.
pub(crate) fn build_enemy(
    template: &EnemyTemplate,
    name: String,
    stats: BaseStats,
    rarity: Rarity,
    rewards: (u32, u32),
) -> Actor {
    let mut profile = EnemyProfile::new(rarity, template.behavior).with_rewards(rewards.0, rewards.1);
    profile.loot = template.loot.clone();

    let mut enemy = Actor::enemy(name, stats, profile)
        .with_resource(template.resource)
        .with_skills(template.skills.iter().cloned());
    enemy.affinities = template.affinities.clone();
    enemy.speed = template.speed;
    enemy
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{ItemDefinition, ItemSlot, ItemTable, Stat};

    fn items() -> ItemTable {
        ItemTable::from_items([
            ItemDefinition::new("club", ItemSlot::Weapon).with_stat(Stat::Damage, 2),
            ItemDefinition::new("tonic", ItemSlot::Consumable),
        ])
    }

    fn template() -> PlayerTemplate {
        PlayerTemplate {
            name: "Ada".into(),
            stats: BaseStats::new(20, 3, 1),
            resource: 10,
            skills: vec!["jab".into()],
            equipment: vec!["club".into()],
            inventory: vec![("tonic".into(), 2)],
            affinities: BTreeMap::new(),
        }
    }

    #[test]
    fn builds_equipped_player() {
        let player = template().build(&items()).unwrap();
        assert_eq!(player.damage(), 5);
        assert_eq!(player.inventory.count("tonic"), 2);
        assert_eq!(player.resource.current(), 10);
    }

    #[test]
    fn unknown_and_unequippable_items_fail() {
        let mut missing = template();
        missing.inventory.push(("elixir".into(), 1));
        assert_eq!(
            missing.build(&items()).unwrap_err(),
            SpawnError::UnknownItem {
                template: "Ada".into(),
                item: "elixir".into()
            }
        );

        let mut wrong_slot = template();
        wrong_slot.equipment.push("tonic".into());
        assert!(matches!(
            wrong_slot.build(&items()).unwrap_err(),
            SpawnError::NotEquippable { .. }
        ));
    }
}
