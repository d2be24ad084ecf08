//! Enemy spawning: rarity rolls and stat scaling.

use std::collections::BTreeMap;

use combat_core::{Actor, BaseStats, Rarity, RngOracle, Room};

use crate::templates::{EnemyTemplate, SpawnError, build_enemy};

/// Spawn weight and scaling for one rarity tier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RarityTier {
    pub rarity: Rarity,
    /// Relative weight when the tier is rolled. Zero never rolls.
    pub spawn_weight: f64,
    /// Multiplies hp, damage and defence.
    pub stat_scale: f64,
    /// Multiplies xp and gold rewards.
    pub reward_scale: f64,
}

/// Rarity table used for templates without a fixed tier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnRules {
    pub tiers: Vec<RarityTier>,
}

impl SpawnRules {
    pub fn tier(&self, rarity: Rarity) -> Option<&RarityTier> {
        self.tiers.iter().find(|tier| tier.rarity == rarity)
    }

    /// Draws a tier by spawn weight. Falls back to common.
    pub fn roll(&self, rng: &mut dyn RngOracle) -> Rarity {
        let weights: Vec<f64> = self.tiers.iter().map(|tier| tier.spawn_weight).collect();
        rng.weighted_index(&weights)
            .map_or(Rarity::Common, |index| self.tiers[index].rarity)
    }

    /// Scales base stats for a tier. Hp never drops below 1.
    pub fn scale_stats(&self, stats: BaseStats, rarity: Rarity) -> BaseStats {
        let scale = self.tier(rarity).map_or(1.0, |tier| tier.stat_scale);
        let apply = |value: i32| (value as f64 * scale).floor() as i32;
        BaseStats::new(apply(stats.hp).max(1), apply(stats.damage), apply(stats.defence))
    }

    pub fn scale_rewards(&self, xp: u32, gold: u32, rarity: Rarity) -> (u32, u32) {
        let scale = self.tier(rarity).map_or(1.0, |tier| tier.reward_scale);
        let apply = |value: u32| (value as f64 * scale).floor() as u32;
        (apply(xp), apply(gold))
    }
}

impl Default for SpawnRules {
    fn default() -> Self {
        let tier = |rarity, spawn_weight, stat_scale, reward_scale| RarityTier {
            rarity,
            spawn_weight,
            stat_scale,
            reward_scale,
        };
        Self {
            tiers: vec![
                tier(Rarity::Common, 60.0, 1.0, 1.0),
                tier(Rarity::Uncommon, 25.0, 1.15, 1.25),
                tier(Rarity::Rare, 10.0, 1.3, 1.5),
                tier(Rarity::Elite, 5.0, 1.5, 2.0),
                tier(Rarity::Boss, 0.0, 2.0, 3.0),
            ],
        }
    }
}

/// Builds enemy actors from templates.
#[derive(Clone, Debug, Default)]
pub struct EnemyFactory {
    templates: BTreeMap<String, EnemyTemplate>,
    rules: SpawnRules,
}

impl EnemyFactory {
    pub fn new(templates: impl IntoIterator<Item = EnemyTemplate>, rules: SpawnRules) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|template| (template.id.clone(), template))
                .collect(),
            rules,
        }
    }

    pub fn template(&self, id: &str) -> Option<&EnemyTemplate> {
        self.templates.get(id)
    }

    pub fn templates(&self) -> impl Iterator<Item = &EnemyTemplate> {
        self.templates.values()
    }

    pub fn rules(&self) -> &SpawnRules {
        &self.rules
    }

    /// Spawns one enemy. Templates without a fixed tier roll one.
    pub fn spawn(&self, id: &str, rng: &mut dyn RngOracle) -> Result<Actor, SpawnError> {
        let template = self
            .template(id)
            .ok_or_else(|| SpawnError::UnknownTemplate(id.to_string()))?;
        let rarity = template.rarity.unwrap_or_else(|| self.rules.roll(rng));

        let name = match rarity {
            Rarity::Common => template.display_name().to_string(),
            other => format!("{} {}", <&'static str>::from(other), template.display_name()),
        };
        let stats = self.rules.scale_stats(template.stats, rarity);
        let rewards = self
            .rules
            .scale_rewards(template.xp_reward, template.gold_reward, rarity);

        tracing::debug!(target: "combat::spawn", template = id, rarity = <&'static str>::from(rarity), "spawned enemy");
        Ok(build_enemy(template, name, stats, rarity, rewards))
    }

    /// Spawns a room. Repeated names get a numeric suffix so log entries stay
    /// distinguishable.
    pub fn spawn_room<S: AsRef<str>>(
        &self,
        room: impl Into<String>,
        ids: &[S],
        rng: &mut dyn RngOracle,
    ) -> Result<Room, SpawnError> {
        let mut enemies = ids
            .iter()
            .map(|id| self.spawn(id.as_ref(), rng))
            .collect::<Result<Vec<_>, _>>()?;

        let mut totals: BTreeMap<String, usize> = BTreeMap::new();
        for enemy in &enemies {
            *totals.entry(enemy.name.clone()).or_default() += 1;
        }
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        for enemy in &mut enemies {
            if totals.get(&enemy.name).copied().unwrap_or(0) > 1 {
                let index = seen.entry(enemy.name.clone()).or_default();
                *index += 1;
                enemy.name = format!("{} {}", enemy.name, index);
            }
        }

        Ok(Room::new(room, enemies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Behavior, ScriptedRng};

    fn goblin() -> EnemyTemplate {
        EnemyTemplate {
            id: "goblin".into(),
            name: "Goblin".into(),
            stats: BaseStats::new(20, 4, 2),
            resource: 0,
            skills: vec!["stab".into()],
            behavior: Behavior::Cowardly,
            rarity: None,
            xp_reward: 10,
            gold_reward: 5,
            loot: Vec::new(),
            affinities: Default::default(),
            speed: None,
        }
    }

    #[test]
    fn rolled_tier_scales_stats_and_rewards() {
        let factory = EnemyFactory::new([goblin()], SpawnRules::default());
        // 0.9 * 100 = 90 falls in the rare band (85..95)
        let mut rng = ScriptedRng::constant(0.9);
        let enemy = factory.spawn("goblin", &mut rng).unwrap();

        let profile = enemy.profile.as_ref().unwrap();
        assert_eq!(profile.rarity, Rarity::Rare);
        assert_eq!(enemy.name, "rare Goblin");
        assert_eq!(enemy.max_hp(), 26);
        assert_eq!(enemy.damage(), 5);
        assert_eq!(enemy.defence(), 2);
        assert_eq!((profile.xp_reward, profile.gold_reward), (15, 7));
        assert_eq!(enemy.skills, vec!["stab".to_string()]);
    }

    #[test]
    fn fixed_tier_skips_the_roll() {
        let mut boss = goblin();
        boss.id = "king".into();
        boss.rarity = Some(Rarity::Boss);
        let factory = EnemyFactory::new([boss], SpawnRules::default());
        let mut rng = ScriptedRng::constant(0.0);
        let enemy = factory.spawn("king", &mut rng).unwrap();
        assert_eq!(enemy.profile.unwrap().rarity, Rarity::Boss);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn duplicate_names_are_numbered() {
        let factory = EnemyFactory::new([goblin()], SpawnRules::default());
        let mut rng = ScriptedRng::constant(0.0);
        let room = factory
            .spawn_room("cave", &["goblin", "goblin"], &mut rng)
            .unwrap();
        let names: Vec<_> = room.enemies.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Goblin 1", "Goblin 2"]);

        assert_eq!(
            factory.spawn("dragon", &mut rng).unwrap_err(),
            SpawnError::UnknownTemplate("dragon".into())
        );
    }
}
