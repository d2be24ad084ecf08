//! Victory rewards: loot, xp, gold, level-ups and resource restoration.

use crate::encounter::log::{CombatEvent, EventLog};
use crate::env::{Env, RngOracle};
use crate::state::{Actor, Roster, Stat};

/// What the player collected from a won encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rewards {
    pub loot: Vec<String>,
    pub xp: u32,
    pub gold: u32,
}

/// Rolls every defeated enemy's loot table and grants the totals to the
/// player.
pub fn grant_rewards(
    roster: &mut Roster,
    env: &Env<'_>,
    rng: &mut dyn RngOracle,
    log: &mut EventLog,
) -> Rewards {
    let mut rewards = Rewards::default();

    let profiles: Vec<_> = roster
        .enemies()
        .iter()
        .filter(|enemy| !enemy.is_alive())
        .filter_map(|enemy| enemy.profile.clone())
        .collect();

    for profile in profiles {
        rewards.xp = rewards.xp.saturating_add(profile.xp_reward);
        rewards.gold = rewards.gold.saturating_add(profile.gold_reward);

        for entry in &profile.loot {
            if !rng.chance(entry.chance) {
                continue;
            }
            let Some(item) = env.items().item(&entry.item) else {
                tracing::warn!(target: "combat::rewards", item = %entry.item, "loot references unknown item");
                continue;
            };
            roster.player_mut().inventory.add(item.clone(), 1);
            rewards.loot.push(entry.item.clone());
            log.push(CombatEvent::LootDropped {
                item: entry.item.clone(),
            });
        }
    }

    let player = roster.player_mut();
    player.progression.gold = player.progression.gold.saturating_add(rewards.gold);
    log.push(CombatEvent::Rewarded {
        xp: rewards.xp,
        gold: rewards.gold,
    });
    gain_xp(player, rewards.xp, env, log);

    let percent = env.config().regen.victory_percent;
    let amount = player.resource.restore_percent(percent);
    if amount > 0 {
        log.push(CombatEvent::ResourceRestored {
            actor: player.name.clone(),
            amount,
        });
    }

    rewards
}

/// Adds xp and applies every level-up it pays for.
pub fn gain_xp(player: &mut Actor, xp: u32, env: &Env<'_>, log: &mut EventLog) {
    let rules = env.config().progression;
    let progression = &mut player.progression;
    progression.xp = progression.xp.saturating_add(xp);

    loop {
        let needed = rules.xp_to_next(player.progression.level);
        if needed == 0 || player.progression.xp < needed {
            break;
        }
        player.progression.xp -= needed;
        player.progression.level += 1;

        for (stat, gain) in [
            (Stat::Hp, rules.hp_per_level),
            (Stat::Damage, rules.damage_per_level),
            (Stat::Defence, rules.defence_per_level),
        ] {
            *player.level_bonuses.entry(stat).or_insert(0) += gain;
        }
        player.heal(rules.hp_per_level);

        tracing::info!(
            target: "combat::rewards",
            level = player.progression.level,
            "level up"
        );
        log.push(CombatEvent::LevelUp {
            level: player.progression.level,
            hp_gain: rules.hp_per_level,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::env::{ItemDefinition, ItemSlot, ItemTable, Registries, ScriptedRng, SkillTable, StatusTable};
    use crate::state::{BaseStats, Behavior, EnemyProfile, Rarity};

    fn registries() -> Registries {
        Registries::new(
            StatusTable::new(),
            SkillTable::new(),
            ItemTable::from_items([ItemDefinition::new("fang", ItemSlot::Misc)]),
        )
    }

    #[test]
    fn loot_xp_and_gold_are_granted() {
        let registries = registries();
        let config = CombatConfig::default();
        let env = registries.env(&config);

        let profile = EnemyProfile::new(Rarity::Common, Behavior::Normal)
            .with_rewards(30, 7)
            .with_loot("fang", 0.5)
            .with_loot("ghost_item", 1.0);
        let mut roster = Roster::new(
            Actor::player("hero", BaseStats::new(30, 5, 1)).with_resource(20),
            [Actor::enemy("wolf", BaseStats::new(10, 2, 0), profile)],
        );
        roster.get_mut(crate::state::ActorId(1)).unwrap().take_damage(10);
        roster.player_mut().resource.set(0);

        let mut log = EventLog::new();
        let mut rng = ScriptedRng::constant(0.2);
        let rewards = grant_rewards(&mut roster, &env, &mut rng, &mut log);

        assert_eq!(rewards.loot, vec!["fang".to_string()]);
        assert_eq!((rewards.xp, rewards.gold), (30, 7));
        let player = roster.player();
        assert_eq!(player.inventory.count("fang"), 1);
        assert_eq!(player.progression.xp, 30);
        assert_eq!(player.progression.gold, 7);
        assert_eq!(player.resource.current(), 10);
    }

    #[test]
    fn level_ups_carry_leftover_xp_and_heal() {
        let registries = registries();
        let config = CombatConfig::default();
        let env = registries.env(&config);
        let mut player = Actor::player("hero", BaseStats::new(30, 5, 1));
        player.take_damage(5);

        let mut log = EventLog::new();
        // 100 to reach 2, 200 more to reach 3
        gain_xp(&mut player, 320, &env, &mut log);

        assert_eq!(player.progression.level, 3);
        assert_eq!(player.progression.xp, 20);
        assert_eq!(player.max_hp(), 50);
        assert_eq!(player.damage(), 9);
        assert_eq!(player.defence(), 3);
        assert_eq!(player.hp(), 45);
        assert_eq!(log.tagged("level_up").count(), 2);
    }
}
