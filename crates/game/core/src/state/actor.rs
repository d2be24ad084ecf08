//! Actor: the shared shape of the player and enemies.
//!
//! Derived stats (`max_hp`, `damage`, `defence`) are computed from base
//! values, level bonuses and equipped items on every read; they are never
//! stored. Current hp and resource are clamped on every write.

use std::collections::BTreeMap;

use crate::state::enemy::EnemyProfile;
use crate::state::equipment::{Equipment, Inventory};
use crate::state::status::{Affinity, StatusInstance};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActorKind {
    Player,
    Enemy,
}

/// Stats that items and level-ups modify.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Stat {
    Hp,
    Damage,
    Defence,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub hp: i32,
    pub damage: i32,
    pub defence: i32,
}

impl BaseStats {
    pub fn new(hp: i32, damage: i32, defence: i32) -> Self {
        Self {
            hp,
            damage,
            defence,
        }
    }
}

/// Resource pool used to pay skill costs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    current: i32,
    max: i32,
}

impl ResourcePool {
    pub fn full(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn set(&mut self, value: i32) {
        self.current = value.clamp(0, self.max);
    }

    /// Deducts `cost` if affordable.
    pub fn spend(&mut self, cost: i32) -> bool {
        if cost > self.current {
            return false;
        }
        self.current -= cost.max(0);
        true
    }

    /// Returns the amount actually restored.
    pub fn restore(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.set(self.current.saturating_add(amount.max(0)));
        self.current - before
    }

    pub fn restore_percent(&mut self, percent: i32) -> i32 {
        self.restore(self.max * percent / 100)
    }
}

/// Player progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    pub gold: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            gold: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub name: String,
    pub kind: ActorKind,
    pub base: BaseStats,
    pub level_bonuses: BTreeMap<Stat, i32>,
    hp: i32,
    pub resource: ResourcePool,
    pub equipment: Equipment,
    pub inventory: Inventory,
    pub(crate) statuses: Vec<StatusInstance>,
    pub skills: Vec<String>,
    pub cooldowns: BTreeMap<String, u32>,
    pub affinities: BTreeMap<String, Affinity>,
    /// Explicit initiative; falls back to the config default for the kind.
    pub speed: Option<i32>,
    pub progression: Progression,
    pub profile: Option<EnemyProfile>,
}

impl Actor {
    fn new(name: impl Into<String>, kind: ActorKind, base: BaseStats) -> Self {
        Self {
            name: name.into(),
            kind,
            base,
            level_bonuses: BTreeMap::new(),
            hp: base.hp.max(0),
            resource: ResourcePool::default(),
            equipment: Equipment::empty(),
            inventory: Inventory::new(),
            statuses: Vec::new(),
            skills: Vec::new(),
            cooldowns: BTreeMap::new(),
            affinities: BTreeMap::new(),
            speed: None,
            progression: Progression::default(),
            profile: None,
        }
    }

    pub fn player(name: impl Into<String>, base: BaseStats) -> Self {
        Self::new(name, ActorKind::Player, base)
    }

    pub fn enemy(name: impl Into<String>, base: BaseStats, profile: EnemyProfile) -> Self {
        let mut actor = Self::new(name, ActorKind::Enemy, base);
        actor.profile = Some(profile);
        actor
    }

    pub fn with_resource(mut self, max: i32) -> Self {
        self.resource = ResourcePool::full(max);
        self
    }

    pub fn with_skills<S: Into<String>>(mut self, skills: impl IntoIterator<Item = S>) -> Self {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_affinity(mut self, status: impl Into<String>, affinity: Affinity) -> Self {
        self.affinities.insert(status.into(), affinity);
        self
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }

    // ========================================================================
    // Derived stats
    // ========================================================================

    pub fn stat(&self, stat: Stat) -> i32 {
        let base = match stat {
            Stat::Hp => self.base.hp,
            Stat::Damage => self.base.damage,
            Stat::Defence => self.base.defence,
        };
        let bonus = self.level_bonuses.get(&stat).copied().unwrap_or(0);
        base + bonus + self.equipment.stat_bonus(stat)
    }

    pub fn max_hp(&self) -> i32 {
        self.stat(Stat::Hp).max(0)
    }

    pub fn damage(&self) -> i32 {
        self.stat(Stat::Damage)
    }

    pub fn defence(&self) -> i32 {
        self.stat(Stat::Defence)
    }

    // ========================================================================
    // Health
    // ========================================================================

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp());
    }

    /// Returns the hp actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.set_hp(self.hp.saturating_sub(amount.max(0)));
        before - self.hp
    }

    /// Returns the hp actually restored. Dead actors stay dead.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.is_alive() {
            return 0;
        }
        let before = self.hp;
        self.set_hp(self.hp.saturating_add(amount.max(0)));
        self.hp - before
    }

    // ========================================================================
    // Statuses & affinities
    // ========================================================================

    pub fn statuses(&self) -> &[StatusInstance] {
        &self.statuses
    }

    pub fn status(&self, id: &str) -> Option<&StatusInstance> {
        self.statuses.iter().find(|status| status.id == id)
    }

    pub fn has_status(&self, id: &str) -> bool {
        self.status(id).is_some()
    }

    pub fn affinity(&self, status: &str) -> Affinity {
        self.affinities.get(status).copied().unwrap_or_default()
    }

    // ========================================================================
    // Cooldowns
    // ========================================================================

    pub fn cooldown(&self, skill: &str) -> u32 {
        self.cooldowns.get(skill).copied().unwrap_or(0)
    }

    pub fn start_cooldown(&mut self, skill: &str, turns: u32) {
        if turns > 0 {
            self.cooldowns.insert(skill.to_string(), turns);
        }
    }

    /// Counts every running cooldown down by one, dropping finished ones.
    pub fn tick_cooldowns(&mut self) {
        self.cooldowns.retain(|_, turns| {
            *turns = turns.saturating_sub(1);
            *turns > 0
        });
    }

    pub fn is_locked(&self) -> bool {
        self.profile.as_ref().is_some_and(EnemyProfile::is_locked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ItemDefinition, ItemSlot};

    #[test]
    fn derived_stats_include_level_and_equipment() {
        let mut actor = Actor::player("hero", BaseStats::new(50, 10, 2));
        actor.level_bonuses.insert(Stat::Damage, 2);
        actor
            .equipment
            .equip(ItemDefinition::new("sword", ItemSlot::Weapon).with_stat(Stat::Damage, 3))
            .unwrap();
        actor
            .equipment
            .equip(ItemDefinition::new("mail", ItemSlot::Armor).with_stat(Stat::Hp, 10))
            .unwrap();

        assert_eq!(actor.damage(), 15);
        assert_eq!(actor.defence(), 2);
        assert_eq!(actor.max_hp(), 60);
    }

    #[test]
    fn hp_is_clamped_both_ends() {
        let mut actor = Actor::player("hero", BaseStats::new(10, 1, 0));
        assert_eq!(actor.take_damage(50), 10);
        assert_eq!(actor.hp(), 0);
        assert!(!actor.is_alive());
        assert_eq!(actor.heal(5), 0);

        let mut actor = Actor::player("hero", BaseStats::new(10, 1, 0));
        actor.take_damage(3);
        assert_eq!(actor.heal(100), 3);
        assert_eq!(actor.hp(), 10);
    }

    #[test]
    fn resource_spend_and_restore() {
        let mut pool = ResourcePool::full(40);
        assert!(!pool.spend(41));
        assert!(pool.spend(30));
        assert_eq!(pool.current(), 10);
        assert_eq!(pool.restore_percent(50), 20);
        assert_eq!(pool.restore(100), 10);
        assert_eq!(pool.current(), 40);
    }

    #[test]
    fn cooldowns_tick_down_and_expire() {
        let mut actor = Actor::player("hero", BaseStats::new(10, 1, 0));
        actor.start_cooldown("slam", 2);
        actor.start_cooldown("noop", 0);
        assert_eq!(actor.cooldown("slam"), 2);
        assert_eq!(actor.cooldown("noop"), 0);
        actor.tick_cooldowns();
        assert_eq!(actor.cooldown("slam"), 1);
        actor.tick_cooldowns();
        assert!(actor.cooldowns.is_empty());
    }
}
