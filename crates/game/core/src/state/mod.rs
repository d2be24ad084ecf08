//! Encounter state: actors and the arena that owns them.
//!
//! The controller exclusively owns a [`Roster`] for the lifetime of an
//! encounter. Every other component addresses actors through stable
//! [`ActorId`] handles instead of holding references.
mod actor;
mod enemy;
mod equipment;
mod status;

pub use actor::{Actor, ActorKind, BaseStats, Progression, ResourcePool, Stat};
pub use enemy::{Behavior, EnemyProfile, Intent, IntentKind, LockedState, LootEntry, Rarity};
pub use equipment::{EquipError, Equipment, Inventory, InventoryEntry};
pub use status::{Affinity, Magnitude, StatusInstance, StatusRequest};

/// Stable handle into the roster. The player is always [`ActorId::PLAYER`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActorId(pub u32);

impl ActorId {
    pub const PLAYER: ActorId = ActorId(0);

    pub fn is_player(self) -> bool {
        self == Self::PLAYER
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena of encounter participants: the player at slot 0, enemies after it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    actors: Vec<Actor>,
}

impl Roster {
    pub fn new(player: Actor, enemies: impl IntoIterator<Item = Actor>) -> Self {
        let mut actors = vec![player];
        actors.extend(enemies);
        Self { actors }
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.index())
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.index())
    }

    pub fn player(&self) -> &Actor {
        &self.actors[0]
    }

    pub fn player_mut(&mut self) -> &mut Actor {
        &mut self.actors[0]
    }

    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        (0..self.actors.len() as u32).map(ActorId)
    }

    pub fn enemy_ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.ids().skip(1)
    }

    pub fn living_enemy_ids(&self) -> Vec<ActorId> {
        self.enemy_ids()
            .filter(|id| self.is_alive(*id))
            .collect()
    }

    pub fn enemies(&self) -> &[Actor] {
        &self.actors[1..]
    }

    pub fn is_alive(&self, id: ActorId) -> bool {
        self.get(id).is_some_and(Actor::is_alive)
    }

    pub fn all_enemies_dead(&self) -> bool {
        self.enemies().iter().all(|enemy| !enemy.is_alive())
    }

    /// Living actors on the other side.
    pub fn opponents_of(&self, id: ActorId) -> Vec<ActorId> {
        if id.is_player() {
            self.living_enemy_ids()
        } else if self.is_alive(ActorId::PLAYER) {
            vec![ActorId::PLAYER]
        } else {
            Vec::new()
        }
    }

    pub fn name(&self, id: ActorId) -> String {
        self.get(id)
            .map(|actor| actor.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn into_parts(mut self) -> (Actor, Vec<Actor>) {
        let enemies = self.actors.split_off(1);
        let player = self.actors.swap_remove(0);
        (player, enemies)
    }
}
