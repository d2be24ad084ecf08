//! Enemy-only profile: rarity, behavior, rewards, lock and intent.

use crate::env::ForcedAction;

/// Enemy power tier. Drives spawn weighting, stat scaling and interrupt
/// resistance.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Elite,
    Boss,
}

/// Enemy archetype. Drives AI weighting and flee-chance modifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Behavior {
    #[default]
    Normal,
    Aggressive,
    Cowardly,
    Slow,
    Ranged,
    Hulking,
}

/// Active multi-turn channel.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockedState {
    pub skill: String,
    pub label: String,
    pub turns_remaining: u32,
    pub forced_action: Option<ForcedAction>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IntentKind {
    Attack,
    Skill,
    Charging,
}

/// One-round-ahead telegraph of an enemy's next action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intent {
    pub kind: IntentKind,
    pub skill: Option<String>,
    /// Remaining channel turns for [`IntentKind::Charging`].
    pub turns: Option<u32>,
    pub hint: Option<String>,
}

impl Intent {
    pub fn attack() -> Self {
        Self {
            kind: IntentKind::Attack,
            skill: None,
            turns: None,
            hint: None,
        }
    }

    pub fn skill(skill: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            kind: IntentKind::Skill,
            skill: Some(skill.into()),
            turns: None,
            hint,
        }
    }

    pub fn charging(lock: &LockedState, hint: Option<String>) -> Self {
        Self {
            kind: IntentKind::Charging,
            skill: Some(lock.skill.clone()),
            turns: Some(lock.turns_remaining),
            hint: hint.or_else(|| Some(lock.label.clone())),
        }
    }
}

/// One loot roll: `item` drops with probability `chance`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item: String,
    pub chance: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyProfile {
    pub rarity: Rarity,
    pub behavior: Behavior,
    pub xp_reward: u32,
    pub gold_reward: u32,
    pub loot: Vec<LootEntry>,
    pub locked: Option<LockedState>,
    pub intent: Option<Intent>,
}

impl EnemyProfile {
    pub fn new(rarity: Rarity, behavior: Behavior) -> Self {
        Self {
            rarity,
            behavior,
            ..Self::default()
        }
    }

    pub fn with_rewards(mut self, xp: u32, gold: u32) -> Self {
        self.xp_reward = xp;
        self.gold_reward = gold;
        self
    }

    pub fn with_loot(mut self, item: impl Into<String>, chance: f64) -> Self {
        self.loot.push(LootEntry {
            item: item.into(),
            chance,
        });
        self
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }
}
