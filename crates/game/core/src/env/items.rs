//! Item definitions consumed as static data.
//!
//! Effects are tagged unions matched exhaustively at resolution time; there is
//! no free-form payload.

use std::collections::BTreeMap;

use crate::env::skills::MagnitudeSpec;
use crate::env::statuses::StatusOracle;
use crate::error::RegistryError;
use crate::state::Stat;

pub trait ItemOracle {
    fn item(&self, id: &str) -> Option<&ItemDefinition>;
}

/// Equipment slot an item occupies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemSlot {
    Weapon,
    Armor,
    Ring,
    Consumable,
    #[default]
    Misc,
}

impl ItemSlot {
    pub fn is_equippable(&self) -> bool {
        matches!(self, ItemSlot::Weapon | ItemSlot::Armor | ItemSlot::Ring)
    }
}

/// Who an on-hit effect lands on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectTarget {
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    Holder,
    #[default]
    Target,
}

/// Status rolled after an unblocked, damaging basic attack.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OnHitEffect {
    pub status: String,
    pub chance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub magnitude: Option<MagnitudeSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: EffectTarget,
    #[cfg_attr(feature = "serde", serde(default))]
    pub expires_end_of_turn: bool,
}

/// Effect of using (or carrying, for `on_turn`) an item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemEffect {
    Heal {
        amount: i32,
    },
    Damage {
        amount: i32,
    },
    ApplyStatus {
        status: String,
        #[cfg_attr(feature = "serde", serde(default))]
        duration: Option<i32>,
        #[cfg_attr(feature = "serde", serde(default))]
        magnitude: Option<MagnitudeSpec>,
        #[cfg_attr(feature = "serde", serde(default))]
        expires_end_of_turn: bool,
    },
    RemoveStatus {
        status: String,
    },
    RestoreResource {
        amount: i32,
    },
    Cleanse {
        #[cfg_attr(feature = "serde", serde(default))]
        except: Vec<String>,
    },
}

impl ItemEffect {
    fn status(&self) -> Option<&str> {
        match self {
            ItemEffect::ApplyStatus { status, .. } | ItemEffect::RemoveStatus { status } => {
                Some(status)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub slot: ItemSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stat_modifiers: BTreeMap<Stat, i32>,
    /// Flat passive values, e.g. `"poison_resist": 0.3`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: BTreeMap<String, f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_hit: Vec<OnHitEffect>,
    /// Fired at the start of each of the holder's turns while equipped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_turn: Vec<ItemEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub use_effects: Vec<ItemEffect>,
}

impl ItemDefinition {
    pub fn new(id: impl Into<String>, slot: ItemSlot) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            slot,
            stat_modifiers: BTreeMap::new(),
            passives: BTreeMap::new(),
            on_hit: Vec::new(),
            on_turn: Vec::new(),
            use_effects: Vec::new(),
        }
    }

    pub fn with_stat(mut self, stat: Stat, amount: i32) -> Self {
        self.stat_modifiers.insert(stat, amount);
        self
    }

    pub fn with_passive(mut self, key: impl Into<String>, value: f64) -> Self {
        self.passives.insert(key.into(), value);
        self
    }

    pub fn with_on_hit(mut self, effect: OnHitEffect) -> Self {
        self.on_hit.push(effect);
        self
    }

    pub fn with_on_turn(mut self, effect: ItemEffect) -> Self {
        self.on_turn.push(effect);
        self
    }

    pub fn with_use(mut self, effect: ItemEffect) -> Self {
        self.use_effects.push(effect);
        self
    }

    pub fn stat_modifier(&self, stat: Stat) -> i32 {
        self.stat_modifiers.get(&stat).copied().unwrap_or(0)
    }

    pub fn validate(&self, statuses: &dyn StatusOracle) -> Result<(), RegistryError> {
        let referenced = self
            .on_hit
            .iter()
            .map(|effect| effect.status.as_str())
            .chain(self.on_turn.iter().filter_map(ItemEffect::status))
            .chain(self.use_effects.iter().filter_map(ItemEffect::status));

        for status in referenced {
            if statuses.rule(status).is_none() {
                return Err(RegistryError::UnknownItemStatus {
                    item: self.id.clone(),
                    status: status.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemTable {
    items: BTreeMap<String, ItemDefinition>,
}

impl ItemTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = ItemDefinition>) -> Self {
        let mut table = Self::new();
        for item in items {
            table.insert(item);
        }
        table
    }

    pub fn insert(&mut self, item: ItemDefinition) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemOracle for ItemTable {
    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }
}
