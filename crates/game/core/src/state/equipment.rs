//! Equipment slots and inventory.
//!
//! Equipped items contribute stat modifiers, passive resistances, on-hit
//! effects and on-turn triggers. Definitions are stored by value so derived
//! stats never need an oracle lookup.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::env::{ItemDefinition, ItemSlot};
use crate::state::Stat;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EquipError {
    #[error("item '{0}' cannot be equipped")]
    NotEquippable(String),
}

/// Equipped items: one weapon, one armor, up to [`CombatConfig::MAX_RINGS`] rings.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub weapon: Option<ItemDefinition>,
    pub armor: Option<ItemDefinition>,
    pub rings: ArrayVec<ItemDefinition, { CombatConfig::MAX_RINGS }>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Equips an item into its slot, returning whatever it displaced.
    ///
    /// With every ring slot taken, the oldest ring is displaced.
    pub fn equip(&mut self, item: ItemDefinition) -> Result<Option<ItemDefinition>, EquipError> {
        match item.slot {
            ItemSlot::Weapon => Ok(self.weapon.replace(item)),
            ItemSlot::Armor => Ok(self.armor.replace(item)),
            ItemSlot::Ring => {
                let displaced = if self.rings.is_full() {
                    Some(self.rings.remove(0))
                } else {
                    None
                };
                self.rings.push(item);
                Ok(displaced)
            }
            ItemSlot::Consumable | ItemSlot::Misc => Err(EquipError::NotEquippable(item.id)),
        }
    }

    pub fn unequip(&mut self, id: &str) -> Option<ItemDefinition> {
        if self.weapon.as_ref().is_some_and(|item| item.id == id) {
            return self.weapon.take();
        }
        if self.armor.as_ref().is_some_and(|item| item.id == id) {
            return self.armor.take();
        }
        let index = self.rings.iter().position(|item| item.id == id)?;
        Some(self.rings.remove(index))
    }

    /// Equipped items in slot order: weapon, armor, rings.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.weapon
            .iter()
            .chain(self.armor.iter())
            .chain(self.rings.iter())
    }

    pub fn stat_bonus(&self, stat: Stat) -> i32 {
        self.iter().map(|item| item.stat_modifier(stat)).sum()
    }

    /// Sum of a passive across all equipped items.
    pub fn passive(&self, key: &str) -> f64 {
        self.iter()
            .filter_map(|item| item.passives.get(key))
            .sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryEntry {
    pub item: ItemDefinition,
    pub count: u32,
}

/// Carried items keyed by item id.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    entries: BTreeMap<String, InventoryEntry>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: ItemDefinition, count: u32) {
        if count == 0 {
            return;
        }
        self.entries
            .entry(item.id.clone())
            .and_modify(|entry| entry.count += count)
            .or_insert(InventoryEntry { item, count });
    }

    pub fn count(&self, id: &str) -> u32 {
        self.entries.get(id).map_or(0, |entry| entry.count)
    }

    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.entries.get(id).map(|entry| &entry.item)
    }

    /// Removes one unit, dropping the entry when the count reaches zero.
    pub fn take_one(&mut self, id: &str) -> Option<ItemDefinition> {
        let entry = self.entries.get_mut(id)?;
        entry.count -= 1;
        if entry.count == 0 {
            return self.entries.remove(id).map(|entry| entry.item);
        }
        Some(entry.item.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(id: &str) -> ItemDefinition {
        ItemDefinition::new(id, ItemSlot::Ring).with_passive("poison_resist", 0.3)
    }

    #[test]
    fn third_ring_displaces_the_oldest() {
        let mut equipment = Equipment::empty();
        assert_eq!(equipment.equip(ring("a")), Ok(None));
        assert_eq!(equipment.equip(ring("b")), Ok(None));
        let displaced = equipment.equip(ring("c")).unwrap();
        assert_eq!(displaced.map(|item| item.id), Some("a".to_string()));
        assert_eq!(equipment.rings.len(), 2);
    }

    #[test]
    fn passives_and_stats_sum_across_slots() {
        let mut equipment = Equipment::empty();
        equipment
            .equip(ItemDefinition::new("sword", ItemSlot::Weapon).with_stat(Stat::Damage, 4))
            .unwrap();
        equipment.equip(ring("a")).unwrap();
        equipment.equip(ring("b")).unwrap();

        assert_eq!(equipment.stat_bonus(Stat::Damage), 4);
        assert!((equipment.passive("poison_resist") - 0.6).abs() < 1e-9);
        assert_eq!(equipment.passive("stun_resist"), 0.0);
    }

    #[test]
    fn consumables_cannot_be_equipped() {
        let mut equipment = Equipment::empty();
        let potion = ItemDefinition::new("potion", ItemSlot::Consumable);
        assert_eq!(
            equipment.equip(potion),
            Err(EquipError::NotEquippable("potion".into()))
        );
    }

    #[test]
    fn inventory_counts_down_and_drops_empty_entries() {
        let mut inventory = Inventory::new();
        let potion = ItemDefinition::new("potion", ItemSlot::Consumable);
        inventory.add(potion.clone(), 2);
        assert_eq!(inventory.count("potion"), 2);
        assert!(inventory.take_one("potion").is_some());
        assert!(inventory.take_one("potion").is_some());
        assert!(inventory.take_one("potion").is_none());
        assert!(inventory.is_empty());
    }
}
