//! Status registry: static rules keyed by status id.
//!
//! Behavior is data. A [`StatusRule`] describes how an instance merges, how it
//! modifies stats, whether it blocks actions, and what happens when it ticks.
//! The engine in [`crate::status`] interprets these rules; nothing here
//! mutates an actor.

use std::collections::BTreeMap;

use crate::error::RegistryError;

/// Read-only lookup of status rules.
pub trait StatusOracle {
    fn rule(&self, id: &str) -> Option<&StatusRule>;

    /// Rule ids in deterministic order.
    fn ids(&self) -> Vec<&str>;
}

/// How a re-application merges with an existing instance of the same id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StackPolicy {
    /// Old instance removed, new one appended.
    #[default]
    Replace,

    /// Magnitude-aware: stronger replaces, equal extends, weaker is ignored.
    Refresh,

    /// Durations (and numeric magnitudes) accumulate up to `max_stacks`.
    Stack,
}

/// Multiplicative stat modifiers. Missing entries count as `1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModifierSet {
    pub damage_mult: Option<f64>,
    pub defence_mult: Option<f64>,
}

impl ModifierSet {
    pub fn damage(damage_mult: f64) -> Self {
        Self {
            damage_mult: Some(damage_mult),
            defence_mult: None,
        }
    }

    pub fn defence(defence_mult: f64) -> Self {
        Self {
            damage_mult: None,
            defence_mult: Some(defence_mult),
        }
    }

    /// Entries present in `other` win over entries in `self`.
    pub fn overridden_by(&self, other: &ModifierSet) -> ModifierSet {
        ModifierSet {
            damage_mult: other.damage_mult.or(self.damage_mult),
            defence_mult: other.defence_mult.or(self.defence_mult),
        }
    }

    pub fn damage_factor(&self) -> f64 {
        self.damage_mult.unwrap_or(1.0)
    }

    pub fn defence_factor(&self) -> f64 {
        self.defence_mult.unwrap_or(1.0)
    }
}

/// Per-tick mutation. The amount is `floor(effective_magnitude * scale)`,
/// where a status without a numeric magnitude counts as `1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TickRule {
    Damage { scale: f64 },
    Heal { scale: f64 },
    RestoreResource { scale: f64 },
}

impl TickRule {
    pub fn amount(&self, effective_magnitude: f64) -> i32 {
        let scale = match self {
            TickRule::Damage { scale }
            | TickRule::Heal { scale }
            | TickRule::RestoreResource { scale } => *scale,
        };
        (effective_magnitude * scale).floor().max(0.0) as i32
    }
}

/// Tick modulation while another status is co-present.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction {
    pub damage_multiplier: f64,
}

/// Static rules for one status id.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusRule {
    pub id: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub stacking: StackPolicy,

    /// Required for [`StackPolicy::Stack`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_stacks: Option<u32>,

    /// Lower ticks first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub prevents_action: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub is_debuff: bool,

    /// Cancels a channel on a locked target (subject to rarity resistance).
    #[cfg_attr(feature = "serde", serde(default))]
    pub interrupts: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: ModifierSet,

    #[cfg_attr(feature = "serde", serde(default))]
    pub on_tick: Option<TickRule>,

    /// Keyed by the co-present status id.
    #[cfg_attr(feature = "serde", serde(default))]
    pub interactions: BTreeMap<String, Interaction>,

    #[cfg_attr(feature = "serde", serde(default = "StatusRule::default_duration"))]
    pub default_duration: i32,

    #[cfg_attr(feature = "serde", serde(default = "StatusRule::default_chance"))]
    pub default_chance: f64,
}

impl StatusRule {
    pub const DEFAULT_DURATION: i32 = 3;

    fn default_duration() -> i32 {
        Self::DEFAULT_DURATION
    }

    fn default_chance() -> f64 {
        1.0
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stacking: StackPolicy::Replace,
            max_stacks: None,
            priority: 0,
            prevents_action: false,
            is_debuff: false,
            interrupts: false,
            modifiers: ModifierSet::default(),
            on_tick: None,
            interactions: BTreeMap::new(),
            default_duration: Self::DEFAULT_DURATION,
            default_chance: 1.0,
        }
    }

    pub fn with_stacking(mut self, stacking: StackPolicy, max_stacks: Option<u32>) -> Self {
        self.stacking = stacking;
        self.max_stacks = max_stacks;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn debuff(mut self) -> Self {
        self.is_debuff = true;
        self
    }

    pub fn preventing_action(mut self) -> Self {
        self.prevents_action = true;
        self
    }

    pub fn interrupting(mut self) -> Self {
        self.interrupts = true;
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierSet) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_tick(mut self, on_tick: TickRule) -> Self {
        self.on_tick = Some(on_tick);
        self
    }

    pub fn with_interaction(mut self, other: impl Into<String>, damage_multiplier: f64) -> Self {
        self.interactions
            .insert(other.into(), Interaction { damage_multiplier });
        self
    }

    pub fn with_defaults(mut self, duration: i32, chance: f64) -> Self {
        self.default_duration = duration;
        self.default_chance = chance;
        self
    }

    /// Stack cap, falling back to 1 for malformed rules that skipped validation.
    pub fn stack_cap(&self) -> u32 {
        self.max_stacks.unwrap_or(1).max(1)
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.stacking == StackPolicy::Stack && self.max_stacks.is_none() {
            return Err(RegistryError::MissingMaxStacks(self.id.clone()));
        }
        Ok(())
    }
}

/// In-memory status registry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusTable {
    rules: BTreeMap<String, StatusRule>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and validates a table; later duplicates overwrite earlier ones.
    pub fn from_rules(rules: impl IntoIterator<Item = StatusRule>) -> Result<Self, RegistryError> {
        let mut table = Self::new();
        for rule in rules {
            table.insert(rule)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, rule: StatusRule) -> Result<(), RegistryError> {
        rule.validate()?;
        self.rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl StatusOracle for StatusTable {
    fn rule(&self, id: &str) -> Option<&StatusRule> {
        self.rules.get(id)
    }

    fn ids(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_policy_requires_max_stacks() {
        let rule = StatusRule::new("bleed").with_stacking(StackPolicy::Stack, None);
        assert_eq!(
            StatusTable::from_rules([rule]),
            Err(RegistryError::MissingMaxStacks("bleed".into()))
        );

        let rule = StatusRule::new("bleed").with_stacking(StackPolicy::Stack, Some(5));
        let table = StatusTable::from_rules([rule]).unwrap();
        assert_eq!(table.rule("bleed").unwrap().stack_cap(), 5);
    }

    #[test]
    fn modifier_override_prefers_instance_entries() {
        let registry = ModifierSet {
            damage_mult: Some(1.5),
            defence_mult: Some(0.5),
        };
        let merged = registry.overridden_by(&ModifierSet::damage(2.0));
        assert_eq!(merged.damage_factor(), 2.0);
        assert_eq!(merged.defence_factor(), 0.5);
        assert_eq!(ModifierSet::default().damage_factor(), 1.0);
    }

    #[test]
    fn tick_amount_floors_and_never_goes_negative() {
        assert_eq!(TickRule::Damage { scale: 1.0 }.amount(3.9), 3);
        assert_eq!(TickRule::Heal { scale: 2.5 }.amount(1.0), 2);
        assert_eq!(TickRule::Damage { scale: 1.0 }.amount(-4.0), 0);
    }
}
