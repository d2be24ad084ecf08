//! Skill registry.
//!
//! Skills are data. The resolver and the intent planner interpret them; a skill
//! never carries code.

use std::collections::BTreeMap;

use crate::combat::DamageDef;
use crate::env::statuses::{ModifierSet, StatusOracle, StatusRule};
use crate::error::RegistryError;
use crate::state::Magnitude;

/// Read-only lookup of skills.
pub trait SkillOracle {
    fn skill(&self, id: &str) -> Option<&Skill>;
}

/// Who a skill lands on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetKind {
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    Caster,
    #[default]
    Enemy,
    AllEnemies,
    RandomEnemy,
}

/// Magnitude as written in static data.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MagnitudeSpec {
    Value(f64),
    /// Shorthand for the registry's `max_stacks`.
    Max,
    Modifiers(ModifierSet),
}

impl MagnitudeSpec {
    pub fn resolve(&self, rule: Option<&StatusRule>) -> Magnitude {
        match self {
            MagnitudeSpec::Value(value) => Magnitude::Value(*value),
            MagnitudeSpec::Max => match rule.and_then(|rule| rule.max_stacks) {
                Some(max) => Magnitude::Value(max as f64),
                None => Magnitude::None,
            },
            MagnitudeSpec::Modifiers(modifiers) => Magnitude::Modifiers(*modifiers),
        }
    }
}

/// A status a skill or item tries to apply. Unset fields fall back to the
/// registry defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusApplication {
    pub status: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub magnitude: Option<MagnitudeSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chance: Option<f64>,
    /// Removed at the end of the holder's turn regardless of duration.
    #[cfg_attr(feature = "serde", serde(default))]
    pub expires_end_of_turn: bool,
}

impl StatusApplication {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            duration: None,
            magnitude: None,
            chance: None,
            expires_end_of_turn: false,
        }
    }

    pub fn with_duration(mut self, duration: i32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_magnitude(mut self, magnitude: MagnitudeSpec) -> Self {
        self.magnitude = Some(magnitude);
        self
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = Some(chance);
        self
    }

    pub fn ending_this_turn(mut self) -> Self {
        self.expires_end_of_turn = true;
        self
    }

    pub fn magnitude(&self, statuses: &dyn StatusOracle) -> Magnitude {
        self.magnitude
            .map(|spec| spec.resolve(statuses.rule(&self.status)))
            .unwrap_or_default()
    }
}

/// Pre-hit effects run on the caster, in order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkillEffect {
    Cleanse {
        #[cfg_attr(feature = "serde", serde(default))]
        except: Vec<String>,
    },
    ApplyStatus(StatusApplication),
}

/// What a locked actor does on each turn while the channel runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ForcedAction {
    Defend,
    Attack,
}

/// Multi-turn commitment started when the skill is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockSpec {
    pub label: String,
    pub turns: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub forced_action: Option<ForcedAction>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: TargetKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: Option<DamageDef>,
    #[cfg_attr(feature = "serde", serde(default = "Skill::default_hit_chance"))]
    pub hit_chance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub apply_status: Option<StatusApplication>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub forbid_if_target_has: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_turns: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub locks_actor: Option<LockSpec>,
    #[cfg_attr(feature = "serde", serde(default = "Skill::default_requires_target_alive"))]
    pub requires_target_alive: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub allowed_while_locked: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<SkillEffect>,
    /// Telegraph text shown while the skill is the published intent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub intent_hint: Option<String>,
}

impl Skill {
    fn default_hit_chance() -> f64 {
        1.0
    }

    fn default_requires_target_alive() -> bool {
        true
    }

    pub fn new(id: impl Into<String>, target: TargetKind) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            target,
            damage: None,
            hit_chance: 1.0,
            apply_status: None,
            cost: None,
            forbid_if_target_has: Vec::new(),
            cooldown_turns: None,
            locks_actor: None,
            requires_target_alive: true,
            allowed_while_locked: false,
            effects: Vec::new(),
            intent_hint: None,
        }
    }

    pub fn with_damage(mut self, damage: DamageDef) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_hit_chance(mut self, hit_chance: f64) -> Self {
        self.hit_chance = hit_chance;
        self
    }

    pub fn with_status(mut self, application: StatusApplication) -> Self {
        self.apply_status = Some(application);
        self
    }

    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown_turns = Some(turns);
        self
    }

    pub fn with_lock(mut self, lock: LockSpec) -> Self {
        self.locks_actor = Some(lock);
        self
    }

    pub fn with_effect(mut self, effect: SkillEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn forbidden_if(mut self, status: impl Into<String>) -> Self {
        self.forbid_if_target_has.push(status.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.intent_hint = Some(hint.into());
        self
    }

    /// Status ids this skill references, for registry validation.
    pub fn referenced_statuses(&self) -> impl Iterator<Item = &str> {
        let from_effects = self.effects.iter().filter_map(|effect| match effect {
            SkillEffect::ApplyStatus(application) => Some(application.status.as_str()),
            SkillEffect::Cleanse { .. } => None,
        });
        self.apply_status
            .iter()
            .map(|application| application.status.as_str())
            .chain(from_effects)
    }

    pub fn validate(&self, statuses: &dyn StatusOracle) -> Result<(), RegistryError> {
        if !(0.0..=1.0).contains(&self.hit_chance) {
            return Err(RegistryError::InvalidChance {
                skill: self.id.clone(),
                value: self.hit_chance.to_string(),
            });
        }
        if let Some(status) = self
            .referenced_statuses()
            .find(|status| statuses.rule(status).is_none())
        {
            return Err(RegistryError::UnknownStatus {
                skill: self.id.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillTable {
    skills: BTreeMap<String, Skill>,
}

impl SkillTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_skills(skills: impl IntoIterator<Item = Skill>) -> Self {
        let mut table = Self::new();
        for skill in skills {
            table.insert(skill);
        }
        table
    }

    pub fn insert(&mut self, skill: Skill) {
        self.skills.insert(skill.id.clone(), skill);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl SkillOracle for SkillTable {
    fn skill(&self, id: &str) -> Option<&Skill> {
        self.skills.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::statuses::{StackPolicy, StatusTable};

    fn statuses() -> StatusTable {
        StatusTable::from_rules([
            StatusRule::new("poison").with_stacking(StackPolicy::Stack, Some(5)),
            StatusRule::new("stun"),
        ])
        .unwrap()
    }

    #[test]
    fn max_shorthand_reads_registry_cap() {
        let statuses = statuses();
        let application = StatusApplication::new("poison").with_magnitude(MagnitudeSpec::Max);
        assert_eq!(application.magnitude(&statuses), Magnitude::Value(5.0));

        let application = StatusApplication::new("stun").with_magnitude(MagnitudeSpec::Max);
        assert_eq!(application.magnitude(&statuses), Magnitude::None);
    }

    #[test]
    fn validation_catches_dangling_status() {
        let statuses = statuses();
        let skill = Skill::new("hex", TargetKind::Enemy)
            .with_effect(SkillEffect::ApplyStatus(StatusApplication::new("curse")));
        assert_eq!(
            skill.validate(&statuses),
            Err(RegistryError::UnknownStatus {
                skill: "hex".into(),
                status: "curse".into(),
            })
        );

        let skill = Skill::new("jab", TargetKind::Enemy).with_hit_chance(1.5);
        assert!(matches!(
            skill.validate(&statuses),
            Err(RegistryError::InvalidChance { .. })
        ));
    }
}
