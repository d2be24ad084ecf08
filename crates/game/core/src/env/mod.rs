//! Traits describing read-only combat data.
//!
//! Oracles expose the status registry, the skill table, and item definitions.
//! The [`Env`] aggregate bundles them with the [`CombatConfig`] so the engine
//! can access everything it needs without hard coupling to concrete tables.
//! Randomness is not part of the environment: it is mutable and travels
//! separately as an [`RngOracle`].
mod items;
mod rng;
mod skills;
mod statuses;

pub use items::{
    EffectTarget, ItemDefinition, ItemEffect, ItemOracle, ItemSlot, ItemTable, OnHitEffect,
};
pub use rng::{PcgRng, RngOracle, ScriptedRng};
pub use skills::{
    ForcedAction, LockSpec, MagnitudeSpec, Skill, SkillEffect, SkillOracle, SkillTable,
    StatusApplication, TargetKind,
};
pub use statuses::{
    Interaction, ModifierSet, StackPolicy, StatusOracle, StatusRule, StatusTable, TickRule,
};

use crate::config::CombatConfig;
use crate::error::RegistryError;

/// Aggregates read-only oracles required by the resolver, planner and controller.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    statuses: &'a dyn StatusOracle,
    skills: &'a dyn SkillOracle,
    items: &'a dyn ItemOracle,
    config: &'a CombatConfig,
}

impl<'a> Env<'a> {
    pub fn new(
        statuses: &'a dyn StatusOracle,
        skills: &'a dyn SkillOracle,
        items: &'a dyn ItemOracle,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            statuses,
            skills,
            items,
            config,
        }
    }

    pub fn statuses(&self) -> &'a dyn StatusOracle {
        self.statuses
    }

    pub fn skills(&self) -> &'a dyn SkillOracle {
        self.skills
    }

    pub fn items(&self) -> &'a dyn ItemOracle {
        self.items
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }

    /// Shorthand for `statuses().rule(id)`.
    pub fn status_rule(&self, id: &str) -> Option<&'a StatusRule> {
        self.statuses.rule(id)
    }

    pub fn skill(&self, id: &str) -> Option<&'a Skill> {
        self.skills.skill(id)
    }
}

impl core::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env")
            .field("statuses", &self.statuses.ids().len())
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

/// Owned registries backing an [`Env`].
#[derive(Clone, Debug, Default)]
pub struct Registries {
    pub statuses: StatusTable,
    pub skills: SkillTable,
    pub items: ItemTable,
}

impl Registries {
    pub fn new(statuses: StatusTable, skills: SkillTable, items: ItemTable) -> Self {
        Self {
            statuses,
            skills,
            items,
        }
    }

    pub fn env<'a>(&'a self, config: &'a CombatConfig) -> Env<'a> {
        Env::new(&self.statuses, &self.skills, &self.items, config)
    }

    /// Cross-checks skill and item references against the status registry.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for skill in self.skills.iter() {
            skill.validate(&self.statuses)?;
        }
        for item in self.items.iter() {
            item.validate(&self.statuses)?;
        }
        Ok(())
    }

    /// Checks that every skill an actor lists exists.
    pub fn validate_skills<'s>(
        &self,
        actor: &str,
        skills: impl IntoIterator<Item = &'s String>,
    ) -> Result<(), RegistryError> {
        for skill in skills {
            if self.skills.skill(skill).is_none() {
                return Err(RegistryError::UnknownSkill {
                    actor: actor.to_string(),
                    skill: skill.clone(),
                });
            }
        }
        Ok(())
    }
}
