//! Deterministic turn-based combat rules.
//!
//! `combat-core` resolves encounters between one player and a room of
//! enemies: initiative, intents, actions, damage and status effects. It
//! performs no I/O. Static data arrives through the oracle traits in
//! [`env`], randomness through an injected [`RngOracle`], and player
//! decisions through [`PlayerInput`]. Everything that happens is appended to
//! an [`EventLog`].
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod encounter;
pub mod env;
pub mod error;
pub mod state;
pub mod status;

pub use action::{Action, ActionKind, DefaultItemUse, ItemUse, ResolveContext, resolve_action};
pub use ai::{BehaviorWeights, decide_enemy_action, plan_intent};
pub use combat::{
    ApplyResult, AttackerSnapshot, DamageDef, DamageFormula, DamageOutcome, EffectReport, Outcome,
    OutcomeKind, StatusFeedback, calculate_damage, resolve_damage,
};
pub use config::CombatConfig;
pub use encounter::{
    CombatEvent, Encounter, EncounterResult, EncounterView, EventLog, PlayerChoice, PlayerInput,
    ResultKind, Room,
};
pub use env::{
    Env, ItemDefinition, ItemEffect, ItemOracle, ItemSlot, ItemTable, PcgRng, Registries,
    RngOracle, ScriptedRng, Skill, SkillOracle, SkillTable, StatusOracle, StatusRule, StatusTable,
    TargetKind,
};
pub use error::{ErrorSeverity, FailReason, GameError, RegistryError};
pub use state::{
    Actor, ActorId, ActorKind, Affinity, BaseStats, Behavior, EnemyProfile, Intent, IntentKind,
    Magnitude, Rarity, Roster, Stat, StatusInstance, StatusRequest,
};
