//! Combat resolution primitives.
//!
//! Pure damage math plus the outcome types every action produces.
//!
//! # Architecture
//!
//! - **Snapshot in, numbers out**: [`calculate_damage`] never touches an actor
//! - **Single mutation point**: [`resolve_damage`] applies the roll to the defender
//! - **Injected randomness**: crit rolls come from the caller's [`crate::env::RngOracle`]

pub mod damage;
pub mod outcome;

pub use damage::{
    AttackerSnapshot, DamageDef, DamageFormula, DamageOutcome, DamageRoll, ScalingStat,
    block_ratio, calculate_damage, resolve_damage,
};
pub use outcome::{
    ApplyResult, EffectReport, Hit, Outcome, OutcomeKind, StatusFeedback,
};
