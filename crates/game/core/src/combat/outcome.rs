//! Structured results of resolved actions.
//!
//! An [`Outcome`] is what a renderer turns into text. Failures are data here,
//! never errors: a rejected skill is an outcome with kind
//! [`OutcomeKind::SkillFail`] and a [`FailReason`].

use crate::combat::DamageOutcome;
use crate::error::FailReason;
use crate::state::{ActorId, Affinity};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OutcomeKind {
    Attack,
    Skill,
    SkillFail,
    Item,
    ItemFail,
    Defend,
    Flee,
    Wait,
    /// Dead actor or nothing to act on.
    Noop,
}

/// Result of one status application attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ApplyResult {
    /// New instance appended.
    Added,
    /// Replace policy swapped the instance.
    Replaced,
    /// Refresh policy: stronger magnitude took over.
    Refreshed,
    /// Refresh policy: equal magnitude, duration extended.
    Extended,
    Stacked,
    /// Refresh policy: weaker magnitude ignored.
    Unchanged,
    Immune,
    Resisted,
    Missed,
    /// No registry entry.
    Unknown,
}

impl ApplyResult {
    /// Whether the status is now present because of this application.
    pub fn landed(&self) -> bool {
        matches!(
            self,
            ApplyResult::Added
                | ApplyResult::Replaced
                | ApplyResult::Refreshed
                | ApplyResult::Extended
                | ApplyResult::Stacked
        )
    }
}

/// User-facing record of a status application.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFeedback {
    pub status: String,
    pub result: ApplyResult,
    pub affinity: Affinity,
}

/// Damage (and follow-up status) landing on one target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    pub target: ActorId,
    pub damage: DamageOutcome,
    pub status: Option<StatusFeedback>,
}

/// Non-damage consequence of a skill effect, item or trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "effect", rename_all = "snake_case"))]
pub enum EffectReport {
    Healed { target: ActorId, amount: i32 },
    Damaged { target: ActorId, amount: i32, died: bool },
    ResourceRestored { target: ActorId, amount: i32 },
    Status { target: ActorId, feedback: StatusFeedback },
    StatusRemoved { target: ActorId, status: String },
    Cleansed { target: ActorId, removed: Vec<String> },
}

impl EffectReport {
    /// Whether the effect changed anything.
    pub fn changed_state(&self) -> bool {
        match self {
            EffectReport::Healed { amount, .. }
            | EffectReport::Damaged { amount, .. }
            | EffectReport::ResourceRestored { amount, .. } => *amount > 0,
            EffectReport::Status { feedback, .. } => feedback.result.landed(),
            EffectReport::StatusRemoved { .. } => true,
            EffectReport::Cleansed { removed, .. } => !removed.is_empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub actor: ActorId,
    pub target: Option<ActorId>,
    pub skill: Option<String>,
    pub item: Option<String>,
    pub hits: Vec<Hit>,
    pub effects: Vec<EffectReport>,
    pub missed: bool,
    /// Set for flee attempts.
    pub escaped: Option<bool>,
    pub escape_chance: Option<f64>,
    pub reason: Option<FailReason>,
    pub wait_reason: Option<String>,
}

impl Outcome {
    pub fn new(kind: OutcomeKind, actor: ActorId) -> Self {
        Self {
            kind,
            actor,
            target: None,
            skill: None,
            item: None,
            hits: Vec::new(),
            effects: Vec::new(),
            missed: false,
            escaped: None,
            escape_chance: None,
            reason: None,
            wait_reason: None,
        }
    }

    pub fn noop(actor: ActorId, reason: FailReason) -> Self {
        Self::new(OutcomeKind::Noop, actor).with_reason(reason)
    }

    pub fn wait(actor: ActorId, reason: impl Into<String>) -> Self {
        let mut outcome = Self::new(OutcomeKind::Wait, actor);
        outcome.wait_reason = Some(reason.into());
        outcome
    }

    pub fn skill_fail(actor: ActorId, skill: &str, reason: FailReason) -> Self {
        let mut outcome = Self::new(OutcomeKind::SkillFail, actor).with_reason(reason);
        outcome.skill = Some(skill.to_string());
        outcome
    }

    pub fn item_fail(actor: ActorId, item: &str, reason: FailReason) -> Self {
        let mut outcome = Self::new(OutcomeKind::ItemFail, actor).with_reason(reason);
        outcome.item = Some(item.to_string());
        outcome
    }

    pub fn with_reason(mut self, reason: FailReason) -> Self {
        self.reason = Some(reason);
        self
    }

    pub fn with_target(mut self, target: Option<ActorId>) -> Self {
        self.target = target;
        self
    }

    /// Damage dealt by the first hit, if any.
    pub fn damage(&self) -> i32 {
        self.hits.first().map_or(0, |hit| hit.damage.damage)
    }

    pub fn total_damage(&self) -> i32 {
        self.hits.iter().map(|hit| hit.damage.damage).sum()
    }

    pub fn killed_any(&self) -> bool {
        self.hits.iter().any(|hit| hit.damage.died)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.kind, OutcomeKind::SkillFail | OutcomeKind::ItemFail)
    }

    pub fn escaped(&self) -> bool {
        self.escaped == Some(true)
    }
}
