//! Append-only event log.
//!
//! The log is the encounter's narratable output: every record carries a tag,
//! the actor names involved and the affected quantities. It is separate from
//! `tracing` diagnostics and is meant to be serialised for renderers.

use crate::combat::{ApplyResult, EffectReport, Outcome};
use crate::encounter::result::ResultKind;
use crate::error::FailReason;
use crate::state::{Intent, Magnitude};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum CombatEvent {
    EncounterStarted {
        room: String,
        enemies: Vec<String>,
    },
    RoundStarted {
        round: u32,
    },
    IntentPublished {
        actor: String,
        intent: Intent,
    },
    /// A lock with no turns left was dropped before planning.
    LockCleared {
        actor: String,
        skill: String,
    },

    // ===== statuses =====
    StatusApplied {
        target: String,
        status: String,
        result: ApplyResult,
        remaining_turns: i32,
        magnitude: Magnitude,
        source: String,
    },
    StatusImmune {
        target: String,
        status: String,
    },
    StatusResisted {
        target: String,
        status: String,
        resistance: f64,
    },
    StatusMissed {
        target: String,
        status: String,
        chance: f64,
    },
    StatusTick {
        actor: String,
        status: String,
        magnitude: f64,
        /// Co-present status whose interaction modulated this tick.
        interaction: Option<String>,
        hp_before: i32,
        hp_after: i32,
    },
    StatusExpired {
        actor: String,
        status: String,
    },
    StatusRemoved {
        actor: String,
        status: String,
    },
    LockInterrupted {
        actor: String,
        status: String,
        skill: String,
    },
    InterruptResisted {
        actor: String,
        status: String,
        resistance: f64,
    },

    // ===== turns =====
    ItemTriggered {
        actor: String,
        item: String,
        effect: EffectReport,
    },
    Inspected {
        target: String,
        hp: i32,
        max_hp: i32,
        damage: i32,
        defence: i32,
        statuses: Vec<String>,
        intent: Option<Intent>,
    },
    ChoiceRejected {
        actor: String,
        reason: FailReason,
    },
    TurnForfeited {
        actor: String,
    },
    Action {
        actor: String,
        outcome: Outcome,
    },
    Regenerated {
        actor: String,
        amount: i32,
    },
    ActorDied {
        actor: String,
    },

    // ===== rewards =====
    LootDropped {
        item: String,
    },
    Rewarded {
        xp: u32,
        gold: u32,
    },
    LevelUp {
        level: u32,
        hp_gain: i32,
    },
    ResourceRestored {
        actor: String,
        amount: i32,
    },
    EncounterEnded {
        result: ResultKind,
        rounds: u32,
    },
}

impl CombatEvent {
    /// Snake_case tag of the record.
    pub fn tag(&self) -> &'static str {
        match self {
            CombatEvent::EncounterStarted { .. } => "encounter_started",
            CombatEvent::RoundStarted { .. } => "round_started",
            CombatEvent::IntentPublished { .. } => "intent_published",
            CombatEvent::LockCleared { .. } => "lock_cleared",
            CombatEvent::StatusApplied { .. } => "status_applied",
            CombatEvent::StatusImmune { .. } => "status_immune",
            CombatEvent::StatusResisted { .. } => "status_resisted",
            CombatEvent::StatusMissed { .. } => "status_missed",
            CombatEvent::StatusTick { .. } => "status_tick",
            CombatEvent::StatusExpired { .. } => "status_expired",
            CombatEvent::StatusRemoved { .. } => "status_removed",
            CombatEvent::LockInterrupted { .. } => "lock_interrupted",
            CombatEvent::InterruptResisted { .. } => "interrupt_resisted",
            CombatEvent::ItemTriggered { .. } => "item_triggered",
            CombatEvent::Inspected { .. } => "inspected",
            CombatEvent::ChoiceRejected { .. } => "choice_rejected",
            CombatEvent::TurnForfeited { .. } => "turn_forfeited",
            CombatEvent::Action { .. } => "action",
            CombatEvent::Regenerated { .. } => "regenerated",
            CombatEvent::ActorDied { .. } => "actor_died",
            CombatEvent::LootDropped { .. } => "loot_dropped",
            CombatEvent::Rewarded { .. } => "rewarded",
            CombatEvent::LevelUp { .. } => "level_up",
            CombatEvent::ResourceRestored { .. } => "resource_restored",
            CombatEvent::EncounterEnded { .. } => "encounter_ended",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CombatEvent) {
        tracing::trace!(target: "combat::log", event = event.tag(), "event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&CombatEvent> {
        self.events.last()
    }

    /// Events with the given tag, in order.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a CombatEvent> + 'a {
        self.events.iter().filter(move |event| event.tag() == tag)
    }

    /// Outcomes of resolved actions, in order.
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.events.iter().filter_map(|event| match event {
            CombatEvent::Action { outcome, .. } => Some(outcome),
            _ => None,
        })
    }

    pub fn into_events(self) -> Vec<CombatEvent> {
        self.events
    }
}
