//! Player decision interface.
//!
//! The controller calls [`PlayerInput::choose`] synchronously whenever the
//! player can act. Inspecting and rejected choices do not spend the turn;
//! the controller asks again, up to `max_free_choices` times.

use crate::encounter::log::EventLog;
use crate::env::Env;
use crate::error::FailReason;
use crate::state::{Actor, ActorId, Intent, Roster};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "choice", rename_all = "snake_case"))]
pub enum PlayerChoice {
    /// `None` targets the first living enemy.
    Attack { target: Option<ActorId> },
    Skill { skill: String, target: Option<ActorId> },
    /// `None` targets the player, or the first enemy for damaging items.
    Item { item: String, target: Option<ActorId> },
    Defend,
    /// Free action: logs the target's stats, statuses and intent.
    Inspect { target: ActorId },
    Flee,
}

impl PlayerChoice {
    pub fn attack(target: ActorId) -> Self {
        PlayerChoice::Attack {
            target: Some(target),
        }
    }

    pub fn skill(skill: impl Into<String>, target: Option<ActorId>) -> Self {
        PlayerChoice::Skill {
            skill: skill.into(),
            target,
        }
    }

    pub fn item(item: impl Into<String>, target: Option<ActorId>) -> Self {
        PlayerChoice::Item {
            item: item.into(),
            target,
        }
    }

    /// Whether the choice leaves the turn unspent.
    pub fn is_free(&self) -> bool {
        matches!(self, PlayerChoice::Inspect { .. })
    }
}

/// Read-only snapshot handed to [`PlayerInput::choose`].
#[derive(Clone, Copy)]
pub struct EncounterView<'v> {
    pub round: u32,
    pub roster: &'v Roster,
    pub log: &'v EventLog,
    pub env: Env<'v>,
    /// Why the previous choice this turn was rejected, if it was.
    pub rejection: Option<FailReason>,
}

impl<'v> EncounterView<'v> {
    pub fn player(&self) -> &'v Actor {
        self.roster.player()
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = (ActorId, &'v Actor)> + 'v {
        let roster = self.roster;
        roster
            .living_enemy_ids()
            .into_iter()
            .filter_map(move |id| roster.get(id).map(|actor| (id, actor)))
    }

    /// Published intent of an enemy for the current round.
    pub fn intent_of(&self, id: ActorId) -> Option<&'v Intent> {
        self.roster
            .get(id)
            .and_then(|actor| actor.profile.as_ref())
            .and_then(|profile| profile.intent.as_ref())
    }
}

impl core::fmt::Debug for EncounterView<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EncounterView")
            .field("round", &self.round)
            .field("events", &self.log.len())
            .field("rejection", &self.rejection)
            .finish()
    }
}

/// Source of player decisions.
pub trait PlayerInput {
    fn choose(&mut self, view: &EncounterView<'_>) -> PlayerChoice;
}

impl<F> PlayerInput for F
where
    F: FnMut(&EncounterView<'_>) -> PlayerChoice,
{
    fn choose(&mut self, view: &EncounterView<'_>) -> PlayerChoice {
        self(view)
    }
}
