//! Action domain.
//!
//! An [`Action`] is ephemeral: one per actor-turn, produced by player input or
//! the intent planner and consumed by [`resolve_action`].
//!
//! # Module Structure
//!
//! - `resolver`: dispatch by action kind into damage and status operations
//! - `flee`: escape probability
//! - `items`: the item-use pipeline and shared item-effect application

pub mod flee;
pub mod items;
pub mod resolver;

pub use flee::escape_chance;
pub use items::{DefaultItemUse, ItemUse, apply_item_effect};
pub use resolver::{ResolveContext, resolve_action};

use crate::state::ActorId;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ActionKind {
    Attack,
    Skill { skill: String },
    Item { item: String },
    Defend,
    Flee,
    Wait { reason: String },
}

impl ActionKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ActionKind::Attack => "attack",
            ActionKind::Skill { .. } => "skill",
            ActionKind::Item { .. } => "item",
            ActionKind::Defend => "defend",
            ActionKind::Flee => "flee",
            ActionKind::Wait { .. } => "wait",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub actor: ActorId,
    pub kind: ActionKind,
    pub target: Option<ActorId>,
}

impl Action {
    pub fn new(actor: ActorId, kind: ActionKind, target: Option<ActorId>) -> Self {
        Self {
            actor,
            kind,
            target,
        }
    }

    pub fn attack(actor: ActorId, target: ActorId) -> Self {
        Self::new(actor, ActionKind::Attack, Some(target))
    }

    pub fn skill(actor: ActorId, skill: impl Into<String>, target: Option<ActorId>) -> Self {
        Self::new(
            actor,
            ActionKind::Skill {
                skill: skill.into(),
            },
            target,
        )
    }

    pub fn item(actor: ActorId, item: impl Into<String>, target: Option<ActorId>) -> Self {
        Self::new(actor, ActionKind::Item { item: item.into() }, target)
    }

    pub fn defend(actor: ActorId) -> Self {
        Self::new(actor, ActionKind::Defend, None)
    }

    pub fn flee(actor: ActorId) -> Self {
        Self::new(actor, ActionKind::Flee, None)
    }

    pub fn wait(actor: ActorId, reason: impl Into<String>) -> Self {
        Self::new(
            actor,
            ActionKind::Wait {
                reason: reason.into(),
            },
            None,
        )
    }
}
