//! Item-use pipeline.
//!
//! The resolver delegates item actions to an [`ItemUse`] implementation and
//! forwards its [`Outcome`] unmodified. [`DefaultItemUse`] consumes one unit
//! from the user's inventory and applies the item's `use_effects`.

use crate::action::resolver::ResolveContext;
use crate::combat::{EffectReport, Outcome, OutcomeKind};
use crate::encounter::CombatEvent;
use crate::env::ItemEffect;
use crate::error::FailReason;
use crate::state::{ActorId, StatusRequest};

/// Pluggable item-use pipeline.
pub trait ItemUse {
    fn use_item(
        &self,
        ctx: &mut ResolveContext<'_, '_>,
        user: ActorId,
        item: &str,
        target: Option<ActorId>,
    ) -> Outcome;
}

/// Consumes one unit and applies `use_effects` to the chosen target (the user
/// when none is given). Nothing is consumed when no effect changes state.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultItemUse;

impl ItemUse for DefaultItemUse {
    fn use_item(
        &self,
        ctx: &mut ResolveContext<'_, '_>,
        user: ActorId,
        item: &str,
        target: Option<ActorId>,
    ) -> Outcome {
        let Some(actor) = ctx.roster.get(user) else {
            return Outcome::noop(user, FailReason::InvalidTarget);
        };
        if !actor.is_alive() {
            return Outcome::noop(user, FailReason::ActorDead);
        }
        let Some(definition) = actor.inventory.get(item).cloned() else {
            return Outcome::item_fail(user, item, FailReason::MissingItem);
        };
        if definition.use_effects.is_empty() {
            return Outcome::item_fail(user, item, FailReason::NoEffect);
        }

        let offensive = definition
            .use_effects
            .iter()
            .any(|effect| matches!(effect, ItemEffect::Damage { .. }));
        let target = target
            .filter(|id| ctx.roster.is_alive(*id))
            .or_else(|| {
                offensive
                    .then(|| ctx.roster.opponents_of(user).first().copied())
                    .flatten()
            })
            .unwrap_or(user);

        let source = definition.name.clone();
        let effects: Vec<EffectReport> = definition
            .use_effects
            .iter()
            .filter_map(|effect| apply_item_effect(effect, target, &source, ctx))
            .collect();

        if !effects.iter().any(EffectReport::changed_state) {
            let mut outcome = Outcome::item_fail(user, item, FailReason::NoEffect);
            outcome.target = Some(target);
            outcome.effects = effects;
            return outcome;
        }

        if let Some(actor) = ctx.roster.get_mut(user) {
            actor.inventory.take_one(item);
        }
        tracing::debug!(target: "combat::item", item, %target, "item used");

        let mut outcome = Outcome::new(OutcomeKind::Item, user).with_target(Some(target));
        outcome.item = Some(item.to_string());
        outcome.effects = effects;
        outcome
    }
}

/// Applies one item effect to `target`. Used by item use and on-turn triggers.
pub fn apply_item_effect(
    effect: &ItemEffect,
    target: ActorId,
    source: &str,
    ctx: &mut ResolveContext<'_, '_>,
) -> Option<EffectReport> {
    let env = ctx.env;
    let actor = ctx.roster.get_mut(target)?;
    let report = match effect {
        ItemEffect::Heal { amount } => EffectReport::Healed {
            target,
            amount: actor.heal(*amount),
        },
        ItemEffect::Damage { amount } => {
            let dealt = actor.take_damage(*amount);
            let died = dealt > 0 && !actor.is_alive();
            if died {
                ctx.log.push(CombatEvent::ActorDied {
                    actor: actor.name.clone(),
                });
            }
            EffectReport::Damaged {
                target,
                amount: dealt,
                died,
            }
        }
        ItemEffect::RestoreResource { amount } => EffectReport::ResourceRestored {
            target,
            amount: actor.resource.restore(*amount),
        },
        ItemEffect::ApplyStatus {
            status,
            duration,
            magnitude,
            expires_end_of_turn,
        } => {
            let mut request = StatusRequest::new(status.clone(), source);
            request.duration = *duration;
            request.expires_end_of_turn = *expires_end_of_turn;
            if let Some(spec) = magnitude {
                request.magnitude = spec.resolve(env.status_rule(status));
            }
            let feedback = actor.apply_status(request, &env, &mut *ctx.rng, ctx.log);
            EffectReport::Status { target, feedback }
        }
        ItemEffect::RemoveStatus { status } => {
            if !actor.remove_status(status, ctx.log) {
                return None;
            }
            EffectReport::StatusRemoved {
                target,
                status: status.clone(),
            }
        }
        ItemEffect::Cleanse { except } => EffectReport::Cleansed {
            target,
            removed: actor.cleanse_debuffs(except, &env, ctx.log),
        },
    };
    Some(report)
}
