//! Enemy intent planning and execution.
//!
//! Planning happens once per round for every living enemy, before anyone
//! acts, so the player always sees a one-round-ahead telegraph. Execution
//! ([`decide_enemy_action`]) turns the published intent into an [`Action`]
//! when the enemy's turn comes.

use crate::action::Action;
use crate::ai::weights::BehaviorWeights;
use crate::encounter::{CombatEvent, EventLog};
use crate::env::{Env, ForcedAction, RngOracle, Skill, TargetKind};
use crate::state::{Actor, ActorId, Intent, LockedState, Roster};

/// Skills an enemy may pick this round against `player`.
///
/// Filters out skills on cooldown, skills barred while channeling, skills
/// whose target is dead, skills whose forbid-list status is already on the
/// target, and skills the enemy cannot pay for.
pub fn available_skills<'a>(enemy: &Actor, player: &Actor, env: &Env<'a>) -> Vec<&'a Skill> {
    enemy
        .skills
        .iter()
        .filter_map(|id| env.skill(id))
        .filter(|skill| enemy.cooldown(&skill.id) == 0)
        .filter(|skill| !enemy.is_locked() || skill.allowed_while_locked)
        .filter(|skill| {
            let target = match skill.target {
                TargetKind::Caster => enemy,
                _ => player,
            };
            if skill.requires_target_alive && !target.is_alive() {
                return false;
            }
            !skill
                .forbid_if_target_has
                .iter()
                .any(|status| target.has_status(status))
        })
        .filter(|skill| skill.cost.is_none_or(|cost| enemy.resource.current() >= cost))
        .collect()
}

/// Drops a lock whose timer already ran out.
pub fn prune_lock(roster: &mut Roster, enemy: ActorId, log: &mut EventLog) {
    let Some(actor) = roster.get_mut(enemy) else {
        return;
    };
    let Some(profile) = actor.profile.as_mut() else {
        return;
    };
    if profile
        .locked
        .as_ref()
        .is_some_and(|lock| lock.turns_remaining == 0)
        && let Some(lock) = profile.locked.take()
    {
        log.push(CombatEvent::LockCleared {
            actor: actor.name.clone(),
            skill: lock.skill,
        });
    }
}

/// Counts down the channel of an enemy that cannot act this turn.
///
/// The timer keeps running while the enemy is blocked; a channel that runs
/// out this way never fires and is dropped by [`prune_lock`] next round.
pub fn stall_lock(roster: &mut Roster, enemy: ActorId) {
    if let Some(lock) = roster
        .get_mut(enemy)
        .and_then(|actor| actor.profile.as_mut())
        .and_then(|profile| profile.locked.as_mut())
    {
        lock.turns_remaining = lock.turns_remaining.saturating_sub(1);
    }
}

/// Chooses and publishes the next intent for one enemy.
///
/// A locked enemy re-publishes its channel. Otherwise a skill is drawn by
/// behavior weight; a skill with `locks_actor` starts the channel right away.
pub fn plan_intent(
    roster: &mut Roster,
    enemy: ActorId,
    env: &Env<'_>,
    rng: &mut dyn RngOracle,
    log: &mut EventLog,
) -> Option<Intent> {
    let player = roster.player().clone();
    let actor = roster.get_mut(enemy)?;
    if !actor.is_alive() {
        return None;
    }

    let behavior = actor.profile.as_ref()?.behavior;
    let locked = actor.profile.as_ref().and_then(|p| p.locked.clone());

    let (intent, lock) = match locked {
        Some(lock) => {
            let hint = env.skill(&lock.skill).and_then(|s| s.intent_hint.clone());
            (Intent::charging(&lock, hint), None)
        }
        None => {
            let candidates = available_skills(actor, &player, env);
            let weights = BehaviorWeights::for_behavior(behavior);
            let scores: Vec<f64> = candidates.iter().map(|s| weights.skill_weight(s)).collect();

            tracing::debug!(
                target: "combat::ai",
                enemy = %actor.name,
                candidates = candidates.len(),
                "planning intent"
            );

            match rng.weighted_index(&scores).map(|index| candidates[index]) {
                None => (Intent::attack(), None),
                Some(skill) => match &skill.locks_actor {
                    Some(spec) if spec.turns > 0 => {
                        let lock = LockedState {
                            skill: skill.id.clone(),
                            label: spec.label.clone(),
                            turns_remaining: spec.turns,
                            forced_action: spec.forced_action,
                        };
                        (Intent::charging(&lock, skill.intent_hint.clone()), Some(lock))
                    }
                    _ => (Intent::skill(skill.id.clone(), skill.intent_hint.clone()), None),
                },
            }
        }
    };

    let profile = actor.profile.as_mut()?;
    if let Some(lock) = lock {
        profile.locked = Some(lock);
    }
    profile.intent = Some(intent.clone());

    log.push(CombatEvent::IntentPublished {
        actor: actor.name.clone(),
        intent: intent.clone(),
    });
    Some(intent)
}

/// Turns the enemy's lock or published intent into this turn's action.
///
/// A locked enemy counts its channel down: while turns remain it performs the
/// forced action (or waits); when the timer elapses the channeled skill fires
/// and the lock clears.
pub fn decide_enemy_action(roster: &mut Roster, enemy: ActorId, env: &Env<'_>) -> Action {
    let Some(profile) = roster.get_mut(enemy).and_then(|a| a.profile.as_mut()) else {
        return Action::attack(enemy, ActorId::PLAYER);
    };

    if let Some(lock) = profile.locked.as_mut() {
        lock.turns_remaining = lock.turns_remaining.saturating_sub(1);
        if lock.turns_remaining > 0 {
            return match lock.forced_action {
                Some(ForcedAction::Defend) => Action::defend(enemy),
                Some(ForcedAction::Attack) => Action::attack(enemy, ActorId::PLAYER),
                None => Action::wait(enemy, lock.label.clone()),
            };
        }
        let skill = lock.skill.clone();
        profile.locked = None;
        profile.intent = None;
        return Action::skill(enemy, skill.clone(), skill_target(env, &skill, enemy));
    }

    match profile.intent.take() {
        Some(Intent {
            skill: Some(skill), ..
        }) => {
            let target = skill_target(env, &skill, enemy);
            Action::skill(enemy, skill, target)
        }
        _ => Action::attack(enemy, ActorId::PLAYER),
    }
}

fn skill_target(env: &Env<'_>, skill: &str, enemy: ActorId) -> Option<ActorId> {
    match env.skill(skill).map(|s| s.target) {
        Some(TargetKind::Caster) => Some(enemy),
        _ => Some(ActorId::PLAYER),
    }
}
