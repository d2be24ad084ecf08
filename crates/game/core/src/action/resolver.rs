//! Action resolution.
//!
//! [`resolve_action`] interprets one [`Action`] against the roster, invoking
//! the damage resolver and the status engine, and appends the resulting
//! [`Outcome`] to the log. It never fails: rejections are outcomes.

use crate::action::flee::escape_chance;
use crate::action::items::ItemUse;
use crate::action::{Action, ActionKind};
use crate::combat::{
    AttackerSnapshot, DamageDef, DamageOutcome, EffectReport, Hit, Outcome, OutcomeKind,
    StatusFeedback, resolve_damage,
};
use crate::encounter::{CombatEvent, EventLog};
use crate::env::{EffectTarget, Env, RngOracle, Skill, SkillEffect, StatusApplication, TargetKind};
use crate::error::FailReason;
use crate::state::{ActorId, ActorKind, Behavior, Roster, StatusRequest};

/// Mutable state and oracles threaded through one resolution.
pub struct ResolveContext<'a, 'r> {
    pub roster: &'r mut Roster,
    pub env: Env<'a>,
    pub rng: &'r mut dyn RngOracle,
    pub log: &'r mut EventLog,
}

impl<'a, 'r> ResolveContext<'a, 'r> {
    pub fn new(
        roster: &'r mut Roster,
        env: Env<'a>,
        rng: &'r mut dyn RngOracle,
        log: &'r mut EventLog,
    ) -> Self {
        Self {
            roster,
            env,
            rng,
            log,
        }
    }

    /// Applies a status to `target`, returning the feedback.
    fn apply(&mut self, target: ActorId, request: StatusRequest) -> Option<StatusFeedback> {
        let env = self.env;
        let actor = self.roster.get_mut(target)?;
        Some(actor.apply_status(request, &env, &mut *self.rng, self.log))
    }

    fn log_death(&mut self, id: ActorId) {
        let actor = self.roster.name(id);
        self.log.push(CombatEvent::ActorDied { actor });
    }
}

/// Resolves an action and logs its outcome.
pub fn resolve_action(
    action: &Action,
    ctx: &mut ResolveContext<'_, '_>,
    item_use: &dyn ItemUse,
) -> Outcome {
    let outcome = if !ctx.roster.is_alive(action.actor) {
        Outcome::noop(action.actor, FailReason::ActorDead)
    } else {
        match &action.kind {
            ActionKind::Attack => resolve_attack(action, ctx),
            ActionKind::Skill { skill } => resolve_skill(action, skill, ctx),
            ActionKind::Item { item } => item_use.use_item(ctx, action.actor, item, action.target),
            ActionKind::Defend => Outcome::new(OutcomeKind::Defend, action.actor),
            ActionKind::Flee => resolve_flee(action, ctx),
            ActionKind::Wait { reason } => Outcome::wait(action.actor, reason.clone()),
        }
    };

    let kind: &'static str = outcome.kind.into();
    tracing::debug!(
        target: "combat::action",
        actor = %action.actor,
        action = action.kind.tag(),
        outcome = kind,
        "action resolved"
    );
    ctx.log.push(CombatEvent::Action {
        actor: ctx.roster.name(action.actor),
        outcome: outcome.clone(),
    });
    outcome
}

/// The requested target when it is a living opponent, else the first one.
fn pick_opponent(roster: &Roster, actor: ActorId, requested: Option<ActorId>) -> Option<ActorId> {
    let opponents = roster.opponents_of(actor);
    requested
        .filter(|id| opponents.contains(id))
        .or_else(|| opponents.first().copied())
}

// ============================================================================
// Attack
// ============================================================================

fn resolve_attack(action: &Action, ctx: &mut ResolveContext<'_, '_>) -> Outcome {
    let Some(target) = pick_opponent(ctx.roster, action.actor, action.target) else {
        return Outcome::noop(action.actor, FailReason::InvalidTarget);
    };
    let Some(attacker) = ctx.roster.get(action.actor) else {
        return Outcome::noop(action.actor, FailReason::InvalidTarget);
    };

    let env = ctx.env;
    let snapshot = AttackerSnapshot::of(attacker, &env);
    let on_hit: Vec<_> = attacker
        .equipment
        .iter()
        .flat_map(|item| item.on_hit.iter().map(move |effect| (item.name.clone(), effect.clone())))
        .collect();

    let damage = resolve_damage(
        &snapshot,
        ctx.roster.get_mut(target),
        Some(&DamageDef::basic_attack()),
        &env,
        &mut *ctx.rng,
    );
    if damage.died {
        ctx.log_death(target);
    }

    let mut outcome = Outcome::new(OutcomeKind::Attack, action.actor).with_target(Some(target));
    let mut hit = Hit {
        target,
        damage,
        status: None,
    };

    if !damage.blocked && damage.damage > 0 {
        for (source, effect) in on_hit {
            if !ctx.rng.chance(effect.chance) {
                continue;
            }
            let recipient = match effect.target {
                EffectTarget::Holder => action.actor,
                EffectTarget::Target => target,
            };
            if !ctx.roster.is_alive(recipient) {
                continue;
            }
            let mut request = StatusRequest::new(effect.status.clone(), source).with_chance(1.0);
            request.duration = effect.duration;
            request.expires_end_of_turn = effect.expires_end_of_turn;
            if let Some(spec) = effect.magnitude {
                request.magnitude = spec.resolve(env.status_rule(&effect.status));
            }
            if let Some(feedback) = ctx.apply(recipient, request) {
                if recipient == target && hit.status.is_none() {
                    hit.status = Some(feedback);
                } else {
                    outcome.effects.push(EffectReport::Status {
                        target: recipient,
                        feedback,
                    });
                }
            }
        }
    }

    outcome.hits.push(hit);
    outcome
}

// ============================================================================
// Skill
// ============================================================================

fn resolve_skill(action: &Action, skill_id: &str, ctx: &mut ResolveContext<'_, '_>) -> Outcome {
    let env = ctx.env;
    let actor_id = action.actor;

    let Some(skill) = env.skill(skill_id) else {
        return Outcome::skill_fail(actor_id, skill_id, FailReason::MissingSkill);
    };
    let Some(actor) = ctx.roster.get(actor_id) else {
        return Outcome::noop(actor_id, FailReason::InvalidTarget);
    };
    if !actor.skills.iter().any(|known| known == skill_id) {
        return Outcome::skill_fail(actor_id, skill_id, FailReason::MissingSkill);
    }
    if actor.cooldown(skill_id) > 0 {
        return Outcome::skill_fail(actor_id, skill_id, FailReason::OnCooldown);
    }

    let targets = skill_targets(skill, actor_id, action.target, ctx);
    if targets.is_empty() {
        return Outcome::skill_fail(actor_id, skill_id, FailReason::InvalidTarget);
    }

    if let Some(cost) = skill.cost {
        let Some(actor) = ctx.roster.get_mut(actor_id) else {
            return Outcome::noop(actor_id, FailReason::InvalidTarget);
        };
        if !actor.resource.spend(cost) {
            return Outcome::skill_fail(actor_id, skill_id, FailReason::NotEnoughResource);
        }
    }

    let mut outcome = Outcome::new(OutcomeKind::Skill, actor_id).with_target(targets.first().copied());
    outcome.skill = Some(skill_id.to_string());

    run_skill_effects(skill, actor_id, ctx, &mut outcome);

    if !ctx.rng.chance(skill.hit_chance) {
        outcome.missed = true;
        start_cooldown(skill, actor_id, ctx);
        return outcome;
    }

    // Frozen after pre-hit effects so self-buffs count.
    let snapshot = match ctx.roster.get(actor_id) {
        Some(actor) => AttackerSnapshot::of(actor, &env),
        None => return outcome,
    };

    for target in targets {
        let damage = match skill.damage {
            Some(def) => resolve_damage(
                &snapshot,
                ctx.roster.get_mut(target),
                Some(&def),
                &env,
                &mut *ctx.rng,
            ),
            None => DamageOutcome::default(),
        };
        if damage.died {
            ctx.log_death(target);
        }

        let mut hit = Hit {
            target,
            damage,
            status: None,
        };

        let eligible = target == actor_id || ctx.roster.is_alive(target);
        if !damage.blocked
            && eligible
            && let Some(application) = &skill.apply_status
        {
            let request = status_request(application, &skill.name, &env);
            hit.status = ctx.apply(target, request);
        }
        outcome.hits.push(hit);
    }

    start_cooldown(skill, actor_id, ctx);
    outcome
}

fn skill_targets(
    skill: &Skill,
    actor: ActorId,
    requested: Option<ActorId>,
    ctx: &mut ResolveContext<'_, '_>,
) -> Vec<ActorId> {
    match skill.target {
        TargetKind::Caster => vec![actor],
        TargetKind::Enemy => {
            let opponents = ctx.roster.opponents_of(actor);
            let chosen = match requested {
                Some(id) if opponents.contains(&id) => Some(id),
                Some(id) if !skill.requires_target_alive && ctx.roster.get(id).is_some() => {
                    Some(id)
                }
                _ => opponents.first().copied(),
            };
            chosen.into_iter().collect()
        }
        TargetKind::AllEnemies => ctx.roster.opponents_of(actor),
        TargetKind::RandomEnemy => {
            let opponents = ctx.roster.opponents_of(actor);
            if opponents.is_empty() {
                return opponents;
            }
            let index = ctx.rng.index(opponents.len());
            vec![opponents[index]]
        }
    }
}

fn run_skill_effects(
    skill: &Skill,
    actor_id: ActorId,
    ctx: &mut ResolveContext<'_, '_>,
    outcome: &mut Outcome,
) {
    let env = ctx.env;
    for effect in &skill.effects {
        match effect {
            SkillEffect::Cleanse { except } => {
                let Some(actor) = ctx.roster.get_mut(actor_id) else {
                    continue;
                };
                let removed = actor.cleanse_debuffs(except, &env, ctx.log);
                outcome.effects.push(EffectReport::Cleansed {
                    target: actor_id,
                    removed,
                });
            }
            SkillEffect::ApplyStatus(application) => {
                let request = status_request(application, &skill.name, &env);
                if let Some(feedback) = ctx.apply(actor_id, request) {
                    outcome.effects.push(EffectReport::Status {
                        target: actor_id,
                        feedback,
                    });
                }
            }
        }
    }
}

fn status_request(application: &StatusApplication, source: &str, env: &Env<'_>) -> StatusRequest {
    let mut request = StatusRequest::new(application.status.clone(), source);
    request.duration = application.duration;
    request.chance = application.chance;
    request.magnitude = application.magnitude(env.statuses());
    request.expires_end_of_turn = application.expires_end_of_turn;
    request
}

fn start_cooldown(skill: &Skill, actor_id: ActorId, ctx: &mut ResolveContext<'_, '_>) {
    let Some(turns) = skill.cooldown_turns else {
        return;
    };
    if let Some(actor) = ctx.roster.get_mut(actor_id)
        && actor.kind == ActorKind::Enemy
    {
        actor.start_cooldown(&skill.id, turns);
    }
}

// ============================================================================
// Flee
// ============================================================================

fn resolve_flee(action: &Action, ctx: &mut ResolveContext<'_, '_>) -> Outcome {
    let rules = ctx.env.config().flee;
    let behaviors: Vec<Behavior> = ctx
        .roster
        .living_enemy_ids()
        .into_iter()
        .filter_map(|id| ctx.roster.get(id))
        .map(|enemy| enemy.profile.as_ref().map(|p| p.behavior).unwrap_or_default())
        .collect();

    let noise = ctx.rng.range_f64(-rules.noise, rules.noise);
    let chance = escape_chance(&behaviors, noise, &rules);
    let escaped = ctx.rng.chance(chance);

    tracing::debug!(target: "combat::action", chance, escaped, "flee attempt");

    let mut outcome = Outcome::new(OutcomeKind::Flee, action.actor);
    outcome.escape_chance = Some(chance);
    outcome.escaped = Some(escaped);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::DefaultItemUse;
    use crate::combat::ApplyResult;
    use crate::config::CombatConfig;
    use crate::env::{
        ItemDefinition, ItemEffect, ItemSlot, ItemTable, OnHitEffect, Registries, ScriptedRng,
        SkillTable, StatusRule, StatusTable,
    };
    use crate::state::{Actor, BaseStats, EnemyProfile};

    fn registries() -> Registries {
        let statuses = StatusTable::from_rules([
            StatusRule::new("poison").debuff(),
            StatusRule::new("stun").debuff().preventing_action(),
        ])
        .unwrap();
        let skills = SkillTable::from_skills([
            Skill::new("fireball", TargetKind::Enemy)
                .with_damage(DamageDef::flat(12))
                .with_cost(10),
            Skill::new("bash", TargetKind::Enemy)
                .with_damage(DamageDef::multiplier(1.0))
                .with_hit_chance(0.5)
                .with_status(StatusApplication::new("stun").with_duration(1))
                .with_cooldown(2),
        ]);
        Registries::new(statuses, skills, ItemTable::new())
    }

    fn roster() -> Roster {
        let player = Actor::player("hero", BaseStats::new(30, 10, 2))
            .with_resource(15)
            .with_skills(["fireball"]);
        let enemy = Actor::enemy("goblin", BaseStats::new(20, 4, 3), EnemyProfile::default())
            .with_skills(["bash"]);
        Roster::new(player, [enemy])
    }

    fn resolve(roster: &mut Roster, registries: &Registries, rng: f64, action: Action) -> Outcome {
        let config = CombatConfig::default();
        let env = registries.env(&config);
        let mut rng = ScriptedRng::constant(rng);
        let mut log = EventLog::new();
        let mut ctx = ResolveContext::new(roster, env, &mut rng, &mut log);
        resolve_action(&action, &mut ctx, &DefaultItemUse)
    }

    #[test]
    fn attack_subtracts_effective_defence() {
        let registries = registries();
        let mut roster = roster();
        let outcome = resolve(
            &mut roster,
            &registries,
            0.0,
            Action::attack(ActorId::PLAYER, ActorId(1)),
        );
        assert_eq!(outcome.kind, OutcomeKind::Attack);
        assert_eq!(outcome.damage(), 7);
        assert_eq!(roster.get(ActorId(1)).unwrap().hp(), 13);
    }

    #[test]
    fn skill_costs_are_checked_then_paid() {
        let registries = registries();
        let mut roster = roster();
        let cast = Action::skill(ActorId::PLAYER, "fireball", Some(ActorId(1)));

        let outcome = resolve(&mut roster, &registries, 0.0, cast.clone());
        assert_eq!(outcome.kind, OutcomeKind::Skill);
        assert_eq!(outcome.damage(), 9);
        assert_eq!(roster.player().resource.current(), 5);

        let outcome = resolve(&mut roster, &registries, 0.0, cast);
        assert_eq!(outcome.kind, OutcomeKind::SkillFail);
        assert_eq!(outcome.reason, Some(FailReason::NotEnoughResource));
        assert_eq!(roster.player().resource.current(), 5);
    }

    #[test]
    fn unknown_skill_fails() {
        let registries = registries();
        let mut roster = roster();
        let outcome = resolve(
            &mut roster,
            &registries,
            0.0,
            Action::skill(ActorId::PLAYER, "bash", Some(ActorId(1))),
        );
        assert_eq!(outcome.reason, Some(FailReason::MissingSkill));

        let outcome = resolve(
            &mut roster,
            &registries,
            0.0,
            Action::skill(ActorId::PLAYER, "meteor", None),
        );
        assert_eq!(outcome.kind, OutcomeKind::SkillFail);
        assert_eq!(outcome.reason, Some(FailReason::MissingSkill));
    }

    #[test]
    fn enemy_miss_still_starts_cooldown() {
        let registries = registries();
        let mut roster = roster();
        let outcome = resolve(
            &mut roster,
            &registries,
            0.9,
            Action::skill(ActorId(1), "bash", Some(ActorId::PLAYER)),
        );
        assert!(outcome.missed);
        assert!(outcome.hits.is_empty());
        assert_eq!(roster.get(ActorId(1)).unwrap().cooldown("bash"), 2);

        let outcome = resolve(
            &mut roster,
            &registries,
            0.0,
            Action::skill(ActorId(1), "bash", Some(ActorId::PLAYER)),
        );
        assert_eq!(outcome.reason, Some(FailReason::OnCooldown));
    }

    #[test]
    fn landed_skill_applies_its_status() {
        let registries = registries();
        let mut roster = roster();
        let outcome = resolve(
            &mut roster,
            &registries,
            0.0,
            Action::skill(ActorId(1), "bash", Some(ActorId::PLAYER)),
        );
        // raw 4 vs defence 2
        assert_eq!(outcome.damage(), 2);
        let feedback = outcome.hits[0].status.as_ref().unwrap();
        assert_eq!(feedback.result, ApplyResult::Added);
        assert!(roster.player().has_status("stun"));
    }

    #[test]
    fn on_hit_effects_follow_unblocked_attacks() {
        let registries = registries();
        let mut roster = roster();
        let dagger = ItemDefinition::new("venom_dagger", ItemSlot::Weapon).with_on_hit(OnHitEffect {
            status: "poison".into(),
            chance: 1.0,
            duration: Some(2),
            magnitude: None,
            target: EffectTarget::Target,
            expires_end_of_turn: false,
        });
        roster.player_mut().equipment.equip(dagger).unwrap();

        let outcome = resolve(
            &mut roster,
            &registries,
            0.0,
            Action::attack(ActorId::PLAYER, ActorId(1)),
        );
        assert_eq!(outcome.hits[0].status.as_ref().unwrap().status, "poison");
        let poison = roster.get(ActorId(1)).unwrap().status("poison").unwrap();
        assert_eq!(poison.remaining_turns, 2);
    }

    #[test]
    fn items_are_consumed_only_when_they_do_something() {
        let registries = registries();
        let mut roster = roster();
        let potion = ItemDefinition::new("potion", ItemSlot::Consumable)
            .with_use(ItemEffect::Heal { amount: 10 });
        roster.player_mut().inventory.add(potion, 2);

        let outcome = resolve(
            &mut roster,
            &registries,
            0.0,
            Action::item(ActorId::PLAYER, "potion", None),
        );
        assert_eq!(outcome.kind, OutcomeKind::ItemFail);
        assert_eq!(outcome.reason, Some(FailReason::NoEffect));
        assert_eq!(roster.player().inventory.count("potion"), 2);

        roster.player_mut().take_damage(15);
        let outcome = resolve(
            &mut roster,
            &registries,
            0.0,
            Action::item(ActorId::PLAYER, "potion", None),
        );
        assert_eq!(outcome.kind, OutcomeKind::Item);
        assert_eq!(roster.player().hp(), 25);
        assert_eq!(roster.player().inventory.count("potion"), 1);

        let outcome = resolve(
            &mut roster,
            &registries,
            0.0,
            Action::item(ActorId::PLAYER, "elixir", None),
        );
        assert_eq!(outcome.reason, Some(FailReason::MissingItem));
    }

    #[test]
    fn flee_uses_noise_then_rolls() {
        let registries = registries();
        let mut roster = roster();
        let outcome = resolve(&mut roster, &registries, 0.0, Action::flee(ActorId::PLAYER));
        assert!(outcome.escaped());
        assert!((outcome.escape_chance.unwrap() - 0.58).abs() < 1e-9);
    }

    #[test]
    fn dead_actors_do_nothing() {
        let registries = registries();
        let mut roster = roster();
        roster.get_mut(ActorId(1)).unwrap().take_damage(99);
        let outcome = resolve(
            &mut roster,
            &registries,
            0.0,
            Action::attack(ActorId(1), ActorId::PLAYER),
        );
        assert_eq!(outcome.kind, OutcomeKind::Noop);
        assert_eq!(outcome.reason, Some(FailReason::ActorDead));
    }
}
