use crate::action::{
    Action, DefaultItemUse, ItemUse, ResolveContext, apply_item_effect, resolve_action,
};
use crate::ai::{decide_enemy_action, plan_intent, prune_lock, stall_lock};
use crate::combat::{Outcome, OutcomeKind};
use crate::encounter::initiative::initiative_order;
use crate::encounter::input::{EncounterView, PlayerChoice, PlayerInput};
use crate::encounter::log::{CombatEvent, EventLog};
use crate::encounter::result::{EncounterResult, ResultKind};
use crate::encounter::rewards::{Rewards, grant_rewards};
use crate::env::{Env, ItemEffect, RngOracle, TargetKind};
use crate::error::FailReason;
use crate::state::{Actor, ActorId, Roster, StatusRequest};

/// The room an encounter takes place in: a name and its live enemies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Room {
    pub name: String,
    pub enemies: Vec<Actor>,
}

impl Room {
    pub fn new(name: impl Into<String>, enemies: impl IntoIterator<Item = Actor>) -> Self {
        Self {
            name: name.into(),
            enemies: enemies.into_iter().collect(),
        }
    }
}

/// Round-based combat between the player and the enemies of one room.
///
/// Each round: stale locks are pruned, every living enemy publishes an
/// intent, then the player and living enemies act in initiative order. The
/// encounter ends on victory, defeat, a successful flee or, when
/// [`CombatConfig::max_rounds`](crate::CombatConfig::max_rounds) is set, a
/// stalemate.
pub struct Encounter<'a> {
    env: Env<'a>,
    room: String,
    roster: Roster,
    rng: Box<dyn RngOracle + 'a>,
    item_use: Box<dyn ItemUse + 'a>,
    log: EventLog,
    round: u32,
}

impl<'a> Encounter<'a> {
    pub fn new(env: Env<'a>, player: Actor, room: Room, rng: impl RngOracle + 'a) -> Self {
        Self {
            env,
            room: room.name,
            roster: Roster::new(player, room.enemies),
            rng: Box::new(rng),
            item_use: Box::new(DefaultItemUse),
            log: EventLog::new(),
            round: 1,
        }
    }

    /// Replaces the default item-use pipeline.
    pub fn with_item_use(mut self, item_use: impl ItemUse + 'a) -> Self {
        self.item_use = Box::new(item_use);
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Runs the encounter to completion. Returns the result and the final
    /// state of every participant.
    pub fn run(mut self, input: &mut dyn PlayerInput) -> (EncounterResult, Roster) {
        let enemies: Vec<String> = self
            .roster
            .enemies()
            .iter()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.name.clone())
            .collect();
        tracing::info!(
            target: "combat::encounter",
            room = %self.room,
            enemies = enemies.len(),
            "encounter started"
        );
        self.log.push(CombatEvent::EncounterStarted {
            room: self.room.clone(),
            enemies: enemies.clone(),
        });

        let result = if enemies.is_empty() {
            self.finish(ResultKind::NoEnemies)
        } else {
            let kind = self.run_rounds(input);
            self.finish(kind)
        };
        (result, self.roster)
    }

    // ========================================================================
    // Rounds
    // ========================================================================

    fn run_rounds(&mut self, input: &mut dyn PlayerInput) -> ResultKind {
        loop {
            if let Some(max) = self.env.config().max_rounds
                && self.round > max
            {
                return ResultKind::Stalemate;
            }
            if let Some(end) = self.run_round(input) {
                return end;
            }
            self.round += 1;
        }
    }

    fn run_round(&mut self, input: &mut dyn PlayerInput) -> Option<ResultKind> {
        self.log.push(CombatEvent::RoundStarted { round: self.round });

        let enemies = self.roster.living_enemy_ids();
        for &enemy in &enemies {
            prune_lock(&mut self.roster, enemy, &mut self.log);
        }
        for &enemy in &enemies {
            plan_intent(
                &mut self.roster,
                enemy,
                &self.env,
                &mut *self.rng,
                &mut self.log,
            );
        }

        for id in initiative_order(&self.roster, self.env.config()) {
            if let Some(end) = self.take_turn(id, input) {
                return Some(end);
            }
        }
        None
    }

    /// One actor's step. Returns a terminal state if the encounter ended.
    fn take_turn(&mut self, id: ActorId, input: &mut dyn PlayerInput) -> Option<ResultKind> {
        if !self.roster.is_alive(id) {
            return None;
        }
        tracing::debug!(
            target: "combat::turn",
            round = self.round,
            actor = %self.roster.name(id),
            "turn"
        );

        self.run_on_turn_triggers(id);
        self.tick_statuses(id);

        if self.roster.all_enemies_dead() {
            return Some(ResultKind::Victory);
        }
        if !self.roster.is_alive(id) {
            return (!self.roster.is_alive(ActorId::PLAYER)).then_some(ResultKind::Defeat);
        }

        let action = self.obtain_action(id, input);
        let outcome = self.resolve(&action);
        self.after_action(&action, &outcome);
        self.finish_turn(id);

        if outcome.escaped() {
            return Some(ResultKind::Fled);
        }
        if self.roster.all_enemies_dead() {
            return Some(ResultKind::Victory);
        }
        if !self.roster.is_alive(ActorId::PLAYER) {
            return Some(ResultKind::Defeat);
        }
        None
    }

    fn run_on_turn_triggers(&mut self, id: ActorId) {
        let Some(actor) = self.roster.get(id) else {
            return;
        };
        let triggers: Vec<(String, ItemEffect)> = actor
            .equipment
            .iter()
            .flat_map(|item| {
                item.on_turn
                    .iter()
                    .map(move |effect| (item.name.clone(), effect.clone()))
            })
            .collect();
        if triggers.is_empty() {
            return;
        }
        let name = actor.name.clone();

        let mut ctx =
            ResolveContext::new(&mut self.roster, self.env, &mut *self.rng, &mut self.log);
        for (item, effect) in triggers {
            if let Some(report) = apply_item_effect(&effect, id, &item, &mut ctx) {
                ctx.log.push(CombatEvent::ItemTriggered {
                    actor: name.clone(),
                    item,
                    effect: report,
                });
            }
        }
    }

    fn tick_statuses(&mut self, id: ActorId) {
        let env = self.env;
        let Some(actor) = self.roster.get_mut(id) else {
            return;
        };
        let was_alive = actor.is_alive();
        actor.process_statuses(&env, &mut self.log);
        if was_alive && !actor.is_alive() {
            self.log.push(CombatEvent::ActorDied {
                actor: actor.name.clone(),
            });
        }
    }

    fn obtain_action(&mut self, id: ActorId, input: &mut dyn PlayerInput) -> Action {
        let env = self.env;
        let blocking = self
            .roster
            .get(id)
            .and_then(|actor| actor.blocking_status(&env))
            .map(str::to_string);
        if let Some(status) = blocking {
            if !id.is_player() {
                stall_lock(&mut self.roster, id);
            }
            return Action::wait(id, status);
        }

        if id.is_player() {
            self.player_action(input)
        } else {
            decide_enemy_action(&mut self.roster, id, &env)
        }
    }

    fn resolve(&mut self, action: &Action) -> Outcome {
        let mut ctx =
            ResolveContext::new(&mut self.roster, self.env, &mut *self.rng, &mut self.log);
        resolve_action(action, &mut ctx, &*self.item_use)
    }

    /// Defensive status for defenders, resource regeneration for the player.
    fn after_action(&mut self, action: &Action, outcome: &Outcome) {
        let env = self.env;
        let config = env.config();

        if outcome.kind == OutcomeKind::Defend
            && let Some(actor) = self.roster.get_mut(action.actor)
        {
            let request = StatusRequest::new(config.defend_status.clone(), "defend")
                .with_duration(config.defend_duration)
                .with_chance(1.0);
            actor.apply_status(request, &env, &mut *self.rng, &mut self.log);
            actor.settle_status(&config.defend_status);
        }

        if !action.actor.is_player() {
            return;
        }
        let regen = match outcome.kind {
            OutcomeKind::Attack => config.regen.on_attack,
            OutcomeKind::Item => config.regen.on_item,
            OutcomeKind::Defend => config.regen.on_defend,
            _ => 0,
        };
        let player = self.roster.player_mut();
        let amount = player.resource.restore(regen);
        if amount > 0 {
            self.log.push(CombatEvent::Regenerated {
                actor: player.name.clone(),
                amount,
            });
        }
    }

    fn finish_turn(&mut self, id: ActorId) {
        if let Some(actor) = self.roster.get_mut(id) {
            actor.tick_cooldowns();
            actor.strip_end_of_turn(&mut self.log);
        }
    }

    // ========================================================================
    // Player input
    // ========================================================================

    fn player_action(&mut self, input: &mut dyn PlayerInput) -> Action {
        let limit = self.env.config().max_free_choices;
        let mut rejection = None;

        for _ in 0..limit {
            let view = EncounterView {
                round: self.round,
                roster: &self.roster,
                log: &self.log,
                env: self.env,
                rejection,
            };
            let choice = input.choose(&view);

            match self.admit(choice) {
                Ok(Some(action)) => return action,
                Ok(None) => rejection = None,
                Err(reason) => {
                    tracing::debug!(target: "combat::turn", reason = reason.code(), "choice rejected");
                    self.log.push(CombatEvent::ChoiceRejected {
                        actor: self.roster.player().name.clone(),
                        reason,
                    });
                    rejection = Some(reason);
                }
            }
        }

        self.log.push(CombatEvent::TurnForfeited {
            actor: self.roster.player().name.clone(),
        });
        Action::wait(ActorId::PLAYER, "forfeited")
    }

    /// Turns a choice into an action, or handles it as a free action.
    fn admit(&mut self, choice: PlayerChoice) -> Result<Option<Action>, FailReason> {
        let player = ActorId::PLAYER;
        let opponents = self.roster.opponents_of(player);
        let check_target = |target: Option<ActorId>| match target {
            Some(id) if !opponents.contains(&id) => Err(FailReason::InvalidTarget),
            _ => Ok(()),
        };

        let action = match choice {
            PlayerChoice::Attack { target } => {
                check_target(target)?;
                let target = target
                    .or_else(|| opponents.first().copied())
                    .ok_or(FailReason::InvalidTarget)?;
                Action::attack(player, target)
            }
            PlayerChoice::Skill { skill, target } => {
                let known = self.roster.player().skills.contains(&skill);
                let definition = self
                    .env
                    .skill(&skill)
                    .filter(|_| known)
                    .ok_or(FailReason::MissingSkill)?;
                if definition.target == TargetKind::Enemy {
                    check_target(target)?;
                }
                Action::skill(player, skill, target)
            }
            PlayerChoice::Item { item, target } => {
                if self.roster.player().inventory.count(&item) == 0 {
                    return Err(FailReason::MissingItem);
                }
                if let Some(id) = target
                    && !self.roster.is_alive(id)
                {
                    return Err(FailReason::InvalidTarget);
                }
                Action::item(player, item, target)
            }
            PlayerChoice::Defend => Action::defend(player),
            PlayerChoice::Flee => Action::flee(player),
            PlayerChoice::Inspect { target } => {
                self.inspect(target)?;
                return Ok(None);
            }
        };
        Ok(Some(action))
    }

    fn inspect(&mut self, target: ActorId) -> Result<(), FailReason> {
        let env = self.env;
        let actor = self
            .roster
            .get(target)
            .filter(|actor| actor.is_alive())
            .ok_or(FailReason::InvalidTarget)?;

        let event = CombatEvent::Inspected {
            target: actor.name.clone(),
            hp: actor.hp(),
            max_hp: actor.max_hp(),
            damage: actor.damage(),
            defence: actor.effective_defence(&env),
            statuses: actor.statuses().iter().map(|s| s.id.clone()).collect(),
            intent: actor.profile.as_ref().and_then(|p| p.intent.clone()),
        };
        self.log.push(event);
        Ok(())
    }

    // ========================================================================
    // Termination
    // ========================================================================

    fn finish(&mut self, kind: ResultKind) -> EncounterResult {
        let rounds = match kind {
            ResultKind::Stalemate => self.round.saturating_sub(1),
            _ => self.round,
        };

        let rewards = if kind == ResultKind::Victory {
            grant_rewards(&mut self.roster, &self.env, &mut *self.rng, &mut self.log)
        } else {
            Rewards::default()
        };

        tracing::info!(
            target: "combat::encounter",
            result = kind.as_str(),
            rounds,
            "encounter ended"
        );
        self.log.push(CombatEvent::EncounterEnded {
            result: kind,
            rounds,
        });

        let log = core::mem::take(&mut self.log);
        match kind {
            ResultKind::Victory => EncounterResult::Victory {
                log,
                loot: rewards.loot,
                xp: rewards.xp,
                gold: rewards.gold,
            },
            ResultKind::Defeat => EncounterResult::Defeat { log },
            ResultKind::Fled => EncounterResult::Fled { log },
            ResultKind::NoEnemies => EncounterResult::NoEnemies { log },
            ResultKind::Stalemate => EncounterResult::Stalemate { log, rounds },
        }
    }
}

impl core::fmt::Debug for Encounter<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Encounter")
            .field("room", &self.room)
            .field("round", &self.round)
            .field("roster", &self.roster)
            .field("events", &self.log.len())
            .finish()
    }
}
