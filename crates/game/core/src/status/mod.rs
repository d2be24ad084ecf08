//! Status effect engine.
//!
//! Actor-scoped operations driven entirely by the status registry:
//! application (affinity, resistance and chance rolls, stacking policies),
//! ticking, modifier aggregation and action blocking.
//!
//! # Lifecycle
//!
//! - Applied instances start with `just_applied = true`; the holder's next
//!   [`Actor::process_statuses`] only clears the flag. A one-turn stun
//!   therefore costs the victim exactly one turn.
//! - Every later pass ticks (if the rule has `on_tick`) and decrements the
//!   instance; it is removed at zero. Infinite instances never decrement.
//! - `expires_end_of_turn` instances are stripped at the end of the holder's turn.

use crate::combat::{ApplyResult, StatusFeedback};
use crate::encounter::{CombatEvent, EventLog};
use crate::env::{Env, RngOracle, StackPolicy, StatusRule, TickRule};
use crate::state::{Actor, Affinity, Magnitude, StatusInstance, StatusRequest};

impl Actor {
    // ========================================================================
    // Application
    // ========================================================================

    /// Applies a status request, logging every transition and rejection.
    pub fn apply_status(
        &mut self,
        request: StatusRequest,
        env: &Env<'_>,
        rng: &mut dyn RngOracle,
        log: &mut EventLog,
    ) -> StatusFeedback {
        let affinity = self.affinity(&request.id);
        let feedback = |result| StatusFeedback {
            status: request.id.clone(),
            result,
            affinity,
        };

        let Some(rule) = env.status_rule(&request.id) else {
            tracing::debug!(target: "combat::status", status = %request.id, "unknown status");
            return feedback(ApplyResult::Unknown);
        };

        if affinity == Affinity::Immune {
            log.push(CombatEvent::StatusImmune {
                target: self.name.clone(),
                status: request.id.clone(),
            });
            return feedback(ApplyResult::Immune);
        }

        let chance = affinity.adjust_chance(request.chance.unwrap_or(rule.default_chance));
        let duration = affinity.adjust_duration(request.duration.unwrap_or(rule.default_duration));

        let resistance = self.status_resistance(&request.id, env);
        if resistance > 0.0 && rng.uniform() < resistance {
            log.push(CombatEvent::StatusResisted {
                target: self.name.clone(),
                status: request.id.clone(),
                resistance,
            });
            return feedback(ApplyResult::Resisted);
        }

        if !rng.chance(chance) {
            log.push(CombatEvent::StatusMissed {
                target: self.name.clone(),
                status: request.id.clone(),
                chance,
            });
            return feedback(ApplyResult::Missed);
        }

        let result = self.merge_status(rule, &request, duration);
        if result.landed() {
            if let Some(instance) = self.status(&request.id) {
                log.push(CombatEvent::StatusApplied {
                    target: self.name.clone(),
                    status: request.id.clone(),
                    result,
                    remaining_turns: instance.remaining_turns,
                    magnitude: instance.magnitude,
                    source: request.source.clone(),
                });
            }
            let label: &'static str = result.into();
            tracing::debug!(
                target: "combat::status",
                actor = %self.name,
                status = %request.id,
                result = label,
                "status applied"
            );
            if rule.interrupts {
                self.try_interrupt(&request.id, env, rng, log);
            }
        }

        feedback(result)
    }

    /// Equipment resistance: sum of `"{id}_resist"` passives, capped.
    pub fn status_resistance(&self, status: &str, env: &Env<'_>) -> f64 {
        let key = format!("{status}_resist");
        self.equipment
            .passive(&key)
            .clamp(0.0, env.config().resistance_cap)
    }

    fn merge_status(&mut self, rule: &StatusRule, request: &StatusRequest, duration: i32) -> ApplyResult {
        let fresh = StatusInstance {
            id: request.id.clone(),
            remaining_turns: duration,
            magnitude: request.magnitude,
            source: request.source.clone(),
            just_applied: true,
            expires_end_of_turn: request.expires_end_of_turn,
        };

        let Some(index) = self.statuses.iter().position(|s| s.id == request.id) else {
            self.statuses.push(match rule.stacking {
                StackPolicy::Stack => capped(fresh, rule.stack_cap()),
                StackPolicy::Replace | StackPolicy::Refresh => fresh,
            });
            return ApplyResult::Added;
        };

        match rule.stacking {
            StackPolicy::Replace => {
                self.statuses.remove(index);
                self.statuses.push(fresh);
                ApplyResult::Replaced
            }
            StackPolicy::Refresh => {
                let existing = &mut self.statuses[index];
                let new_strength = fresh.magnitude.strength();
                let old_strength = existing.magnitude.strength();
                if new_strength > old_strength {
                    *existing = fresh;
                    ApplyResult::Refreshed
                } else if new_strength == old_strength {
                    existing.remaining_turns = longer(existing.remaining_turns, duration);
                    ApplyResult::Extended
                } else {
                    ApplyResult::Unchanged
                }
            }
            StackPolicy::Stack => {
                let cap = rule.stack_cap() as i32;
                let existing = &mut self.statuses[index];
                if !existing.is_infinite() {
                    existing.remaining_turns = if duration == StatusInstance::INFINITE {
                        StatusInstance::INFINITE
                    } else {
                        (existing.remaining_turns + duration).min(cap)
                    };
                }
                if let (Magnitude::Value(old), Magnitude::Value(new)) =
                    (existing.magnitude, fresh.magnitude)
                {
                    existing.magnitude = Magnitude::Value((old + new).min(cap as f64));
                }
                ApplyResult::Stacked
            }
        }
    }

    /// Rolls the rarity-keyed interrupt resistance against an active lock.
    fn try_interrupt(
        &mut self,
        status: &str,
        env: &Env<'_>,
        rng: &mut dyn RngOracle,
        log: &mut EventLog,
    ) {
        let Some(profile) = self.profile.as_mut() else {
            return;
        };
        let Some(lock) = profile.locked.as_ref() else {
            return;
        };

        let resistance = env.config().interrupt.resistance(profile.rarity);
        if resistance > 0.0 && rng.chance(resistance) {
            log.push(CombatEvent::InterruptResisted {
                actor: self.name.clone(),
                status: status.to_string(),
                resistance,
            });
            return;
        }

        let skill = lock.skill.clone();
        profile.locked = None;
        profile.intent = None;
        tracing::debug!(target: "combat::status", actor = %self.name, %skill, "channel interrupted");
        log.push(CombatEvent::LockInterrupted {
            actor: self.name.clone(),
            status: status.to_string(),
            skill,
        });
    }

    /// Clears `just_applied` so the status counts down from the holder's
    /// next turn. Used for statuses granted by the holder's own action.
    pub fn settle_status(&mut self, id: &str) {
        if let Some(instance) = self.statuses.iter_mut().find(|s| s.id == id) {
            instance.just_applied = false;
        }
    }

    // ========================================================================
    // Removal
    // ========================================================================

    pub fn remove_status(&mut self, id: &str, log: &mut EventLog) -> bool {
        let Some(index) = self.statuses.iter().position(|s| s.id == id) else {
            return false;
        };
        self.statuses.remove(index);
        log.push(CombatEvent::StatusRemoved {
            actor: self.name.clone(),
            status: id.to_string(),
        });
        true
    }

    /// Strips every debuff not listed in `except`. Returns the removed ids.
    pub fn cleanse_debuffs(&mut self, except: &[String], env: &Env<'_>, log: &mut EventLog) -> Vec<String> {
        let removed: Vec<String> = self
            .statuses
            .iter()
            .filter(|s| env.status_rule(&s.id).is_some_and(|rule| rule.is_debuff))
            .filter(|s| !except.contains(&s.id))
            .map(|s| s.id.clone())
            .collect();
        for id in &removed {
            self.remove_status(id, log);
        }
        removed
    }

    /// Removes statuses flagged `expires_end_of_turn`.
    pub fn strip_end_of_turn(&mut self, log: &mut EventLog) {
        let expiring: Vec<String> = self
            .statuses
            .iter()
            .filter(|s| s.expires_end_of_turn)
            .map(|s| s.id.clone())
            .collect();
        for id in &expiring {
            self.remove_status(id, log);
        }
    }

    // ========================================================================
    // Ticking
    // ========================================================================

    /// Ticks and counts down every status in ascending priority order.
    pub fn process_statuses(&mut self, env: &Env<'_>, log: &mut EventLog) {
        let mut order: Vec<(i32, String)> = self
            .statuses
            .iter()
            .map(|s| (priority_of(env, &s.id), s.id.clone()))
            .collect();
        // Stable: equal priorities keep insertion order.
        order.sort_by_key(|(priority, _)| *priority);

        for (_, id) in order {
            let Some(index) = self.statuses.iter().position(|s| s.id == id) else {
                continue;
            };

            if self.statuses[index].just_applied {
                self.statuses[index].just_applied = false;
                continue;
            }

            if let Some(rule) = env.status_rule(&id)
                && let Some(tick) = rule.on_tick
            {
                self.tick_status(index, rule, tick, log);
            }

            let instance = &mut self.statuses[index];
            if instance.is_infinite() {
                continue;
            }
            instance.remaining_turns -= 1;
            if instance.remaining_turns <= 0 {
                self.statuses.remove(index);
                log.push(CombatEvent::StatusExpired {
                    actor: self.name.clone(),
                    status: id,
                });
            }
        }
    }

    fn tick_status(&mut self, index: usize, rule: &StatusRule, tick: TickRule, log: &mut EventLog) {
        let (multiplier, interaction) = self.strongest_interaction(rule);

        // Transient copy: the stored magnitude is never rewritten by a tick.
        let mut transient = self.statuses[index].clone();
        let effective = transient.magnitude.tick_value() * multiplier;
        transient.magnitude = Magnitude::Value(effective);

        let hp_before = self.hp();
        let amount = tick.amount(transient.magnitude.tick_value());
        match tick {
            TickRule::Damage { .. } => {
                self.take_damage(amount);
            }
            TickRule::Heal { .. } => {
                self.heal(amount);
            }
            TickRule::RestoreResource { .. } => {
                self.resource.restore(amount);
            }
        }

        log.push(CombatEvent::StatusTick {
            actor: self.name.clone(),
            status: transient.id,
            magnitude: effective,
            interaction,
            hp_before,
            hp_after: self.hp(),
        });
    }

    /// The co-present interaction deviating furthest from 1.0. Ties keep the
    /// first id in registry key order.
    fn strongest_interaction(&self, rule: &StatusRule) -> (f64, Option<String>) {
        let mut best: Option<(&String, f64)> = None;
        for (other, interaction) in &rule.interactions {
            if !self.has_status(other) {
                continue;
            }
            let deviation = (interaction.damage_multiplier - 1.0).abs();
            if best.is_none_or(|(_, mult)| deviation > (mult - 1.0).abs()) {
                best = Some((other, interaction.damage_multiplier));
            }
        }
        match best {
            Some((other, mult)) => (mult, Some(other.clone())),
            None => (1.0, None),
        }
    }

    // ========================================================================
    // Aggregation
    // ========================================================================

    /// Product of active `damage_mult` modifiers.
    pub fn damage_multiplier(&self, env: &Env<'_>) -> f64 {
        self.statuses
            .iter()
            .map(|s| effective_modifiers(env, s).damage_factor())
            .product()
    }

    pub fn effective_defence(&self, env: &Env<'_>) -> i32 {
        let factor: f64 = self
            .statuses
            .iter()
            .map(|s| effective_modifiers(env, s).defence_factor())
            .product();
        (self.defence() as f64 * factor).floor() as i32
    }

    /// First action-blocking status, scanning by descending priority.
    pub fn blocking_status(&self, env: &Env<'_>) -> Option<&str> {
        let mut ordered: Vec<&StatusInstance> = self.statuses.iter().collect();
        ordered.sort_by_key(|s| core::cmp::Reverse(priority_of(env, &s.id)));
        ordered
            .into_iter()
            .find(|s| env.status_rule(&s.id).is_some_and(|rule| rule.prevents_action))
            .map(|s| s.id.as_str())
    }

    pub fn can_act(&self, env: &Env<'_>) -> bool {
        self.blocking_status(env).is_none()
    }
}

fn priority_of(env: &Env<'_>, id: &str) -> i32 {
    env.status_rule(id).map_or(0, |rule| rule.priority)
}

fn effective_modifiers(env: &Env<'_>, instance: &StatusInstance) -> crate::env::ModifierSet {
    let registry = env
        .status_rule(&instance.id)
        .map(|rule| rule.modifiers)
        .unwrap_or_default();
    match instance.magnitude.modifiers() {
        Some(overrides) => registry.overridden_by(overrides),
        None => registry,
    }
}

fn longer(a: i32, b: i32) -> i32 {
    if a == StatusInstance::INFINITE || b == StatusInstance::INFINITE {
        StatusInstance::INFINITE
    } else {
        a.max(b)
    }
}

fn capped(mut instance: StatusInstance, cap: u32) -> StatusInstance {
    if !instance.is_infinite() {
        instance.remaining_turns = instance.remaining_turns.min(cap as i32);
    }
    if let Magnitude::Value(value) = instance.magnitude {
        instance.magnitude = Magnitude::Value(value.min(cap as f64));
    }
    instance
}
