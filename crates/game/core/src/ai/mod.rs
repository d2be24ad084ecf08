//! Enemy AI: behavior-weighted intent planning with cooldown and lock
//! filtering.

mod planner;
mod weights;

pub use planner::{available_skills, decide_enemy_action, plan_intent, prune_lock, stall_lock};
pub use weights::{BehaviorWeights, DEBUFF_STATUSES};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::combat::DamageDef;
    use crate::config::CombatConfig;
    use crate::encounter::EventLog;
    use crate::env::{
        ForcedAction, ItemTable, LockSpec, Registries, ScriptedRng, Skill, SkillTable,
        StatusApplication, StatusRule, StatusTable, TargetKind,
    };
    use crate::state::{
        Actor, ActorId, BaseStats, Behavior, EnemyProfile, IntentKind, Rarity, Roster,
    };

    fn registries() -> Registries {
        let statuses = StatusTable::from_rules([
            StatusRule::new("stun").debuff().preventing_action(),
            StatusRule::new("rage"),
        ])
        .unwrap();
        let skills = SkillTable::from_skills([
            Skill::new("bite", TargetKind::Enemy).with_damage(DamageDef::multiplier(1.2)),
            Skill::new("bash", TargetKind::Enemy)
                .with_status(StatusApplication::new("stun"))
                .forbidden_if("stun")
                .with_cooldown(3),
            Skill::new("slam", TargetKind::Enemy)
                .with_damage(DamageDef::multiplier(2.0))
                .with_lock(LockSpec {
                    label: "winding up".into(),
                    turns: 2,
                    forced_action: None,
                })
                .with_hint("raises a huge club"),
            Skill::new("brace", TargetKind::Enemy).with_lock(LockSpec {
                label: "bracing".into(),
                turns: 3,
                forced_action: Some(ForcedAction::Defend),
            }),
            Skill::new("surge", TargetKind::Caster)
                .with_status(StatusApplication::new("rage"))
                .with_cost(10),
        ]);
        Registries::new(statuses, skills, ItemTable::new())
    }

    fn roster(skills: &[&str]) -> Roster {
        let enemy = Actor::enemy(
            "ogre",
            BaseStats::new(40, 6, 1),
            EnemyProfile::new(Rarity::Common, Behavior::Hulking),
        )
        .with_skills(skills.iter().copied());
        Roster::new(Actor::player("hero", BaseStats::new(30, 5, 1)), [enemy])
    }

    #[test]
    fn filters_cooldown_forbid_and_cost() {
        let registries = registries();
        let config = CombatConfig::default();
        let env = registries.env(&config);
        let mut roster = roster(&["bite", "bash", "surge"]);

        let names = |roster: &Roster| -> Vec<String> {
            available_skills(roster.get(ActorId(1)).unwrap(), roster.player(), &env)
                .into_iter()
                .map(|s| s.id.clone())
                .collect()
        };
        // surge costs 10 and the ogre has no resource pool
        assert_eq!(names(&roster), vec!["bite", "bash"]);

        roster.get_mut(ActorId(1)).unwrap().start_cooldown("bash", 2);
        assert_eq!(names(&roster), vec!["bite"]);

        roster.get_mut(ActorId(1)).unwrap().cooldowns.clear();
        let mut log = EventLog::new();
        let mut rng = ScriptedRng::constant(0.0);
        roster
            .player_mut()
            .apply_status(crate::state::StatusRequest::new("stun", "test"), &env, &mut rng, &mut log);
        assert_eq!(names(&roster), vec!["bite"]);
    }

    #[test]
    fn no_candidates_means_attack() {
        let registries = registries();
        let config = CombatConfig::default();
        let env = registries.env(&config);
        let mut roster = roster(&[]);
        let mut log = EventLog::new();
        let mut rng = ScriptedRng::constant(0.5);

        let intent = plan_intent(&mut roster, ActorId(1), &env, &mut rng, &mut log).unwrap();
        assert_eq!(intent.kind, IntentKind::Attack);
        assert_eq!(log.tagged("intent_published").count(), 1);
        assert_eq!(
            decide_enemy_action(&mut roster, ActorId(1), &env).kind,
            ActionKind::Attack
        );
    }

    #[test]
    fn lock_skill_telegraphs_then_fires() {
        let registries = registries();
        let config = CombatConfig::default();
        let env = registries.env(&config);
        let mut roster = roster(&["slam"]);
        let mut log = EventLog::new();
        let mut rng = ScriptedRng::constant(0.0);

        let intent = plan_intent(&mut roster, ActorId(1), &env, &mut rng, &mut log).unwrap();
        assert_eq!(intent.kind, IntentKind::Charging);
        assert_eq!(intent.turns, Some(2));
        assert_eq!(intent.hint.as_deref(), Some("raises a huge club"));

        let first = decide_enemy_action(&mut roster, ActorId(1), &env);
        assert_eq!(
            first.kind,
            ActionKind::Wait {
                reason: "winding up".into()
            }
        );

        let replanned = plan_intent(&mut roster, ActorId(1), &env, &mut rng, &mut log).unwrap();
        assert_eq!(replanned.kind, IntentKind::Charging);
        assert_eq!(replanned.turns, Some(1));

        let second = decide_enemy_action(&mut roster, ActorId(1), &env);
        assert_eq!(
            second.kind,
            ActionKind::Skill {
                skill: "slam".into()
            }
        );
        assert_eq!(second.target, Some(ActorId::PLAYER));
        assert!(!roster.get(ActorId(1)).unwrap().is_locked());
    }

    #[test]
    fn forced_action_is_returned_while_charging() {
        let registries = registries();
        let config = CombatConfig::default();
        let env = registries.env(&config);
        let mut roster = roster(&["brace"]);
        let mut log = EventLog::new();
        let mut rng = ScriptedRng::constant(0.0);

        plan_intent(&mut roster, ActorId(1), &env, &mut rng, &mut log);
        assert_eq!(
            decide_enemy_action(&mut roster, ActorId(1), &env).kind,
            ActionKind::Defend
        );
        assert_eq!(
            decide_enemy_action(&mut roster, ActorId(1), &env).kind,
            ActionKind::Defend
        );
        assert_eq!(
            decide_enemy_action(&mut roster, ActorId(1), &env).kind,
            ActionKind::Skill {
                skill: "brace".into()
            }
        );
    }

    #[test]
    fn stale_lock_is_pruned() {
        let registries = registries();
        let config = CombatConfig::default();
        let env = registries.env(&config);
        let mut roster = roster(&["slam"]);
        let mut log = EventLog::new();
        let mut rng = ScriptedRng::constant(0.0);

        plan_intent(&mut roster, ActorId(1), &env, &mut rng, &mut log);
        if let Some(lock) = roster
            .get_mut(ActorId(1))
            .and_then(|a| a.profile.as_mut())
            .and_then(|p| p.locked.as_mut())
        {
            lock.turns_remaining = 0;
        }
        prune_lock(&mut roster, ActorId(1), &mut log);
        assert!(!roster.get(ActorId(1)).unwrap().is_locked());
        assert_eq!(log.tagged("lock_cleared").count(), 1);
    }
}
