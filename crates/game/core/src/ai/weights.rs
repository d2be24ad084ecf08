//! Behavior weight tables.

use crate::env::Skill;
use crate::state::Behavior;

/// Status ids that count as debuffs for weighting.
pub const DEBUFF_STATUSES: [&str; 3] = ["stun", "poison", "weakened"];

/// Category multipliers for one behavior tag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BehaviorWeights {
    pub damage: f64,
    pub debuff: f64,
    pub buff: f64,
    pub lock: f64,
}

impl BehaviorWeights {
    pub const NEUTRAL: BehaviorWeights = BehaviorWeights {
        damage: 1.0,
        debuff: 1.0,
        buff: 1.0,
        lock: 1.0,
    };

    pub fn for_behavior(behavior: Behavior) -> Self {
        match behavior {
            Behavior::Normal => Self::NEUTRAL,
            Behavior::Aggressive => Self {
                damage: 1.5,
                debuff: 0.8,
                buff: 0.6,
                lock: 1.0,
            },
            Behavior::Cowardly => Self {
                damage: 0.7,
                debuff: 1.2,
                buff: 1.4,
                lock: 0.6,
            },
            Behavior::Slow => Self {
                lock: 1.5,
                ..Self::NEUTRAL
            },
            Behavior::Ranged => Self {
                damage: 1.2,
                debuff: 1.3,
                buff: 0.8,
                lock: 0.8,
            },
            Behavior::Hulking => Self {
                damage: 1.4,
                debuff: 0.7,
                buff: 0.8,
                lock: 1.3,
            },
        }
    }

    /// `1.0 × damage? × (debuff | buff)? × lock?`
    pub fn skill_weight(&self, skill: &Skill) -> f64 {
        let mut weight = 1.0;
        if skill.damage.is_some() {
            weight *= self.damage;
        }
        if let Some(application) = &skill.apply_status {
            if DEBUFF_STATUSES.contains(&application.status.as_str()) {
                weight *= self.debuff;
            } else {
                weight *= self.buff;
            }
        }
        if skill.locks_actor.is_some() {
            weight *= self.lock;
        }
        weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageDef;
    use crate::env::{LockSpec, StatusApplication, TargetKind};

    #[test]
    fn categories_multiply() {
        let weights = BehaviorWeights::for_behavior(Behavior::Hulking);
        let slam = Skill::new("slam", TargetKind::Enemy)
            .with_damage(DamageDef::multiplier(1.5))
            .with_status(StatusApplication::new("stun"))
            .with_lock(LockSpec {
                label: "winding up".into(),
                turns: 2,
                forced_action: None,
            });
        // 1.4 * 0.7 * 1.3
        assert!((weights.skill_weight(&slam) - 1.274).abs() < 1e-9);

        let roar = Skill::new("roar", TargetKind::Caster).with_status(StatusApplication::new("rage"));
        assert!((weights.skill_weight(&roar) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn plain_skill_weighs_one() {
        let weights = BehaviorWeights::for_behavior(Behavior::Aggressive);
        assert_eq!(weights.skill_weight(&Skill::new("taunt", TargetKind::Enemy)), 1.0);
    }
}
