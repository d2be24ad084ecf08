//! Escape probability.

use crate::config::FleeRules;
use crate::state::Behavior;

/// Probability of escaping from the given enemies.
///
/// # Formula
///
/// ```text
/// chance = base
///        - step * (# aggressive)
///        + step * (# cowardly)
///        - per_extra_enemy * (n - 1)
///        + noise
/// clamped to [min, max]
/// ```
///
/// `noise` is the caller's draw from `[-rules.noise, rules.noise]`.
pub fn escape_chance(behaviors: &[Behavior], noise: f64, rules: &FleeRules) -> f64 {
    let mut chance = rules.base;
    for behavior in behaviors {
        match behavior {
            Behavior::Aggressive => chance -= rules.behavior_step,
            Behavior::Cowardly => chance += rules.behavior_step,
            _ => {}
        }
    }
    let extra = behaviors.len().saturating_sub(1) as f64;
    chance -= rules.per_extra_enemy * extra;
    chance += noise;

    if chance.is_nan() {
        return rules.min;
    }
    chance.clamp(rules.min, rules.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_normal_enemy_without_noise() {
        let chance = escape_chance(&[Behavior::Normal], 0.0, &FleeRules::default());
        assert!((chance - 0.70).abs() < 1e-9);
    }

    #[test]
    fn behaviors_and_count_shift_the_base() {
        let rules = FleeRules::default();
        let chance = escape_chance(&[Behavior::Aggressive, Behavior::Aggressive], 0.0, &rules);
        // 0.70 - 0.20 - 0.10
        assert!((chance - 0.40).abs() < 1e-9);

        let chance = escape_chance(&[Behavior::Cowardly], 0.12, &rules);
        assert!((chance - 0.92).abs() < 1e-9);
    }

    #[test]
    fn clamps_at_both_ends() {
        let rules = FleeRules::default();
        let crowd = vec![Behavior::Aggressive; 12];
        assert_eq!(escape_chance(&crowd, -0.12, &rules), 0.01);
        let cowards = vec![Behavior::Cowardly; 1];
        assert_eq!(escape_chance(&cowards, 0.5, &rules), 0.95);
    }

    fn behavior() -> impl Strategy<Value = Behavior> {
        prop_oneof![
            Just(Behavior::Normal),
            Just(Behavior::Aggressive),
            Just(Behavior::Cowardly),
            Just(Behavior::Slow),
            Just(Behavior::Ranged),
            Just(Behavior::Hulking),
        ]
    }

    proptest! {
        #[test]
        fn chance_stays_in_bounds(
            behaviors in proptest::collection::vec(behavior(), 0..20),
            noise in -0.12f64..=0.12,
        ) {
            let chance = escape_chance(&behaviors, noise, &FleeRules::default());
            prop_assert!((0.01..=0.95).contains(&chance));
        }
    }
}
