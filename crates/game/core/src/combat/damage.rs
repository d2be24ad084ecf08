//! Damage calculation and application.

use crate::config::CombatConfig;
use crate::env::{Env, RngOracle};
use crate::state::Actor;

// ============================================================================
// Damage Definition
// ============================================================================

/// Attacker stat a formula scales with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScalingStat {
    #[default]
    Damage,
}

/// How raw damage is computed before multipliers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageFormula {
    /// `amount`
    Flat { amount: i32 },

    /// `floor(stat * mult)`
    Multiplier {
        #[cfg_attr(feature = "serde", serde(default))]
        stat: ScalingStat,
        mult: f64,
    },

    /// `floor(base + stat * mult)`
    Hybrid {
        base: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        stat: ScalingStat,
        mult: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageDef {
    pub formula: DamageFormula,
    #[cfg_attr(feature = "serde", serde(default = "DamageDef::default_can_crit"))]
    pub can_crit: bool,
}

impl DamageDef {
    fn default_can_crit() -> bool {
        true
    }

    pub fn flat(amount: i32) -> Self {
        Self {
            formula: DamageFormula::Flat { amount },
            can_crit: true,
        }
    }

    pub fn multiplier(mult: f64) -> Self {
        Self {
            formula: DamageFormula::Multiplier {
                stat: ScalingStat::Damage,
                mult,
            },
            can_crit: true,
        }
    }

    pub fn hybrid(base: f64, mult: f64) -> Self {
        Self {
            formula: DamageFormula::Hybrid {
                base,
                stat: ScalingStat::Damage,
                mult,
            },
            can_crit: true,
        }
    }

    /// The basic attack: full damage stat, may crit.
    pub fn basic_attack() -> Self {
        Self::multiplier(1.0)
    }

    pub fn without_crit(mut self) -> Self {
        self.can_crit = false;
        self
    }

    /// Step 1: raw damage from the formula.
    pub fn raw(&self, attacker: &AttackerSnapshot) -> i32 {
        let stat_value = |stat: ScalingStat| match stat {
            ScalingStat::Damage => attacker.damage as f64,
        };
        match self.formula {
            DamageFormula::Flat { amount } => amount,
            DamageFormula::Multiplier { stat, mult } => (stat_value(stat) * mult).floor() as i32,
            DamageFormula::Hybrid { base, stat, mult } => {
                (base + stat_value(stat) * mult).floor() as i32
            }
        }
    }
}

// ============================================================================
// Snapshots & Outcome
// ============================================================================

/// Attacker values frozen before any mutation, so an actor can hit itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackerSnapshot {
    pub damage: i32,
    /// Product of active `damage_mult` modifiers.
    pub damage_multiplier: f64,
}

impl AttackerSnapshot {
    pub fn new(damage: i32, damage_multiplier: f64) -> Self {
        Self {
            damage,
            damage_multiplier,
        }
    }

    pub fn of(actor: &Actor, env: &Env<'_>) -> Self {
        Self::new(actor.damage(), actor.damage_multiplier(env))
    }
}

/// Damage numbers before they are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageRoll {
    pub damage: i32,
    pub blocked: bool,
    pub critical: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageOutcome {
    pub damage: i32,
    pub blocked: bool,
    pub critical: bool,
    pub died: bool,
}

// ============================================================================
// Damage Calculation
// ============================================================================

/// Calculate damage against an effective defence.
///
/// # Formula
///
/// ```text
/// raw = formula(attacker)
/// raw = floor(raw * damage_multiplier)
/// if can_crit and roll >= crit_threshold:
///     raw *= crit_multiplier
///
/// if raw <= defence:
///     ratio  = clamp((raw * 2 - defence) / raw, 0, 1)   (0 when raw <= 0)
///     damage = floor(raw * block_factor * ratio)
/// else:
///     damage = raw - defence
/// ```
///
/// The crit roll is drawn only when the definition can crit.
pub fn calculate_damage(
    attacker: &AttackerSnapshot,
    effective_defence: i32,
    def: &DamageDef,
    rng: &mut dyn RngOracle,
    config: &CombatConfig,
) -> DamageRoll {
    let raw = def.raw(attacker);
    let mut raw = (raw as f64 * attacker.damage_multiplier).floor() as i32;

    let mut critical = false;
    if def.can_crit {
        let roll = rng.uniform();
        if roll >= config.crit_threshold {
            critical = true;
            raw = raw.saturating_mul(config.crit_multiplier);
        }
    }

    if raw <= effective_defence {
        let ratio = block_ratio(raw, effective_defence);
        let damage = (raw as f64 * config.block_factor * ratio).floor() as i32;
        return DamageRoll {
            damage: damage.max(0),
            blocked: true,
            critical,
        };
    }

    DamageRoll {
        damage: raw - effective_defence,
        blocked: false,
        critical,
    }
}

/// Fraction of a blocked hit that leaks through, clamped after division.
pub fn block_ratio(raw: i32, effective_defence: i32) -> f64 {
    if raw <= 0 {
        return 0.0;
    }
    let ratio = (raw as f64 * 2.0 - effective_defence as f64) / raw as f64;
    ratio.clamp(0.0, 1.0)
}

/// Resolve and apply damage to a defender.
///
/// A missing defender or definition is a no-op and draws no roll.
pub fn resolve_damage(
    attacker: &AttackerSnapshot,
    defender: Option<&mut Actor>,
    def: Option<&DamageDef>,
    env: &Env<'_>,
    rng: &mut dyn RngOracle,
) -> DamageOutcome {
    let (Some(defender), Some(def)) = (defender, def) else {
        return DamageOutcome::default();
    };

    let defence = defender.effective_defence(env);
    let roll = calculate_damage(attacker, defence, def, rng, env.config());
    defender.take_damage(roll.damage);

    tracing::trace!(
        target: "combat::damage",
        defender = %defender.name,
        damage = roll.damage,
        blocked = roll.blocked,
        critical = roll.critical,
        hp = defender.hp(),
        "damage resolved"
    );

    DamageOutcome {
        damage: roll.damage,
        blocked: roll.blocked,
        critical: roll.critical,
        died: !defender.is_alive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;

    fn no_crit() -> ScriptedRng {
        ScriptedRng::constant(0.0)
    }

    fn roll(damage: i32, def: DamageDef, defence: i32, rng: &mut ScriptedRng) -> DamageRoll {
        calculate_damage(
            &AttackerSnapshot::new(damage, 1.0),
            defence,
            &def,
            rng,
            &CombatConfig::default(),
        )
    }

    #[test]
    fn multiplier_formula_is_exact() {
        let out = roll(20, DamageDef::multiplier(0.5), 0, &mut no_crit());
        assert_eq!(out, DamageRoll { damage: 10, blocked: false, critical: false });
    }

    #[test]
    fn hybrid_formula_is_exact() {
        let out = roll(10, DamageDef::hybrid(5.0, 0.5), 0, &mut no_crit());
        assert_eq!(out.damage, 10);
    }

    #[test]
    fn flat_formula_ignores_stat() {
        let out = roll(99, DamageDef::flat(7), 2, &mut no_crit());
        assert_eq!(out.damage, 5);
    }

    #[test]
    fn low_raw_is_fully_blocked() {
        let out = roll(5, DamageDef::multiplier(1.0), 10, &mut no_crit());
        assert!(out.blocked);
        assert_eq!(out.damage, 0);
    }

    #[test]
    fn raw_equal_to_defence_leaks_a_quarter() {
        // ratio = (20 - 10) / 10 = 1.0 -> floor(10 * 0.25)
        let out = roll(10, DamageDef::multiplier(1.0), 10, &mut no_crit());
        assert!(out.blocked);
        assert_eq!(out.damage, 2);

        // ratio = (16 - 10) / 8 = 0.75 -> floor(8 * 0.25 * 0.75)
        let out = roll(8, DamageDef::multiplier(1.0), 10, &mut no_crit());
        assert_eq!(out.damage, 1);
    }

    #[test]
    fn zero_raw_short_circuits_ratio() {
        assert_eq!(block_ratio(0, 0), 0.0);
        assert_eq!(block_ratio(-3, 0), 0.0);
        let out = roll(0, DamageDef::multiplier(1.0), 0, &mut no_crit());
        assert!(out.blocked);
        assert_eq!(out.damage, 0);
    }

    #[test]
    fn critical_doubles_raw() {
        let mut rng = ScriptedRng::constant(0.95);
        let out = roll(10, DamageDef::multiplier(1.0), 0, &mut rng);
        assert!(out.critical);
        assert_eq!(out.damage, 20);
    }

    #[test]
    fn crit_roll_skipped_without_can_crit() {
        let mut rng = ScriptedRng::constant(0.99);
        let out = roll(10, DamageDef::multiplier(1.0).without_crit(), 0, &mut rng);
        assert!(!out.critical);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn damage_multiplier_floors_after_formula() {
        let out = calculate_damage(
            &AttackerSnapshot::new(10, 1.25),
            0,
            &DamageDef::multiplier(1.0),
            &mut no_crit(),
            &CombatConfig::default(),
        );
        assert_eq!(out.damage, 12);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn damage_is_never_negative(
                stat in -50i32..500,
                mult in 0.0f64..4.0,
                defence in -10i32..300,
                roll in 0.0f64..1.0,
            ) {
                let mut rng = ScriptedRng::constant(roll);
                let out = calculate_damage(
                    &AttackerSnapshot::new(stat, 1.0),
                    defence,
                    &DamageDef::multiplier(mult),
                    &mut rng,
                    &CombatConfig::default(),
                );
                prop_assert!(out.damage >= 0);
            }
        }
    }
}
