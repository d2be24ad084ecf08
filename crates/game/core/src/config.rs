use crate::state::Rarity;

/// Combat balance constants and tunable parameters.
///
/// Every field has a default; content TOML only needs the keys it changes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// A crit roll at or above this value doubles raw damage.
    pub crit_threshold: f64,
    pub crit_multiplier: i32,
    /// Fraction of raw damage that leaks through a full block.
    pub block_factor: f64,
    /// Upper bound for equipment-granted status resistance.
    pub resistance_cap: f64,

    pub flee: FleeRules,
    pub regen: RegenRules,
    pub interrupt: InterruptRules,
    pub progression: ProgressionRules,

    /// Status applied to the player after a successful defend.
    pub defend_status: String,
    pub defend_duration: i32,

    /// Initiative used when an actor has no explicit speed.
    pub player_default_speed: i32,
    pub enemy_default_speed: i32,

    /// Consecutive inspect/rejected choices before the player's turn is forfeited.
    pub max_free_choices: u32,

    /// Stops the encounter as a stalemate after this many rounds.
    pub max_rounds: Option<u32>,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_RINGS: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CRIT_THRESHOLD: f64 = 0.95;
    pub const DEFAULT_CRIT_MULTIPLIER: i32 = 2;
    pub const DEFAULT_BLOCK_FACTOR: f64 = 0.25;
    pub const DEFAULT_RESISTANCE_CAP: f64 = 0.95;
    pub const DEFAULT_DEFEND_STATUS: &'static str = "defending";

    pub fn new() -> Self {
        Self {
            crit_threshold: Self::DEFAULT_CRIT_THRESHOLD,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            block_factor: Self::DEFAULT_BLOCK_FACTOR,
            resistance_cap: Self::DEFAULT_RESISTANCE_CAP,
            flee: FleeRules::default(),
            regen: RegenRules::default(),
            interrupt: InterruptRules::default(),
            progression: ProgressionRules::default(),
            defend_status: Self::DEFAULT_DEFEND_STATUS.to_string(),
            defend_duration: 1,
            player_default_speed: 999,
            enemy_default_speed: 0,
            max_free_choices: 8,
            max_rounds: None,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape probability parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleeRules {
    pub base: f64,
    /// Applied once per enemy tagged aggressive (subtracted) or cowardly (added).
    pub behavior_step: f64,
    /// Subtracted for every enemy beyond the first.
    pub per_extra_enemy: f64,
    /// Uniform noise in `[-noise, noise]`.
    pub noise: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for FleeRules {
    fn default() -> Self {
        Self {
            base: 0.70,
            behavior_step: 0.10,
            per_extra_enemy: 0.10,
            noise: 0.12,
            min: 0.01,
            max: 0.95,
        }
    }
}

/// Player resource regeneration per action type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegenRules {
    pub on_attack: i32,
    pub on_item: i32,
    pub on_defend: i32,
    /// Percentage of max resource restored on victory.
    pub victory_percent: i32,
}

impl Default for RegenRules {
    fn default() -> Self {
        Self {
            on_attack: 5,
            on_item: 5,
            on_defend: 15,
            victory_percent: 50,
        }
    }
}

/// Chance that a locked (channeling) enemy shrugs off an interrupting status.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InterruptRules {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
    pub elite: f64,
    pub boss: f64,
}

impl InterruptRules {
    pub fn resistance(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Elite => self.elite,
            Rarity::Boss => self.boss,
        }
    }
}

impl Default for InterruptRules {
    fn default() -> Self {
        Self {
            common: 0.0,
            uncommon: 0.10,
            rare: 0.25,
            elite: 0.40,
            boss: 0.60,
        }
    }
}

/// Level-up curve: `xp_to_next = xp_per_level * level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionRules {
    pub xp_per_level: u32,
    pub hp_per_level: i32,
    pub damage_per_level: i32,
    pub defence_per_level: i32,
}

impl ProgressionRules {
    pub fn xp_to_next(&self, level: u32) -> u32 {
        self.xp_per_level.saturating_mul(level.max(1))
    }
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            xp_per_level: 100,
            hp_per_level: 10,
            damage_per_level: 2,
            defence_per_level: 1,
        }
    }
}
