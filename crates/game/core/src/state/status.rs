//! Status instances carried by actors.
//!
//! An actor holds at most one instance per status id. Merging a re-applied
//! status into an existing instance is the job of the status engine; this
//! module only defines the data.

use crate::env::ModifierSet;

/// Per-instance strength of a status.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Magnitude {
    #[default]
    None,
    Value(f64),
    /// Overrides the registry modifiers key by key.
    Modifiers(ModifierSet),
}

impl Magnitude {
    /// Comparable strength used by the refresh policy. Only numeric
    /// magnitudes carry strength.
    pub fn strength(&self) -> f64 {
        match self {
            Magnitude::Value(value) => *value,
            Magnitude::None | Magnitude::Modifiers(_) => 0.0,
        }
    }

    /// Numeric value for ticking; anything non-numeric counts as `1.0`.
    pub fn tick_value(&self) -> f64 {
        match self {
            Magnitude::Value(value) => *value,
            Magnitude::None | Magnitude::Modifiers(_) => 1.0,
        }
    }

    pub fn modifiers(&self) -> Option<&ModifierSet> {
        match self {
            Magnitude::Modifiers(modifiers) => Some(modifiers),
            _ => None,
        }
    }
}

/// Active status on an actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusInstance {
    pub id: String,
    /// [`StatusInstance::INFINITE`] lasts while its source is equipped.
    pub remaining_turns: i32,
    pub magnitude: Magnitude,
    pub source: String,
    /// Suppresses the first tick and decrement after application.
    pub just_applied: bool,
    pub expires_end_of_turn: bool,
}

impl StatusInstance {
    pub const INFINITE: i32 = -1;

    pub fn is_infinite(&self) -> bool {
        self.remaining_turns == Self::INFINITE
    }
}

/// Per-actor, per-status override of application chance and duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Affinity {
    #[default]
    Normal,
    Resistant,
    Vulnerable,
    Immune,
}

impl Affinity {
    /// Adjusts an application chance for this affinity.
    pub fn adjust_chance(&self, chance: f64) -> f64 {
        match self {
            Affinity::Resistant => chance * 0.5,
            Affinity::Vulnerable => (chance * 1.5).min(1.0),
            Affinity::Normal | Affinity::Immune => chance,
        }
    }

    /// Adjusts a duration for this affinity. Infinite durations are untouched.
    pub fn adjust_duration(&self, duration: i32) -> i32 {
        if duration == StatusInstance::INFINITE {
            return duration;
        }
        match self {
            Affinity::Resistant => (duration - 1).max(1),
            Affinity::Vulnerable => duration + 1,
            Affinity::Normal | Affinity::Immune => duration,
        }
    }
}

/// A request to apply a status. Unset chance and duration come from the
/// registry.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusRequest {
    pub id: String,
    pub duration: Option<i32>,
    pub chance: Option<f64>,
    pub magnitude: Magnitude,
    pub source: String,
    pub expires_end_of_turn: bool,
}

impl StatusRequest {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            duration: None,
            chance: None,
            magnitude: Magnitude::None,
            source: source.into(),
            expires_end_of_turn: false,
        }
    }

    pub fn with_duration(mut self, duration: i32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = Some(chance);
        self
    }

    pub fn with_magnitude(mut self, magnitude: Magnitude) -> Self {
        self.magnitude = magnitude;
        self
    }

    pub fn ending_this_turn(mut self) -> Self {
        self.expires_end_of_turn = true;
        self
    }
}
