//! Common error infrastructure for combat-core.
//!
//! Combat itself never aborts: rejected operations surface as a [`FailReason`]
//! on the outcome and in the event log. Hard errors only exist at the edges,
//! when static tables are validated before an encounter starts.
//!
//! # Design Principles
//!
//! - **Silent to caller**: resolution returns outcomes, never `Err`
//! - **Stable codes**: every variant maps to a snake_case code for renderers
//! - **Severity Classification**: errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same request may succeed later (resource regenerates, cooldown ends).
    Recoverable,

    /// Invalid input, should not retry without changes.
    Validation,

    /// Static data is inconsistent; the encounter should not start.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all combat-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str;
}

/// Reason code attached to `*_fail` outcomes and rejected choices.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error, strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FailReason {
    #[error("skill is not known")]
    MissingSkill,

    #[error("item is not in the inventory")]
    MissingItem,

    #[error("not enough resource to pay the cost")]
    NotEnoughResource,

    #[error("skill is still on cooldown")]
    OnCooldown,

    #[error("nothing happened")]
    NoEffect,

    #[error("target is missing or dead")]
    InvalidTarget,

    #[error("actor is dead")]
    ActorDead,

    #[error("target already carries a blocking status")]
    Forbidden,
}

impl FailReason {
    /// Snake_case code used on the wire.
    pub fn code(&self) -> &'static str {
        self.into()
    }
}

impl GameError for FailReason {
    fn severity(&self) -> ErrorSeverity {
        use FailReason::*;
        match self {
            NotEnoughResource | OnCooldown | NoEffect => ErrorSeverity::Recoverable,
            MissingSkill | MissingItem | InvalidTarget | ActorDead | Forbidden => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        self.code()
    }
}

/// Inconsistencies found while validating static registries.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("status '{0}' uses the stack policy but declares no max_stacks")]
    MissingMaxStacks(String),

    #[error("skill '{skill}' references unknown status '{status}'")]
    UnknownStatus { skill: String, status: String },

    #[error("item '{item}' references unknown status '{status}'")]
    UnknownItemStatus { item: String, status: String },

    #[error("skill '{skill}' has hit_chance {value} outside [0, 1]")]
    InvalidChance { skill: String, value: String },

    #[error("actor '{actor}' lists unknown skill '{skill}'")]
    UnknownSkill { actor: String, skill: String },
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingMaxStacks(_) => "REGISTRY_MISSING_MAX_STACKS",
            Self::UnknownStatus { .. } => "REGISTRY_UNKNOWN_STATUS",
            Self::UnknownItemStatus { .. } => "REGISTRY_UNKNOWN_ITEM_STATUS",
            Self::InvalidChance { .. } => "REGISTRY_INVALID_CHANCE",
            Self::UnknownSkill { .. } => "REGISTRY_UNKNOWN_SKILL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_reason_codes_are_snake_case() {
        assert_eq!(FailReason::NotEnoughResource.code(), "not_enough_resource");
        assert_eq!(FailReason::MissingItem.code(), "missing_item");
        assert_eq!(FailReason::NoEffect.code(), "no_effect");
    }

    #[test]
    fn registry_errors_are_fatal() {
        let err = RegistryError::MissingMaxStacks("bleed".into());
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert!(!err.severity().is_recoverable());
        assert_eq!(err.error_code(), "REGISTRY_MISSING_MAX_STACKS");
    }
}
