use crate::encounter::log::EventLog;

/// Terminal state of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResultKind {
    Victory,
    Defeat,
    Fled,
    NoEnemies,
    Stalemate,
}

impl ResultKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// What [`Encounter::run`](crate::encounter::Encounter::run) returns. Every
/// variant carries the complete event log.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "result", rename_all = "snake_case"))]
pub enum EncounterResult {
    Victory {
        log: EventLog,
        /// Item ids that dropped, in roll order.
        loot: Vec<String>,
        xp: u32,
        gold: u32,
    },
    Defeat {
        log: EventLog,
    },
    Fled {
        log: EventLog,
    },
    NoEnemies {
        log: EventLog,
    },
    Stalemate {
        log: EventLog,
        rounds: u32,
    },
}

impl EncounterResult {
    pub fn kind(&self) -> ResultKind {
        match self {
            EncounterResult::Victory { .. } => ResultKind::Victory,
            EncounterResult::Defeat { .. } => ResultKind::Defeat,
            EncounterResult::Fled { .. } => ResultKind::Fled,
            EncounterResult::NoEnemies { .. } => ResultKind::NoEnemies,
            EncounterResult::Stalemate { .. } => ResultKind::Stalemate,
        }
    }

    pub fn log(&self) -> &EventLog {
        match self {
            EncounterResult::Victory { log, .. }
            | EncounterResult::Defeat { log }
            | EncounterResult::Fled { log }
            | EncounterResult::NoEnemies { log }
            | EncounterResult::Stalemate { log, .. } => log,
        }
    }

    pub fn into_log(self) -> EventLog {
        match self {
            EncounterResult::Victory { log, .. }
            | EncounterResult::Defeat { log }
            | EncounterResult::Fled { log }
            | EncounterResult::NoEnemies { log }
            | EncounterResult::Stalemate { log, .. } => log,
        }
    }

    pub fn is_victory(&self) -> bool {
        matches!(self, EncounterResult::Victory { .. })
    }
}
