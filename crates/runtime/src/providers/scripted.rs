use std::collections::VecDeque;
use std::path::Path;

use combat_core::{EncounterView, PlayerChoice, PlayerInput};

use crate::error::{Result, RuntimeError};

/// Replays a fixed list of choices, then repeats `fallback`.
#[derive(Clone, Debug)]
pub struct ScriptedInput {
    choices: VecDeque<PlayerChoice>,
    fallback: PlayerChoice,
}

impl ScriptedInput {
    pub fn new(choices: impl IntoIterator<Item = PlayerChoice>, fallback: PlayerChoice) -> Self {
        Self {
            choices: choices.into_iter().collect(),
            fallback,
        }
    }

    /// Parses a JSON array of choices, e.g. `[{"choice": "defend"}]`.
    /// Attacks the first living enemy once the script runs out.
    pub fn from_json(json: &str) -> Result<Self> {
        let choices: Vec<PlayerChoice> = serde_json::from_str(json)?;
        Ok(Self::new(choices, PlayerChoice::Attack { target: None }))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| RuntimeError::Script {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Choices not yet handed out.
    pub fn remaining(&self) -> usize {
        self.choices.len()
    }
}

impl PlayerInput for ScriptedInput {
    fn choose(&mut self, _view: &EncounterView<'_>) -> PlayerChoice {
        self.choices
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
