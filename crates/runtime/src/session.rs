//! One seeded encounter from configuration to report.

use std::time::{SystemTime, UNIX_EPOCH};

use combat_content::{ContentFactory, GameContent, embedded};
use combat_core::{Actor, Encounter, EncounterResult, PlayerInput, ResultKind};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::replay::log_digest;
use crate::rng::StdRngOracle;

/// Outcome of [`Session::run`].
#[derive(Clone, Debug)]
pub struct SessionReport {
    pub session_id: String,
    pub seed: u64,
    pub result: EncounterResult,
    /// Player state after the encounter, rewards included.
    pub player: Actor,
    pub enemies: Vec<Actor>,
    pub digest: String,
}

impl SessionReport {
    pub fn kind(&self) -> ResultKind {
        self.result.kind()
    }
}

/// Loaded content plus the knobs of one run.
#[derive(Debug)]
pub struct Session {
    content: GameContent,
    config: RuntimeConfig,
    seed: u64,
}

impl Session {
    /// Loads content from `config.data_dir`, or the embedded defaults.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let content = match &config.data_dir {
            Some(dir) => ContentFactory::new(dir).load_all(),
            None => embedded::load(),
        }
        .map_err(RuntimeError::Content)?;
        Ok(Self::with_content(content, config))
    }

    /// Uses already loaded content. `config.max_rounds` overrides the
    /// content's stalemate limit.
    pub fn with_content(mut content: GameContent, config: RuntimeConfig) -> Self {
        if let Some(max_rounds) = config.max_rounds {
            content.config.max_rounds = Some(max_rounds);
        }
        let seed = config.seed.unwrap_or_else(time_seed);
        Self {
            content,
            config,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn content(&self) -> &GameContent {
        &self.content
    }

    pub fn session_id(&self) -> String {
        self.config
            .session_id
            .clone()
            .unwrap_or_else(|| format!("session_{}", self.seed))
    }

    /// Spawns the configured room and fights it out. Spawning and combat
    /// draw from the same seeded stream.
    pub fn run(&self, input: &mut dyn PlayerInput) -> Result<SessionReport> {
        let mut rng = StdRngOracle::seeded(self.seed);
        let room = self
            .content
            .enemies
            .spawn_room(&self.config.room_name, &self.config.room, &mut rng)?;
        let player = self.content.spawn_player()?;

        tracing::info!(
            target: "combat::session",
            seed = self.seed,
            room = %room.name,
            enemies = room.enemies.len(),
            "starting session"
        );

        let encounter = Encounter::new(self.content.env(), player, room, rng);
        let (result, roster) = encounter.run(input);
        let digest = log_digest(result.log())?;
        let (player, enemies) = roster.into_parts();

        tracing::info!(
            target: "combat::session",
            result = result.kind().as_str(),
            events = result.log().len(),
            digest = %digest,
            "session finished"
        );

        Ok(SessionReport {
            session_id: self.session_id(),
            seed: self.seed,
            result,
            player,
            enemies,
            digest,
        })
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}
