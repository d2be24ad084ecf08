//! Runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Knobs for one combat session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Fixed seed; a time-based seed is drawn when absent.
    pub seed: Option<u64>,
    /// Content directory; the embedded content is used when absent.
    pub data_dir: Option<PathBuf>,
    /// Overrides the content's `max_rounds`.
    pub max_rounds: Option<u32>,
    pub session_id: Option<String>,
    /// JSON list of player choices to replay instead of the autopilot.
    pub script: Option<PathBuf>,
    pub room_name: String,
    /// Enemy template ids spawned into the room.
    pub room: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            data_dir: None,
            max_rounds: None,
            session_id: None,
            script: None,
            room_name: "crypt".to_string(),
            room: vec!["goblin".to_string(), "wolf".to_string()],
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_SEED` - RNG seed (default: time-based)
    /// - `COMBAT_DATA_DIR` - Content directory (default: embedded content)
    /// - `COMBAT_MAX_ROUNDS` - Stalemate limit override
    /// - `COMBAT_SESSION_ID` - Session identifier for log files
    /// - `COMBAT_SCRIPT` - Path to a JSON list of player choices
    /// - `COMBAT_ROOM` - Comma-separated enemy template ids (default: `goblin,wolf`)
    /// - `COMBAT_ROOM_NAME` - Room label used in the log
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.seed = read_var(&lookup, "COMBAT_SEED");
        config.max_rounds = read_var(&lookup, "COMBAT_MAX_ROUNDS");
        config.data_dir = lookup("COMBAT_DATA_DIR").map(PathBuf::from);
        config.script = lookup("COMBAT_SCRIPT").map(PathBuf::from);
        config.session_id = lookup("COMBAT_SESSION_ID").filter(|id| !id.is_empty());

        if let Some(name) = lookup("COMBAT_ROOM_NAME").filter(|name| !name.is_empty()) {
            config.room_name = name;
        }
        if let Some(room) = lookup("COMBAT_ROOM") {
            config.room = room
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect();
        }

        config
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
