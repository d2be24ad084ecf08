//! Skirmish: runs one seeded encounter and prints its event log.
//!
//! Configuration comes from the environment (see
//! [`RuntimeConfig::from_env`]); a `.env` file in the working directory is
//! honoured. Events go to stdout as JSON lines, diagnostics to stderr and a
//! per-session log file.
//!
//! ```bash
//! COMBAT_SEED=7 COMBAT_ROOM=ogre,goblin skirmish > fight.jsonl
//! ```

mod logging;

use anyhow::Result;
use combat_runtime::{AutoPilot, RuntimeConfig, ScriptedInput, Session, write_json_lines};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = RuntimeConfig::from_env();
    let _guard = logging::setup_logging(config.session_id.as_deref())?;

    let session = Session::new(config.clone())?;
    tracing::info!("Seed: {}", session.seed());

    let report = match &config.script {
        Some(path) => {
            tracing::info!("Replaying choices from {}", path.display());
            session.run(&mut ScriptedInput::from_file(path)?)?
        }
        None => session.run(&mut AutoPilot::default())?,
    };

    write_json_lines(report.result.log(), std::io::stdout().lock())?;

    let player = &report.player;
    tracing::info!(
        "Result: {} | {} hp {}/{} | level {} | gold {}",
        report.kind().as_str(),
        player.name,
        player.hp(),
        player.max_hp(),
        player.progression.level,
        player.progression.gold
    );
    tracing::info!("Replay digest: {}", report.digest);
    Ok(())
}
