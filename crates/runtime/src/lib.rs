//! Session orchestration around the combat rules.
//!
//! This crate wires content, randomness and player input into a runnable
//! encounter:
//! - [`config`] reads the runtime knobs from the environment
//! - [`providers`] supplies [`PlayerInput`](combat_core::PlayerInput) implementations
//! - [`rng`] adapts `rand` to the core [`RngOracle`](combat_core::RngOracle)
//! - [`session`] spawns a room and runs it to completion
//! - [`replay`] exports and fingerprints the event log
pub mod config;
pub mod error;
pub mod providers;
pub mod replay;
pub mod rng;
pub mod session;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use providers::{AutoPilot, ScriptedInput};
pub use replay::{log_digest, write_json_lines};
pub use rng::StdRngOracle;
pub use session::{Session, SessionReport};
