//! Player input providers.
//!
//! The controller asks a [`PlayerInput`](combat_core::PlayerInput) whenever
//! the player can act. Sessions run with a recorded script or with a simple
//! heuristic policy.
mod autopilot;
mod scripted;

pub use autopilot::AutoPilot;
pub use scripted::ScriptedInput;
