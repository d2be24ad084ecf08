//! Encounter controller: the round loop that drives every other component.
//!
//! # Module Structure
//!
//! - `controller`: [`Encounter`], round steps and termination
//! - `initiative`: turn order
//! - `input`: the [`PlayerInput`] seam and the read-only view it receives
//! - `log`: the append-only [`EventLog`]
//! - `rewards`: loot, xp and level-ups on victory
//! - `result`: [`EncounterResult`]

mod controller;
mod initiative;
mod input;
mod log;
mod result;
mod rewards;

pub use controller::{Encounter, Room};
pub use initiative::{initiative_order, speed_of};
pub use input::{EncounterView, PlayerChoice, PlayerInput};
pub use log::{CombatEvent, EventLog};
pub use result::{EncounterResult, ResultKind};
pub use rewards::{Rewards, gain_xp, grant_rewards};
