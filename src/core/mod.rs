//! Core engine types: players, dice, errors.
//!
//! This module contains the fundamental building blocks shared by the board,
//! the turn machine, the engine, and the protocol layer.

pub mod error;
pub mod player;
pub mod rng;

pub use error::{RuleError, RuleResult};
pub use player::{PlayerId, MAX_PLAYERS, MIN_PLAYERS};
pub use rng::DiceRng;
