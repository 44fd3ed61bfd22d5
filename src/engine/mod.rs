//! The authoritative match engine.

pub mod engine;

pub use engine::{GameEngine, MoveOutcome, RollOutcome};
