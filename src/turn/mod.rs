//! Turn sequencing: whose turn, what was rolled, when it passes.

pub mod turn;

pub use turn::{Pending, RollDisposition, TurnState, TurnTransition, FORFEIT_SIXES};
