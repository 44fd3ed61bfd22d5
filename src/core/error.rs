//! One error vocabulary for the whole engine.
//!
//! Every domain-expected failure (bad input, illegal move, wrong turn, game
//! already decided) is a `RuleError` value returned through `RuleResult`.
//! Callers branch on these as normal control flow; a failed operation leaves
//! state untouched. The enumeration is closed because error kinds cross the
//! wire by symbolic name.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A rule violation or invalid input, reported as a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RuleError {
    #[error("token index out of range")]
    InvalidTokenIndex,

    #[error("player index out of range")]
    InvalidPlayerIndex,

    #[error("dice value must be 1-6")]
    InvalidDiceRoll,

    #[error("command does not match the current turn")]
    InvalidCommandForTurn,

    #[error("token cannot move with the current roll")]
    TokenNotMovable,

    #[error("token is already home")]
    TokenAlreadyHome,

    #[error("a token can only leave base on a six")]
    CannotLeaveBaseWithoutSix,

    #[error("move would overshoot home")]
    WouldOvershootHome,

    #[error("no action is available for this turn")]
    NoTurnAvailable,

    #[error("the game has already been won")]
    GameAlreadyWon,
}

/// Convenience Result type for engine operations.
pub type RuleResult<T> = std::result::Result<T, RuleError>;
