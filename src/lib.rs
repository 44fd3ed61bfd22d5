//! # ludo-core
//!
//! A deterministic Ludo engine plus the protocol that keeps a server's
//! authoritative match state and remote clients synchronized.
//!
//! ## Design Principles
//!
//! 1. **Authoritative server**: A client can only propose actions, never
//!    dictate outcomes. Every proposal is validated against the real state.
//!
//! 2. **Deterministic by seed**: The same seed reproduces the same match,
//!    which makes tests and replays exact.
//!
//! 3. **Errors are values**: Expected rule violations come back as
//!    `RuleError`, never as panics; callers branch on them as normal
//!    control flow.
//!
//! ## Architecture
//!
//! Leaves first:
//!
//! - `board`: positional truth - token coordinates, the relative-to-ring
//!   transform, movement/capture/win rules. No turn concept.
//! - `turn`: the dice/turn state machine - whose turn, what was rolled,
//!   consecutive sixes, the forfeiture rule. No board knowledge.
//! - `engine`: orchestrates board + turns + a private dice source and
//!   exposes the only two game-altering operations.
//! - `protocol`: the command/event/snapshot vocabulary used to replicate a
//!   match across a network boundary, with turn-id optimistic concurrency.
//!
//! A match is a single-writer state machine: process one command at a time
//! per match and no locking is needed.
//!
//! ```
//! use ludo_core::protocol::{Command, Event, GameSession};
//!
//! let mut session = GameSession::new(2, 42);
//!
//! let events = session.handle(Command::RollDice { expect_turn_id: 0 });
//! assert!(matches!(events[0], Event::DiceRolled { .. }));
//! ```

pub mod board;
pub mod core;
pub mod engine;
pub mod protocol;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{DiceRng, PlayerId, RuleError, RuleResult, MAX_PLAYERS, MIN_PLAYERS};

pub use crate::board::{
    token_index, Board, Square, TokenMask, BASE, HOME, SAFE_RING_CELLS, TOKENS_PER_PLAYER,
};

pub use crate::turn::{Pending, RollDisposition, TurnState, TurnTransition, FORFEIT_SIXES};

pub use crate::engine::{GameEngine, MoveOutcome, RollOutcome};

pub use crate::protocol::{Command, Event, GameSession, Snapshot};
