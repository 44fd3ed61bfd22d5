//! Command and event vocabulary.
//!
//! Two inbound commands, four outbound events, all `type`-tagged camelCase
//! JSON. Every command carries the turn id the client believes is current;
//! every event carries a trailing snapshot so clients can resynchronize
//! even on failure.

use serde::{Deserialize, Serialize};

use crate::board::TokenMask;
use crate::core::{PlayerId, RuleError};

use super::snapshot::Snapshot;

/// Client -> server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Roll for the current player.
    #[serde(rename = "RollDiceCommand", rename_all = "camelCase")]
    RollDice { expect_turn_id: u32 },

    /// Move one of the current player's tokens by the pending roll.
    #[serde(rename = "MoveTokenCommand", rename_all = "camelCase")]
    MoveToken {
        expect_turn_id: u32,
        token_local_index: u8,
    },
}

impl Command {
    /// The turn id the sender believed was current.
    #[must_use]
    pub fn expect_turn_id(&self) -> u32 {
        match self {
            Command::RollDice { expect_turn_id }
            | Command::MoveToken { expect_turn_id, .. } => *expect_turn_id,
        }
    }
}

/// Server -> all clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A roll was accepted. `turn_id` is the turn the roll belonged to.
    #[serde(rename = "DiceRolledEvent", rename_all = "camelCase")]
    DiceRolled {
        player: PlayerId,
        turn_id: u32,
        dice_value: u8,
        movable_tokens_mask: TokenMask,
        forfeited_for_triple_six: bool,
        snapshot: Snapshot,
    },

    /// A move was applied.
    #[serde(rename = "TokenMovedEvent", rename_all = "camelCase")]
    TokenMoved {
        player: PlayerId,
        turn_id: u32,
        token_local_index: u8,
        new_position: u8,
        /// Absolute index of the captured token, `-1` on the wire for none.
        #[serde(with = "super::snapshot::token_or_none")]
        captured_token: Option<u8>,
        extra_turn: bool,
        game_won: bool,
        #[serde(with = "super::snapshot::player_or_none")]
        winner: Option<PlayerId>,
        snapshot: Snapshot,
    },

    /// The seat changed. Not emitted for extra turns; `turn_id` is the new
    /// current turn.
    #[serde(rename = "TurnAdvancedEvent", rename_all = "camelCase")]
    TurnAdvanced {
        previous_player: PlayerId,
        next_player: PlayerId,
        turn_id: u32,
        snapshot: Snapshot,
    },

    /// A command was rejected; state is unchanged and the attached snapshot
    /// is authoritative.
    #[serde(rename = "ErrorEvent", rename_all = "camelCase")]
    Error {
        error_kind: RuleError,
        message: String,
        snapshot: Snapshot,
    },
}
