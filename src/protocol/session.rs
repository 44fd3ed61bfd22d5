//! Per-match command dispatch.
//!
//! One `GameSession` wraps one authoritative engine. The hosting transport
//! feeds it commands one at a time (single writer per match) and broadcasts
//! whatever events come back. The `expect_turn_id` check is a cheap
//! idempotent guard against stale or retransmitted commands, not a
//! substitute for that serialization.

use log::{debug, info, warn};

use crate::core::{RuleError, RuleResult};
use crate::engine::GameEngine;
use crate::turn::TurnTransition;

use super::message::{Command, Event};
use super::snapshot::Snapshot;

/// A single match behind the protocol boundary.
#[derive(Clone, Debug)]
pub struct GameSession {
    engine: GameEngine,
}

impl GameSession {
    /// Start a fresh match.
    #[must_use]
    pub fn new(player_count: usize, seed: u64) -> Self {
        Self::with_engine(GameEngine::new(player_count, seed))
    }

    /// Wrap an existing engine (e.g. one built from a scripted dice source).
    #[must_use]
    pub fn with_engine(engine: GameEngine) -> Self {
        Self { engine }
    }

    /// Resume a match from its latest snapshot.
    pub fn resume(snapshot: &Snapshot, seed: u64) -> RuleResult<Self> {
        Ok(Self::with_engine(GameEngine::from_snapshot(snapshot, seed)?))
    }

    /// The wrapped engine.
    #[must_use]
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Process one command, returning the events to broadcast.
    ///
    /// A rule violation never leaves the session in a partial state; the
    /// resulting error event carries a fresh snapshot so the sender can
    /// resynchronize.
    pub fn handle(&mut self, command: Command) -> Vec<Event> {
        if command.expect_turn_id() != self.engine.turn_id() {
            warn!(
                "stale command: expected turn {}, current is {}",
                command.expect_turn_id(),
                self.engine.turn_id()
            );
            return vec![self.error_event(RuleError::InvalidCommandForTurn)];
        }

        match command {
            Command::RollDice { .. } => self.roll_dice(),
            Command::MoveToken {
                token_local_index, ..
            } => self.move_token(token_local_index),
        }
    }

    fn roll_dice(&mut self) -> Vec<Event> {
        let turn_id = self.engine.turn_id();
        match self.engine.roll_dice() {
            Ok(outcome) => {
                debug!("{} rolled {}", outcome.player, outcome.dice);
                vec![Event::DiceRolled {
                    player: outcome.player,
                    turn_id,
                    dice_value: outcome.dice,
                    movable_tokens_mask: outcome.movable,
                    forfeited_for_triple_six: outcome.forfeited_triple_six,
                    snapshot: self.engine.snapshot(),
                }]
            }
            Err(error) => vec![self.error_event(error)],
        }
    }

    fn move_token(&mut self, slot: u8) -> Vec<Event> {
        let turn_id = self.engine.turn_id();
        match self.engine.move_token(slot) {
            Ok(outcome) => {
                let snapshot = self.engine.snapshot();
                if outcome.won {
                    info!("{} won the match", outcome.player);
                }

                let mut events = vec![Event::TokenMoved {
                    player: outcome.player,
                    turn_id,
                    token_local_index: outcome.slot,
                    new_position: outcome.new_position,
                    captured_token: outcome.captured.map(|token| token as u8),
                    extra_turn: outcome.transition == TurnTransition::ExtraTurn,
                    game_won: outcome.won,
                    winner: self.engine.winner(),
                    snapshot: snapshot.clone(),
                }];
                if let TurnTransition::Advanced { from, to } = outcome.transition {
                    events.push(Event::TurnAdvanced {
                        previous_player: from,
                        next_player: to,
                        turn_id: self.engine.turn_id(),
                        snapshot,
                    });
                }
                events
            }
            Err(error) => vec![self.error_event(error)],
        }
    }

    fn error_event(&self, error: RuleError) -> Event {
        debug!("command rejected: {}", error);
        Event::Error {
            error_kind: error,
            message: error.to_string(),
            snapshot: self.engine.snapshot(),
        }
    }
}
