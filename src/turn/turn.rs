//! The dice/turn sequencing state machine.
//!
//! `TurnState` knows whose turn it is, what was rolled, and which tokens the
//! roll authorized - it has no board knowledge. The pending roll is a tagged
//! state ([`Pending`]) so that "rolled but no roll stored" and similar flag
//! combinations cannot be represented.
//!
//! ## Counters
//!
//! - `turn_id` identifies the current roll-move opportunity. It increments
//!   whenever a turn is consumed: a move completes, a roll finds no movable
//!   token, or the third consecutive six forfeits the turn. Extra turns
//!   count too, so a retransmitted move command can never apply twice.
//! - `version` increments on every successful mutation (each roll and each
//!   consumed turn), so `version >= turn_id` always holds.

use serde::{Deserialize, Serialize};

use crate::board::TokenMask;
use crate::core::{PlayerId, RuleError, RuleResult, MAX_PLAYERS, MIN_PLAYERS};

/// Sixes in a row that forfeit the turn.
pub const FORFEIT_SIXES: u8 = 3;

/// The roll half of the turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pending {
    /// No roll yet; the current player must roll.
    AwaitingRoll,
    /// A roll produced at least one movable token; the current player must
    /// pick one.
    AwaitingMove { dice: u8, movable: TokenMask },
}

/// How a recorded roll left the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RollDisposition {
    /// The player now has to move one of the authorized tokens.
    AwaitingMove,
    /// No token could move; the turn passed without a move.
    NoMovableTokens,
    /// Third six in a row; the roll is shown but authorizes no move and the
    /// turn passes.
    TripleSixForfeit,
}

/// How a completed move left the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnTransition {
    /// The mover rolled a qualifying six and keeps the turn.
    ExtraTurn,
    /// The turn passed to the next player.
    Advanced { from: PlayerId, to: PlayerId },
}

/// Dice/turn sequencing state. Created once per game, never reset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    player_count: usize,
    current: PlayerId,
    pending: Pending,
    consecutive_sixes: u8,
    turn_id: u32,
    version: u64,
}

impl TurnState {
    /// Create turn state for a fresh game; player 0 starts.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        assert!(
            (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count),
            "Player count must be 2-4"
        );

        Self {
            player_count,
            current: PlayerId::new(0),
            pending: Pending::AwaitingRoll,
            consecutive_sixes: 0,
            turn_id: 0,
            version: 0,
        }
    }

    /// Rebuild turn state from snapshot fields.
    ///
    /// `last_roll` of 0 means no pending roll, in which case the movable
    /// mask must be empty.
    pub fn restore(
        player_count: usize,
        current: PlayerId,
        last_roll: u8,
        movable: TokenMask,
        consecutive_sixes: u8,
        turn_id: u32,
        version: u64,
    ) -> RuleResult<Self> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count)
            || current.index() >= player_count
        {
            return Err(RuleError::InvalidPlayerIndex);
        }
        if consecutive_sixes > FORFEIT_SIXES {
            return Err(RuleError::InvalidDiceRoll);
        }

        let pending = match last_roll {
            0 => {
                if !movable.is_empty() {
                    return Err(RuleError::InvalidDiceRoll);
                }
                Pending::AwaitingRoll
            }
            1..=6 => Pending::AwaitingMove {
                dice: last_roll,
                movable,
            },
            _ => return Err(RuleError::InvalidDiceRoll),
        };

        Ok(Self {
            player_count,
            current,
            pending,
            consecutive_sixes,
            turn_id,
            version,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    #[must_use]
    pub fn pending(&self) -> Pending {
        self.pending
    }

    /// The pending roll's dice value, 0 when no roll is pending.
    #[must_use]
    pub fn last_dice_roll(&self) -> u8 {
        match self.pending {
            Pending::AwaitingRoll => 0,
            Pending::AwaitingMove { dice, .. } => dice,
        }
    }

    /// The tokens authorized by the pending roll; empty when none is.
    #[must_use]
    pub fn movable_tokens(&self) -> TokenMask {
        match self.pending {
            Pending::AwaitingRoll => TokenMask::empty(),
            Pending::AwaitingMove { movable, .. } => movable,
        }
    }

    #[must_use]
    pub fn consecutive_sixes(&self) -> u8 {
        self.consecutive_sixes
    }

    #[must_use]
    pub fn turn_id(&self) -> u32 {
        self.turn_id
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    // === Transitions ===

    /// Record a roll for the current player.
    ///
    /// Counts consecutive sixes and applies the forfeiture and no-movable
    /// rules. Fails with `NoTurnAvailable` if a roll is already pending and
    /// `InvalidDiceRoll` for a value outside 1-6.
    pub fn record_roll(&mut self, dice: u8, movable: TokenMask) -> RuleResult<RollDisposition> {
        if !(1..=6).contains(&dice) {
            return Err(RuleError::InvalidDiceRoll);
        }
        if matches!(self.pending, Pending::AwaitingMove { .. }) {
            return Err(RuleError::NoTurnAvailable);
        }

        self.version += 1;
        if dice == 6 {
            self.consecutive_sixes += 1;
        } else {
            self.consecutive_sixes = 0;
        }

        if self.consecutive_sixes >= FORFEIT_SIXES {
            self.consume_turn();
            self.advance();
            return Ok(RollDisposition::TripleSixForfeit);
        }
        if movable.is_empty() {
            self.consume_turn();
            self.advance();
            return Ok(RollDisposition::NoMovableTokens);
        }

        self.pending = Pending::AwaitingMove { dice, movable };
        Ok(RollDisposition::AwaitingMove)
    }

    /// Apply the post-move transition after the pending roll's move.
    ///
    /// A qualifying six keeps the turn with the same player (six counter
    /// preserved); anything else passes it on. Fails with `NoTurnAvailable`
    /// when no roll is pending.
    pub fn complete_move(&mut self) -> RuleResult<TurnTransition> {
        let Pending::AwaitingMove { dice, .. } = self.pending else {
            return Err(RuleError::NoTurnAvailable);
        };

        self.version += 1;
        self.consume_turn();
        if dice == 6 {
            Ok(TurnTransition::ExtraTurn)
        } else {
            let from = self.current;
            self.advance();
            Ok(TurnTransition::Advanced {
                from,
                to: self.current,
            })
        }
    }

    /// Close the current roll-move opportunity.
    fn consume_turn(&mut self) {
        self.turn_id += 1;
        self.pending = Pending::AwaitingRoll;
    }

    /// Hand the turn to the next player.
    fn advance(&mut self) {
        self.current = self.current.next(self.player_count);
        self.consecutive_sixes = 0;
    }
}
