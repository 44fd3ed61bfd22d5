//! Match orchestration: board + turn machine + dice.
//!
//! `GameEngine` exposes the only two game-altering operations, `roll_dice`
//! and `move_token`. Everything else is derived: captures are resolved by
//! the board, turn passing by the turn machine, and the win is detected
//! after each move. The engine performs no I/O and never suspends; a match
//! is a single-writer state machine, and the dice source is owned by the
//! engine so seeded runs reproduce exactly.

use crate::board::{token_index, Board, TokenMask, TOKENS_PER_PLAYER};
use crate::core::{DiceRng, PlayerId, RuleError, RuleResult};
use crate::protocol::Snapshot;
use crate::turn::{Pending, RollDisposition, TurnState, TurnTransition};

/// What a roll did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollOutcome {
    /// Who rolled.
    pub player: PlayerId,
    /// The die face, 1-6.
    pub dice: u8,
    /// Tokens the roll authorized; empty when the turn passed without a move.
    pub movable: TokenMask,
    /// The roll was a third consecutive six and forfeited the turn.
    pub forfeited_triple_six: bool,
    /// The turn passed with no move (forfeiture or nothing movable).
    pub turn_passed: bool,
}

/// What a move did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Who moved.
    pub player: PlayerId,
    /// The moved token's local slot, 0-3.
    pub slot: u8,
    /// The token's new relative position.
    pub new_position: u8,
    /// Absolute index of a captured opponent token, if any.
    pub captured: Option<usize>,
    /// Whether the mover kept the turn or passed it on.
    pub transition: TurnTransition,
    /// The move completed the mover's fourth token; the match is decided.
    pub won: bool,
}

/// One match: authoritative state plus its private dice source.
#[derive(Clone, Debug)]
pub struct GameEngine {
    board: Board,
    turns: TurnState,
    rng: DiceRng,
    winner: Option<PlayerId>,
}

impl GameEngine {
    /// Create a fresh match. Identical seeds reproduce identical rolls.
    #[must_use]
    pub fn new(player_count: usize, seed: u64) -> Self {
        Self::with_rng(player_count, DiceRng::new(seed))
    }

    /// Create a fresh match with an explicit dice source.
    #[must_use]
    pub fn with_rng(player_count: usize, rng: DiceRng) -> Self {
        Self {
            board: Board::new(player_count),
            turns: TurnState::new(player_count),
            rng,
            winner: None,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.board.player_count()
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.turns.current_player()
    }

    #[must_use]
    pub fn turn_id(&self) -> u32 {
        self.turns.turn_id()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.turns.version()
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.winner.is_some()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn turns(&self) -> &TurnState {
        &self.turns
    }

    // === Operations ===

    /// Roll the dice for the current player.
    ///
    /// Fails with `GameAlreadyWon` once the match is decided and
    /// `NoTurnAvailable` while a roll is already pending. Depending on the
    /// roll, the engine is left awaiting a move or the turn passes on the
    /// spot (nothing movable, or the triple-six forfeiture).
    pub fn roll_dice(&mut self) -> RuleResult<RollOutcome> {
        if self.winner.is_some() {
            return Err(RuleError::GameAlreadyWon);
        }
        // Reject before drawing so a bad command never advances the dice
        // stream and seeded replays stay aligned.
        if matches!(self.turns.pending(), Pending::AwaitingMove { .. }) {
            return Err(RuleError::NoTurnAvailable);
        }

        let player = self.turns.current_player();
        let dice = self.rng.roll_die();
        let movable = self.board.movable_tokens(player, dice);
        let disposition = self.turns.record_roll(dice, movable)?;

        let outcome = match disposition {
            RollDisposition::AwaitingMove => RollOutcome {
                player,
                dice,
                movable,
                forfeited_triple_six: false,
                turn_passed: false,
            },
            RollDisposition::NoMovableTokens => RollOutcome {
                player,
                dice,
                movable: TokenMask::empty(),
                forfeited_triple_six: false,
                turn_passed: true,
            },
            RollDisposition::TripleSixForfeit => RollOutcome {
                player,
                dice,
                movable: TokenMask::empty(),
                forfeited_triple_six: true,
                turn_passed: true,
            },
        };
        Ok(outcome)
    }

    /// Move one of the current player's tokens by the pending roll.
    ///
    /// `slot` is the token's local index 0-3. Fails with `GameAlreadyWon`,
    /// `NoTurnAvailable` (no pending roll), `InvalidTokenIndex`, or
    /// `TokenNotMovable`; failures leave the match untouched. On success the
    /// capture is resolved, the win is checked, and the turn either stays
    /// (qualifying six) or passes.
    pub fn move_token(&mut self, slot: u8) -> RuleResult<MoveOutcome> {
        if self.winner.is_some() {
            return Err(RuleError::GameAlreadyWon);
        }
        let (dice, movable) = match self.turns.pending() {
            Pending::AwaitingMove { dice, movable } => (dice, movable),
            Pending::AwaitingRoll => return Err(RuleError::NoTurnAvailable),
        };
        if (slot as usize) >= TOKENS_PER_PLAYER {
            return Err(RuleError::InvalidTokenIndex);
        }
        if !movable.contains(slot) {
            return Err(RuleError::TokenNotMovable);
        }

        let player = self.turns.current_player();
        let token = token_index(player, slot as usize);
        let new_position = self.board.move_token(token, dice)?;
        let captured = self.board.try_capture_opponent(token);

        let won = self.board.has_player_won(player);
        if won {
            self.winner = Some(player);
        }

        let transition = self.turns.complete_move()?;

        Ok(MoveOutcome {
            player,
            slot,
            new_position,
            captured,
            transition,
            won,
        })
    }

    // === Snapshots ===

    /// Capture the full observable state for transmission.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player_count: self.board.player_count() as u8,
            current_player: self.turns.current_player(),
            consecutive_sixes: self.turns.consecutive_sixes(),
            last_dice_roll: self.turns.last_dice_roll(),
            movable_tokens_mask: self.turns.movable_tokens(),
            tokens: self.board.positions(),
            game_won: self.winner.is_some(),
            winner: self.winner,
            turn_id: self.turns.turn_id(),
            version: self.turns.version(),
        }
    }

    /// Rebuild a behaviorally-equivalent engine from a snapshot alone.
    ///
    /// Board, turn id, version, and won/winner fields compare equal to the
    /// authoritative engine at the moment the snapshot was taken. The dice
    /// source is fresh - snapshots deliberately carry no RNG state, since
    /// only the authoritative side rolls.
    pub fn from_snapshot(snapshot: &Snapshot, seed: u64) -> RuleResult<Self> {
        Self::from_snapshot_with_rng(snapshot, DiceRng::new(seed))
    }

    /// [`GameEngine::from_snapshot`] with an explicit dice source.
    pub fn from_snapshot_with_rng(snapshot: &Snapshot, rng: DiceRng) -> RuleResult<Self> {
        let player_count = snapshot.player_count as usize;
        let board = Board::from_positions(player_count, &snapshot.tokens)?;
        let turns = TurnState::restore(
            player_count,
            snapshot.current_player,
            snapshot.last_dice_roll,
            snapshot.movable_tokens_mask,
            snapshot.consecutive_sixes,
            snapshot.turn_id,
            snapshot.version,
        )?;

        if let Some(winner) = snapshot.winner {
            if winner.index() >= player_count {
                return Err(RuleError::InvalidPlayerIndex);
            }
        }
        if snapshot.game_won != snapshot.winner.is_some() {
            return Err(RuleError::InvalidPlayerIndex);
        }

        Ok(Self {
            board,
            turns,
            rng,
            winner: snapshot.winner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HOME;

    /// Snapshot of a 2-player match where player 0 needs one last move.
    fn near_win_snapshot() -> Snapshot {
        Snapshot {
            player_count: 2,
            current_player: PlayerId::new(0),
            consecutive_sixes: 0,
            last_dice_roll: 0,
            movable_tokens_mask: TokenMask::empty(),
            tokens: vec![HOME, HOME, HOME, 51, 0, 0, 0, 0],
            game_won: false,
            winner: None,
            turn_id: 40,
            version: 81,
        }
    }

    #[test]
    fn test_first_roll_six_opens_all_tokens() {
        let mut engine = GameEngine::with_rng(2, DiceRng::scripted(&[6]));

        let outcome = engine.roll_dice().unwrap();
        assert_eq!(outcome.player, PlayerId::new(0));
        assert_eq!(outcome.dice, 6);
        assert_eq!(outcome.movable.len(), 4);
        assert!(!outcome.turn_passed);
    }

    #[test]
    fn test_first_roll_non_six_passes_turn() {
        let mut engine = GameEngine::with_rng(2, DiceRng::scripted(&[3]));

        let outcome = engine.roll_dice().unwrap();
        assert_eq!(outcome.dice, 3);
        assert!(outcome.movable.is_empty());
        assert!(outcome.turn_passed);
        assert!(!outcome.forfeited_triple_six);
        assert_eq!(engine.current_player(), PlayerId::new(1));
    }

    #[test]
    fn test_move_after_base_exit() {
        let mut engine = GameEngine::with_rng(2, DiceRng::scripted(&[6]));
        engine.roll_dice().unwrap();

        let outcome = engine.move_token(0).unwrap();
        assert_eq!(outcome.new_position, 1);
        assert_eq!(outcome.captured, None);
        assert_eq!(outcome.transition, TurnTransition::ExtraTurn);
        assert!(!outcome.won);
        // The six granted an extra turn
        assert_eq!(engine.current_player(), PlayerId::new(0));
    }

    #[test]
    fn test_triple_six_forfeits_end_to_end() {
        let mut engine = GameEngine::with_rng(2, DiceRng::scripted(&[6, 6, 6]));

        engine.roll_dice().unwrap();
        engine.move_token(0).unwrap();
        engine.roll_dice().unwrap();
        engine.move_token(0).unwrap();

        // Third six: exposed to the caller, but no move is authorized
        let outcome = engine.roll_dice().unwrap();
        assert_eq!(outcome.dice, 6);
        assert!(outcome.forfeited_triple_six);
        assert!(outcome.turn_passed);
        assert!(outcome.movable.is_empty());
        assert_eq!(engine.current_player(), PlayerId::new(1));
        assert_eq!(engine.turns().consecutive_sixes(), 0);
    }

    #[test]
    fn test_roll_twice_rejected() {
        let mut engine = GameEngine::with_rng(2, DiceRng::scripted(&[6, 1]));
        engine.roll_dice().unwrap();

        assert_eq!(engine.roll_dice(), Err(RuleError::NoTurnAvailable));
        // The rejected roll must not consume a die: the next action still
        // sees the scripted sequence in order
        let outcome = engine.move_token(0).unwrap();
        assert_eq!(outcome.new_position, 1);
    }

    #[test]
    fn test_move_without_roll_rejected() {
        let mut engine = GameEngine::new(2, 42);

        assert_eq!(engine.move_token(0), Err(RuleError::NoTurnAvailable));
    }

    #[test]
    fn test_move_validation() {
        let mut engine = GameEngine::with_rng(2, DiceRng::scripted(&[6, 3]));
        engine.roll_dice().unwrap();

        assert_eq!(engine.move_token(4), Err(RuleError::InvalidTokenIndex));

        engine.move_token(0).unwrap();
        engine.roll_dice().unwrap();

        // With a 3, tokens still at base cannot move
        assert_eq!(engine.move_token(1), Err(RuleError::TokenNotMovable));
    }

    #[test]
    fn test_winning_move_and_game_over() {
        let engine = GameEngine::from_snapshot_with_rng(
            &near_win_snapshot(),
            DiceRng::scripted(&[6]),
        );
        let mut engine = engine.unwrap();

        let roll = engine.roll_dice().unwrap();
        assert_eq!(roll.dice, 6);
        assert!(roll.movable.contains(3));

        let outcome = engine.move_token(3).unwrap();
        assert_eq!(outcome.new_position, HOME);
        assert!(outcome.won);
        assert!(engine.is_won());
        assert_eq!(engine.winner(), Some(PlayerId::new(0)));

        assert_eq!(engine.roll_dice(), Err(RuleError::GameAlreadyWon));
        assert_eq!(engine.move_token(0), Err(RuleError::GameAlreadyWon));
    }

    #[test]
    fn test_seeded_engines_replay_identically() {
        let mut a = GameEngine::new(2, 99);
        let mut b = GameEngine::new(2, 99);

        for _ in 0..50 {
            if a.is_won() {
                break;
            }
            let ra = a.roll_dice().unwrap();
            let rb = b.roll_dice().unwrap();
            assert_eq!(ra, rb);

            if let Some(slot) = ra.movable.slots().next() {
                assert_eq!(a.move_token(slot).unwrap(), b.move_token(slot).unwrap());
            }
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut engine = GameEngine::with_rng(3, DiceRng::scripted(&[6, 2, 4]));
        engine.roll_dice().unwrap();
        engine.move_token(0).unwrap();
        engine.roll_dice().unwrap();

        let snapshot = engine.snapshot();
        let rebuilt = GameEngine::from_snapshot(&snapshot, 7).unwrap();

        assert_eq!(rebuilt.snapshot(), snapshot);
        assert_eq!(rebuilt.board(), engine.board());
        assert_eq!(rebuilt.turn_id(), engine.turn_id());
        assert_eq!(rebuilt.version(), engine.version());
        assert_eq!(rebuilt.winner(), engine.winner());
    }

    #[test]
    fn test_from_snapshot_rejects_incoherent_win_flag() {
        let mut snapshot = near_win_snapshot();
        snapshot.game_won = true; // but no winner recorded

        assert_eq!(
            GameEngine::from_snapshot(&snapshot, 0).unwrap_err(),
            RuleError::InvalidPlayerIndex
        );
    }

    #[test]
    fn test_from_snapshot_rejects_bad_positions() {
        let mut snapshot = near_win_snapshot();
        snapshot.tokens[0] = 58;

        assert_eq!(
            GameEngine::from_snapshot(&snapshot, 0).unwrap_err(),
            RuleError::InvalidTokenIndex
        );
    }
}
