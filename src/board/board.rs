//! Positional truth: token coordinates and movement/capture/win rules.
//!
//! ## Coordinates
//!
//! Every token coordinate is **player-relative**:
//!
//! - `0` - base (not yet in play)
//! - `1..=51` - main track; each player's own track starts at 1
//! - `52..=56` - home stretch (private five-cell lane)
//! - `57` - home (terminal, token retired)
//!
//! The main track is a single shared 52-cell ring. A relative coordinate `r`
//! of player `p` maps to the absolute ring cell via an offset of `13 * p`
//! cells - doubled for a 2-player match so the seats face each other - modulo
//! 52, 1-based. Captures are detected in ring coordinates; everything else
//! works in relative coordinates.
//!
//! The board has no turn concept. It validates and applies single moves,
//! resolves captures, and answers queries; turn order lives in
//! [`TurnState`](crate::turn::TurnState).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{PlayerId, RuleError, RuleResult, MAX_PLAYERS, MIN_PLAYERS};

use super::TokenMask;

/// Tokens per player.
pub const TOKENS_PER_PLAYER: usize = 4;

/// Base coordinate (not yet in play).
pub const BASE: u8 = 0;

/// First main-track coordinate.
pub const TRACK_FIRST: u8 = 1;

/// Last main-track coordinate.
pub const TRACK_LAST: u8 = 51;

/// First home-stretch coordinate.
pub const STRETCH_FIRST: u8 = 52;

/// Last home-stretch coordinate.
pub const STRETCH_LAST: u8 = 56;

/// Home coordinate (terminal).
pub const HOME: u8 = 57;

/// Number of cells on the shared ring.
pub const RING_LEN: u16 = 52;

/// Absolute ring cells where a token cannot be captured.
pub const SAFE_RING_CELLS: [u8; 4] = [1, 14, 27, 40];

/// Classification of a raw token coordinate.
///
/// Keeps the range boundaries in one place; all predicates go through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Square {
    /// At base, coordinate 0.
    Base,
    /// On the main track, relative coordinate 1-51.
    Track(u8),
    /// On the home stretch, coordinate 52-56.
    Stretch(u8),
    /// Home, coordinate 57.
    Home,
}

impl Square {
    /// Classify a raw coordinate. `None` if outside the position domain.
    #[must_use]
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            BASE => Some(Square::Base),
            TRACK_FIRST..=TRACK_LAST => Some(Square::Track(raw)),
            STRETCH_FIRST..=STRETCH_LAST => Some(Square::Stretch(raw)),
            HOME => Some(Square::Home),
            _ => None,
        }
    }

    /// The raw coordinate.
    #[must_use]
    pub fn raw(self) -> u8 {
        match self {
            Square::Base => BASE,
            Square::Track(r) | Square::Stretch(r) => r,
            Square::Home => HOME,
        }
    }

    #[must_use]
    pub fn is_base(self) -> bool {
        self == Square::Base
    }

    #[must_use]
    pub fn is_track(self) -> bool {
        matches!(self, Square::Track(_))
    }

    #[must_use]
    pub fn is_stretch(self) -> bool {
        matches!(self, Square::Stretch(_))
    }

    #[must_use]
    pub fn is_home(self) -> bool {
        self == Square::Home
    }
}

/// Compute where a token at `current` would land with `dice`.
///
/// Pure; shared by the real move and the movable-mask query.
fn move_target(current: u8, dice: u8) -> RuleResult<u8> {
    if !(1..=6).contains(&dice) {
        return Err(RuleError::InvalidDiceRoll);
    }

    let square = Square::from_raw(current).ok_or(RuleError::InvalidTokenIndex)?;
    match square {
        Square::Home => Err(RuleError::TokenAlreadyHome),
        Square::Base => {
            if dice == 6 {
                Ok(TRACK_FIRST)
            } else {
                Err(RuleError::CannotLeaveBaseWithoutSix)
            }
        }
        // The stretch starts right after the track, so advancing is linear
        // in both; only the home bound matters. Landing exactly on home
        // retires the token, overshoot is rejected, never clamped.
        Square::Track(pos) | Square::Stretch(pos) => {
            let target = pos + dice;
            if target > HOME {
                Err(RuleError::WouldOvershootHome)
            } else {
                Ok(target)
            }
        }
    }
}

/// The board: all token positions plus pure position math.
///
/// Tokens are stored as one four-slot group per seat: the outer index is
/// the player index, the inner index the token's local slot 0-3.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tokens: Vec<[u8; TOKENS_PER_PLAYER]>,
}

impl Board {
    /// Create a board with every token at base.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        assert!(
            (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count),
            "Player count must be 2-4"
        );
        Self {
            tokens: vec![[BASE; TOKENS_PER_PLAYER]; player_count],
        }
    }

    /// Rebuild a board from a flat position list in absolute token order.
    ///
    /// Used by snapshot rehydration; rejects lists of the wrong length and
    /// coordinates outside the position domain.
    pub fn from_positions(player_count: usize, positions: &[u8]) -> RuleResult<Self> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(RuleError::InvalidPlayerIndex);
        }
        if positions.len() != player_count * TOKENS_PER_PLAYER {
            return Err(RuleError::InvalidTokenIndex);
        }
        if positions.iter().any(|&p| Square::from_raw(p).is_none()) {
            return Err(RuleError::InvalidTokenIndex);
        }

        let tokens = positions
            .chunks_exact(TOKENS_PER_PLAYER)
            .map(|chunk| {
                let mut group = [BASE; TOKENS_PER_PLAYER];
                group.copy_from_slice(chunk);
                group
            })
            .collect();
        Ok(Self { tokens })
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.tokens.len()
    }

    /// Total number of tokens on the board.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.player_count() * TOKENS_PER_PLAYER
    }

    /// All positions as a flat list in absolute token order.
    #[must_use]
    pub fn positions(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.token_count());
        for group in &self.tokens {
            out.extend_from_slice(group);
        }
        out
    }

    /// A token's relative position.
    pub fn position(&self, token: usize) -> RuleResult<u8> {
        let (player, slot) = self.split_index(token)?;
        Ok(self.tokens[player.index()][slot])
    }

    /// Classify a token's position.
    pub fn square(&self, token: usize) -> RuleResult<Square> {
        let raw = self.position(token)?;
        // Positions are validated on every write, so this cannot fail.
        Square::from_raw(raw).ok_or(RuleError::InvalidTokenIndex)
    }

    /// Whether a token rests where it cannot be captured.
    ///
    /// Home stretch and home are always safe (private lanes); main-track
    /// safety is looked up by absolute ring cell. A token at base is not on
    /// a tile at all and reports `false`.
    pub fn is_on_safe_tile(&self, token: usize) -> RuleResult<bool> {
        let (player, slot) = self.split_index(token)?;
        match Square::from_raw(self.tokens[player.index()][slot])
            .ok_or(RuleError::InvalidTokenIndex)?
        {
            Square::Base => Ok(false),
            Square::Stretch(_) | Square::Home => Ok(true),
            Square::Track(pos) => Ok(SAFE_RING_CELLS.contains(&self.ring_position(player, pos))),
        }
    }

    // === Coordinate transforms ===

    /// Map a player-relative track coordinate to the shared ring cell.
    ///
    /// Seats are spread 13 cells apart; with exactly two players the spread
    /// doubles so the seats face each other across the ring.
    #[must_use]
    pub fn ring_position(&self, player: PlayerId, relative: u8) -> u8 {
        debug_assert!((TRACK_FIRST..=TRACK_LAST).contains(&relative));

        let stride: u16 = if self.player_count() == 2 { 26 } else { 13 };
        let offset = stride * player.index() as u16;
        ((relative as u16 - 1 + offset) % RING_LEN + 1) as u8
    }

    // === Moves ===

    /// Move a token by a dice value, returning its new relative position.
    ///
    /// Applies the full movement rule: base exit only on a six, linear
    /// advance along track and stretch, exact landing on home, overshoot
    /// rejected. On any error the board is untouched.
    pub fn move_token(&mut self, token: usize, dice: u8) -> RuleResult<u8> {
        let (player, slot) = self.split_index(token)?;
        let target = move_target(self.tokens[player.index()][slot], dice)?;
        self.tokens[player.index()][slot] = target;
        Ok(target)
    }

    /// Resolve a capture after `moved_token` has landed.
    ///
    /// Captures only happen on the shared ring, never on a safe cell. If
    /// exactly one opposing token occupies the landing cell it is sent back
    /// to base and its absolute index is returned. Two or more opposing
    /// tokens form a blockade and nothing happens. "No capture" is a normal
    /// outcome, not an error.
    pub fn try_capture_opponent(&mut self, moved_token: usize) -> Option<usize> {
        let (owner, slot) = self.split_index(moved_token).ok()?;
        let relative = self.tokens[owner.index()][slot];
        if !(TRACK_FIRST..=TRACK_LAST).contains(&relative) {
            return None;
        }

        let cell = self.ring_position(owner, relative);
        if SAFE_RING_CELLS.contains(&cell) {
            return None;
        }

        let mut occupants: SmallVec<[(PlayerId, usize); 4]> = SmallVec::new();
        for player in PlayerId::all(self.player_count()) {
            if player == owner {
                continue;
            }
            for (other_slot, &pos) in self.tokens[player.index()].iter().enumerate() {
                if (TRACK_FIRST..=TRACK_LAST).contains(&pos)
                    && self.ring_position(player, pos) == cell
                {
                    occupants.push((player, other_slot));
                }
            }
        }

        match occupants.as_slice() {
            [(victim, victim_slot)] => {
                let (victim, victim_slot) = (*victim, *victim_slot);
                self.tokens[victim.index()][victim_slot] = BASE;
                Some(token_index(victim, victim_slot))
            }
            _ => None,
        }
    }

    // === Queries ===

    /// Which of a player's tokens can legally move with this dice value.
    ///
    /// A slot is set iff the hypothetical [`Board::move_token`] would
    /// succeed, including the base-exit special case.
    #[must_use]
    pub fn movable_tokens(&self, player: PlayerId, dice: u8) -> TokenMask {
        let mut mask = TokenMask::empty();
        for slot in 0..TOKENS_PER_PLAYER {
            if move_target(self.tokens[player.index()][slot], dice).is_ok() {
                mask.insert(slot as u8);
            }
        }
        mask
    }

    /// Whether all four of a player's tokens are home.
    #[must_use]
    pub fn has_player_won(&self, player: PlayerId) -> bool {
        self.tokens[player.index()].iter().all(|&pos| pos == HOME)
    }

    fn split_index(&self, token: usize) -> RuleResult<(PlayerId, usize)> {
        if token >= self.token_count() {
            return Err(RuleError::InvalidTokenIndex);
        }
        Ok((
            PlayerId::new((token / TOKENS_PER_PLAYER) as u8),
            token % TOKENS_PER_PLAYER,
        ))
    }
}

/// Absolute token index of a player's local slot.
#[must_use]
pub fn token_index(player: PlayerId, slot: usize) -> usize {
    player.index() * TOKENS_PER_PLAYER + slot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(player_count: usize, positions: &[u8]) -> Board {
        Board::from_positions(player_count, positions).unwrap()
    }

    #[test]
    fn test_new_board_all_at_base() {
        let board = Board::new(4);

        assert_eq!(board.token_count(), 16);
        assert!(board.positions().iter().all(|&p| p == BASE));
    }

    #[test]
    fn test_square_classification() {
        assert_eq!(Square::from_raw(0), Some(Square::Base));
        assert_eq!(Square::from_raw(1), Some(Square::Track(1)));
        assert_eq!(Square::from_raw(51), Some(Square::Track(51)));
        assert_eq!(Square::from_raw(52), Some(Square::Stretch(52)));
        assert_eq!(Square::from_raw(56), Some(Square::Stretch(56)));
        assert_eq!(Square::from_raw(57), Some(Square::Home));
        assert_eq!(Square::from_raw(58), None);
        assert_eq!(Square::from_raw(255), None);
    }

    #[test]
    fn test_base_exit_requires_six() {
        let mut board = Board::new(2);

        for dice in 1..=5 {
            assert_eq!(
                board.move_token(0, dice),
                Err(RuleError::CannotLeaveBaseWithoutSix)
            );
        }
        assert_eq!(board.move_token(0, 6), Ok(TRACK_FIRST));
    }

    #[test]
    fn test_track_advance() {
        let mut board = board_with(2, &[10, 0, 0, 0, 0, 0, 0, 0]);

        assert_eq!(board.move_token(0, 4), Ok(14));
        assert_eq!(board.position(0), Ok(14));
    }

    #[test]
    fn test_track_crosses_into_stretch() {
        let mut board = board_with(2, &[50, 0, 0, 0, 0, 0, 0, 0]);

        // 50 + 3 crosses 51 with two steps into the stretch
        assert_eq!(board.move_token(0, 3), Ok(53));
    }

    #[test]
    fn test_exact_landing_on_home() {
        let mut board = board_with(2, &[51, 0, 0, 0, 0, 0, 0, 0]);

        assert_eq!(board.move_token(0, 6), Ok(HOME));
        assert_eq!(board.square(0), Ok(Square::Home));
    }

    #[test]
    fn test_overshoot_rejected_from_stretch() {
        let mut board = board_with(2, &[55, 0, 0, 0, 0, 0, 0, 0]);

        assert_eq!(board.move_token(0, 3), Err(RuleError::WouldOvershootHome));
        // Rejected moves leave the board untouched
        assert_eq!(board.position(0), Ok(55));
    }

    #[test]
    fn test_overshoot_rejected_from_track() {
        let mut board = board_with(2, &[50, 0, 0, 0, 0, 0, 0, 0]);

        // 50 + 6 = 56 is fine, but from 53 a 5 would pass home
        assert_eq!(board.move_token(0, 6), Ok(56));

        let mut board = board_with(2, &[53, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(board.move_token(0, 5), Err(RuleError::WouldOvershootHome));
    }

    #[test]
    fn test_home_token_cannot_move() {
        let mut board = board_with(2, &[HOME, 0, 0, 0, 0, 0, 0, 0]);

        assert_eq!(board.move_token(0, 1), Err(RuleError::TokenAlreadyHome));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut board = Board::new(2);

        assert_eq!(board.move_token(8, 3), Err(RuleError::InvalidTokenIndex));
        assert_eq!(board.move_token(0, 0), Err(RuleError::InvalidDiceRoll));
        assert_eq!(board.move_token(0, 7), Err(RuleError::InvalidDiceRoll));
    }

    #[test]
    fn test_ring_position_offsets() {
        let board = Board::new(4);

        // Seats are 13 cells apart with 3-4 players
        assert_eq!(board.ring_position(PlayerId::new(0), 1), 1);
        assert_eq!(board.ring_position(PlayerId::new(1), 1), 14);
        assert_eq!(board.ring_position(PlayerId::new(2), 1), 27);
        assert_eq!(board.ring_position(PlayerId::new(3), 1), 40);

        // Wrap past the end of the ring
        assert_eq!(board.ring_position(PlayerId::new(3), 13), 52);
        assert_eq!(board.ring_position(PlayerId::new(3), 14), 1);
    }

    #[test]
    fn test_ring_position_two_player_doubling() {
        let board = Board::new(2);

        // Two players sit opposite each other
        assert_eq!(board.ring_position(PlayerId::new(0), 1), 1);
        assert_eq!(board.ring_position(PlayerId::new(1), 1), 27);
        assert_eq!(board.ring_position(PlayerId::new(1), 26), 52);
        assert_eq!(board.ring_position(PlayerId::new(1), 27), 1);
    }

    #[test]
    fn test_capture_single_opponent() {
        // Player 1's token at relative 36 is ring cell 10 in a 2-player
        // match; player 0 lands there from relative 4 with a 6.
        let mut board = board_with(2, &[4, 0, 0, 0, 36, 0, 0, 0]);

        assert_eq!(board.move_token(0, 6), Ok(10));
        assert_eq!(board.try_capture_opponent(0), Some(4));
        assert_eq!(board.position(4), Ok(BASE));
    }

    #[test]
    fn test_blockade_prevents_capture() {
        // Two opposing tokens on the landing cell
        let mut board = board_with(2, &[4, 0, 0, 0, 36, 36, 0, 0]);

        assert_eq!(board.move_token(0, 6), Ok(10));
        assert_eq!(board.try_capture_opponent(0), None);
        assert_eq!(board.position(4), Ok(36));
        assert_eq!(board.position(5), Ok(36));
    }

    #[test]
    fn test_no_capture_on_safe_cell() {
        // Player 1 at relative 27 sits on ring cell 1, which is safe;
        // player 0 landing on relative 1 (also ring cell 1) captures nothing.
        let mut board = board_with(2, &[0, 0, 0, 0, 27, 0, 0, 0]);

        assert_eq!(board.move_token(0, 6), Ok(1));
        assert_eq!(board.try_capture_opponent(0), None);
        assert_eq!(board.position(4), Ok(27));
    }

    #[test]
    fn test_no_capture_of_own_tokens() {
        let mut board = board_with(2, &[4, 10, 0, 0, 0, 0, 0, 0]);

        // Lands on its own token's cell; own tokens never interact
        assert_eq!(board.move_token(0, 6), Ok(10));
        assert_eq!(board.try_capture_opponent(0), None);
        assert_eq!(board.position(1), Ok(10));
    }

    #[test]
    fn test_no_capture_from_stretch_or_base() {
        let mut board = board_with(2, &[51, 0, 0, 0, 36, 0, 0, 0]);

        // Token moved into the stretch; stretch never captures
        assert_eq!(board.move_token(0, 3), Ok(54));
        assert_eq!(board.try_capture_opponent(0), None);
    }

    #[test]
    fn test_movable_tokens_mask() {
        let board = board_with(2, &[0, 10, 55, HOME, 0, 0, 0, 0]);
        let player = PlayerId::new(0);

        // With a 3: base stays, 10 moves, 55 overshoots, home is done
        let mask = board.movable_tokens(player, 3);
        assert!(!mask.contains(0));
        assert!(mask.contains(1));
        assert!(!mask.contains(2));
        assert!(!mask.contains(3));

        // With a 6: base exits too
        let mask = board.movable_tokens(player, 6);
        assert!(mask.contains(0));
        assert!(mask.contains(1));
        assert!(!mask.contains(2));
        assert!(!mask.contains(3));
    }

    #[test]
    fn test_movable_tokens_empty_when_stuck() {
        // Everything at base and no six rolled
        let board = Board::new(2);
        assert!(board.movable_tokens(PlayerId::new(0), 3).is_empty());
    }

    #[test]
    fn test_has_player_won() {
        let board = board_with(2, &[HOME, HOME, HOME, HOME, 0, 0, 0, 0]);

        assert!(board.has_player_won(PlayerId::new(0)));
        assert!(!board.has_player_won(PlayerId::new(1)));

        let board = board_with(2, &[HOME, HOME, HOME, 56, 0, 0, 0, 0]);
        assert!(!board.has_player_won(PlayerId::new(0)));
    }

    #[test]
    fn test_safe_tile_queries() {
        let board = board_with(2, &[0, 1, 2, 54, HOME, 0, 0, 0]);

        assert_eq!(board.is_on_safe_tile(0), Ok(false)); // base
        assert_eq!(board.is_on_safe_tile(1), Ok(true)); // ring cell 1
        assert_eq!(board.is_on_safe_tile(2), Ok(false)); // ring cell 2
        assert_eq!(board.is_on_safe_tile(3), Ok(true)); // stretch
        assert_eq!(board.is_on_safe_tile(4), Ok(true)); // home
    }

    #[test]
    fn test_from_positions_validation() {
        assert_eq!(
            Board::from_positions(2, &[0; 7]),
            Err(RuleError::InvalidTokenIndex)
        );
        assert_eq!(
            Board::from_positions(2, &[58, 0, 0, 0, 0, 0, 0, 0]),
            Err(RuleError::InvalidTokenIndex)
        );
        assert_eq!(
            Board::from_positions(5, &[0; 20]),
            Err(RuleError::InvalidPlayerIndex)
        );

        let board = Board::from_positions(3, &[0; 12]).unwrap();
        assert_eq!(board.player_count(), 3);
    }

    #[test]
    fn test_positions_round_trip() {
        let positions = [4u8, 0, 51, HOME, 36, 0, 0, 1];
        let board = board_with(2, &positions);

        assert_eq!(board.positions(), positions.to_vec());
    }
}
