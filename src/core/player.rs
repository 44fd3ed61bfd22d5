//! Player identity and seating.
//!
//! A match seats 2-4 players around the ring. `PlayerId` is the 0-based
//! seat number; turn order follows seat order, wrapping via [`PlayerId::next`].
//! Per-player token storage lives in the board, which is the only place
//! that consumes it.

use serde::{Deserialize, Serialize};

/// Minimum number of players in a match.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of players in a match.
pub const MAX_PLAYERS: usize = 4;

/// Player identifier.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The player whose turn follows this one, wrapping at `player_count`.
    ///
    /// ```
    /// use ludo_core::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(1).next(3), PlayerId::new(2));
    /// assert_eq!(PlayerId::new(2).next(3), PlayerId::new(0));
    /// ```
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        Self((self.0 + 1) % player_count as u8)
    }

    /// Iterate over the seats of a match with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}
