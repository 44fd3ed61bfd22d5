//! The self-contained wire copy of engine state.
//!
//! A `Snapshot` is created on demand for transmission and never mutated. It
//! carries everything a client needs to rebuild a behaviorally-equivalent
//! engine - there is no side channel and no event replay. Inside the crate
//! the winner is an `Option`; the `-1` sentinel exists only on the wire,
//! for compatibility with clients that predate the optional form.

use serde::{Deserialize, Serialize};

use crate::board::TokenMask;
use crate::core::PlayerId;

/// Complete observable engine state.
///
/// Field names follow the camelCase wire convention:
///
/// ```
/// use ludo_core::engine::GameEngine;
///
/// let engine = GameEngine::new(2, 42);
/// let json = serde_json::to_value(engine.snapshot()).unwrap();
///
/// assert_eq!(json["playerCount"], 2);
/// assert_eq!(json["winner"], -1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub player_count: u8,
    pub current_player: PlayerId,
    pub consecutive_sixes: u8,
    /// Pending roll, 0 when none.
    pub last_dice_roll: u8,
    pub movable_tokens_mask: TokenMask,
    /// All token positions, flat, in absolute token order.
    pub tokens: Vec<u8>,
    pub game_won: bool,
    #[serde(with = "player_or_none")]
    pub winner: Option<PlayerId>,
    pub turn_id: u32,
    pub version: u64,
}

/// Wire form of an optional player index: `-1` means none.
pub(crate) mod player_or_none {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use crate::core::PlayerId;

    pub fn serialize<S: Serializer>(
        value: &Option<PlayerId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(player) => serializer.serialize_i16(player.index() as i16),
            None => serializer.serialize_i16(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<PlayerId>, D::Error> {
        let raw = i16::deserialize(deserializer)?;
        match raw {
            i16::MIN..=-1 => Ok(None),
            0..=255 => Ok(Some(PlayerId::new(raw as u8))),
            _ => Err(D::Error::custom("player index out of range")),
        }
    }
}

/// Wire form of an optional absolute token index: `-1` means none.
pub(crate) mod token_or_none {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<u8>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(token) => serializer.serialize_i16(*token as i16),
            None => serializer.serialize_i16(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u8>, D::Error> {
        let raw = i16::deserialize(deserializer)?;
        match raw {
            i16::MIN..=-1 => Ok(None),
            0..=255 => Ok(Some(raw as u8)),
            _ => Err(D::Error::custom("token index out of range")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        let mut mask = TokenMask::empty();
        mask.insert(1);

        Snapshot {
            player_count: 2,
            current_player: PlayerId::new(1),
            consecutive_sixes: 1,
            last_dice_roll: 6,
            movable_tokens_mask: mask,
            tokens: vec![0, 14, 51, 57, 3, 0, 0, 27],
            game_won: false,
            winner: None,
            turn_id: 12,
            version: 25,
        }
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_string(&sample()).unwrap();

        assert_eq!(
            json,
            concat!(
                r#"{"playerCount":2,"currentPlayer":1,"consecutiveSixes":1,"#,
                r#""lastDiceRoll":6,"movableTokensMask":["token1"],"#,
                r#""tokens":[0,14,51,57,3,0,0,27],"gameWon":false,"#,
                r#""winner":-1,"turnId":12,"version":25}"#
            )
        );
    }

    #[test]
    fn test_round_trip() {
        let snapshot = sample();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_winner_sentinel() {
        let mut snapshot = sample();
        snapshot.game_won = true;
        snapshot.winner = Some(PlayerId::new(1));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["winner"], 1);

        let back: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back.winner, Some(PlayerId::new(1)));
    }
}
