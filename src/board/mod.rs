//! Board state: token positions, movement, capture and win rules.
//!
//! The board owns positional truth and nothing else - it has no notion of
//! whose turn it is or what was rolled.

pub mod board;
pub mod mask;

pub use board::{
    token_index, Board, Square, BASE, HOME, RING_LEN, SAFE_RING_CELLS, STRETCH_FIRST,
    STRETCH_LAST, TOKENS_PER_PLAYER, TRACK_FIRST, TRACK_LAST,
};
pub use mask::TokenMask;
