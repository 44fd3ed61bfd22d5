//! Named bit-set over a player's four token slots.

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::board::TOKENS_PER_PLAYER;

/// Wire names for token slots, in slot order.
const SLOT_NAMES: [&str; TOKENS_PER_PLAYER] = ["token0", "token1", "token2", "token3"];

/// The set of a player's tokens (by local slot 0-3) that can legally move
/// with the current dice value.
///
/// Serializes as an array of symbolic slot names rather than a raw integer,
/// so the wire form stays readable and forward compatible:
///
/// ```
/// use ludo_core::board::TokenMask;
///
/// let mut mask = TokenMask::empty();
/// mask.insert(0);
/// mask.insert(2);
///
/// let json = serde_json::to_string(&mask).unwrap();
/// assert_eq!(json, r#"["token0","token2"]"#);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TokenMask(u8);

impl TokenMask {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add a slot to the set.
    pub fn insert(&mut self, slot: u8) {
        debug_assert!((slot as usize) < TOKENS_PER_PLAYER);
        self.0 |= 1 << slot;
    }

    /// Check whether a slot is in the set.
    #[must_use]
    pub fn contains(self, slot: u8) -> bool {
        (slot as usize) < TOKENS_PER_PLAYER && self.0 & (1 << slot) != 0
    }

    /// Check whether no slot is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of slots in the set.
    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate over the slots in the set, in slot order.
    pub fn slots(self) -> impl Iterator<Item = u8> {
        (0..TOKENS_PER_PLAYER as u8).filter(move |slot| self.contains(*slot))
    }
}

impl Serialize for TokenMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for slot in self.slots() {
            seq.serialize_element(SLOT_NAMES[slot as usize])?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for TokenMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MaskVisitor;

        impl<'de> Visitor<'de> for MaskVisitor {
            type Value = TokenMask;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a sequence of token slot names")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<TokenMask, A::Error> {
                let mut mask = TokenMask::empty();
                while let Some(name) = seq.next_element::<String>()? {
                    let slot = SLOT_NAMES
                        .iter()
                        .position(|n| *n == name)
                        .ok_or_else(|| serde::de::Error::unknown_variant(&name, &SLOT_NAMES))?;
                    mask.insert(slot as u8);
                }
                Ok(mask)
            }
        }

        deserializer.deserialize_seq(MaskVisitor)
    }
}
