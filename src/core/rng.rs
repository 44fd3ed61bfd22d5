//! Deterministic dice rolls.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces an identical roll sequence
//! - **Owned per engine**: Never shared between matches, so seeded
//!   reproducibility holds
//! - **Scriptable**: A fixed roll sequence can be replayed for tests and
//!   match replays
//!
//! ## Usage
//!
//! ```
//! use ludo_core::core::DiceRng;
//!
//! let mut rng = DiceRng::new(42);
//! let mut replay = DiceRng::new(42);
//!
//! // Same seed, same rolls
//! assert_eq!(rng.roll_die(), replay.roll_die());
//!
//! // Scripted sources replay a fixed sequence, cycling when exhausted
//! let mut scripted = DiceRng::scripted(&[6, 6, 6]);
//! assert_eq!(scripted.roll_die(), 6);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic six-sided die.
///
/// Uses ChaCha8 for speed while maintaining cryptographic quality randomness.
#[derive(Clone, Debug)]
pub struct DiceRng {
    source: Source,
}

#[derive(Clone, Debug)]
enum Source {
    Seeded(ChaCha8Rng),
    Scripted { rolls: Vec<u8>, next: usize },
}

impl DiceRng {
    /// Create a new die with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Create a die that replays `rolls` in order, cycling at the end.
    ///
    /// Intended for replays and tests that need a known dice sequence.
    /// Every scripted value must be a valid die face.
    #[must_use]
    pub fn scripted(rolls: &[u8]) -> Self {
        assert!(!rolls.is_empty(), "Scripted rolls must not be empty");
        assert!(
            rolls.iter().all(|r| (1..=6).contains(r)),
            "Scripted rolls must be 1-6"
        );
        Self {
            source: Source::Scripted {
                rolls: rolls.to_vec(),
                next: 0,
            },
        }
    }

    /// Roll the die, returning a value in `1..=6`.
    pub fn roll_die(&mut self) -> u8 {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(1..=6),
            Source::Scripted { rolls, next } => {
                let value = rolls[*next];
                *next = (*next + 1) % rolls.len();
                value
            }
        }
    }
}
