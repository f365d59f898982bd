//! RNG module - seeded randomness for piece draws and bonus draws
//!
//! Every session owns its generators, seeded from the session seed, so a game
//! replays identically for the same seed and the same inputs. Piece draws and
//! bonus draws come from separate streams so that one never shifts the other.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::pieces::{catalog, CatalogEntry};
use crate::types::Difficulty;

/// Stream id mixed into the seed for piece draws.
pub const PIECE_STREAM: u64 = 1;
/// Stream id mixed into the seed for bonus and eligibility draws.
pub const BONUS_STREAM: u64 = 2;

/// Seeded ChaCha8 generator.
#[derive(Debug, Clone)]
pub struct GameRng {
    seed: u64,
    rng: ChaCha8Rng,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Independent generator for `stream`, derived from a session seed.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        // splitmix64 finalizer over seed and stream id
        let mut z = seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        Self::new(z ^ (z >> 31))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in `[0, 100)`.
    pub fn percent(&mut self) -> f64 {
        self.rng.random::<f64>() * 100.0
    }

    /// Uniform index in `[0, len)`. Returns 0 for an empty range.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Draws catalog entries of one difficulty tier uniformly at random.
#[derive(Debug, Clone)]
pub struct PieceSource {
    difficulty: Difficulty,
    entries: Vec<CatalogEntry>,
    rng: GameRng,
}

impl PieceSource {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            entries: catalog(difficulty),
            rng: GameRng::for_stream(seed, PIECE_STREAM),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Draw the next entry of the tier.
    pub fn draw(&mut self) -> CatalogEntry {
        let idx = self.rng.index(self.entries.len());
        self.entries[idx]
    }
}
