// crates/sw_core/src/rng.rs
//
// Deterministic, integer-only RNG for drawing lots between tied lists.
// Focus: unbiased range generation, stable seeding, word-index accounting.
//
// • The configured lot seed is the only source of randomness; there is no OS entropy.
// • Unbiased ranges via rejection sampling, no floating point.
// • Cross-platform determinism: explicit little-endian seeding and a counter of
//   consumed words so a drawn lot can be replayed and audited.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// Seeded ChaCha20 stream used only when a tie policy calls for lots.
#[derive(Debug, Clone)]
pub struct TieRng {
    rng: ChaCha20Rng,
    words_consumed: u64,
}

impl TieRng {
    /// Construct from a 64-bit seed: `seed.to_le_bytes()` fills the first
    /// 8 bytes of the ChaCha20 seed; the remaining 24 bytes are zero.
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            rng: ChaCha20Rng::from_seed(seed32),
            words_consumed: 0,
        }
    }

    /// Number of 64-bit words drawn so far (saturating).
    #[inline]
    pub fn words_consumed(&self) -> u64 {
        self.words_consumed
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.words_consumed = self.words_consumed.saturating_add(1);
        self.rng.next_u64()
    }

    /// Unbiased integer in `[0, n)`; `None` if `n == 0`.
    #[inline]
    pub fn gen_range(&mut self, n: u64) -> Option<u64> {
        self.gen_range_with_index(n).map(|(v, _)| v)
    }

    /// Same as `gen_range`, plus the 1-based index of the accepted word.
    ///
    /// `threshold = 2^64 mod n`; accepting `x >= threshold` makes `x % n` uniform.
    pub fn gen_range_with_index(&mut self, n: u64) -> Option<(u64, u64)> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n;
        loop {
            let x = self.next_u64();
            if x >= threshold {
                return Some((x % n, self.words_consumed));
            }
        }
    }
}
