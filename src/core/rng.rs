//! Deterministic random number generation.
//!
//! Two consumers with different needs share this type:
//!
//! - **Digest constants** must be identical across processes and restarts,
//!   so `DigestTable` draws them from `GameRng::new(config.digest_seed)`.
//! - **Randomized move selection** in the search wants a reproducible but
//!   per-search stream, so the driver forks a fresh branch for every search.
//!
//! ```
//! use rust_boardgame::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.next_u64(), b.next_u64());
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic, forkable RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork an independent, deterministic branch.
    ///
    /// The n-th fork of a given seed always yields the same stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Next raw value with the low bit forced on.
    ///
    /// Digest keys are combined multiplicatively, so they must be odd.
    pub fn next_odd_u64(&mut self) -> u64 {
        self.inner.next_u64() | 1
    }

    /// Pick an index into a collection of `len` items, `None` when empty.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.inner.gen_range(0..len))
        }
    }
}
