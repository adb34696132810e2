//! Seeded random number generation for the match3 engine core.
//!
//! Wraps `ChaCha8Rng` so that a board's entire generative history —
//! initial fill, refill, shuffles, AI sandbox predictions — is reproducible
//! from a single `u64` seed. The engine owns exactly one `EngineRng`; the
//! AI analyzer clones it into a throwaway sandbox value rather than sharing
//! state with the live board.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// The engine's single source of randomness.
///
/// Only the seed is serialized: on `Deserialize` the stream is recreated
/// from scratch at position zero. Snapshot round-trips therefore do not
/// reproduce the exact in-flight stream position, only a deterministic one
/// derived from the seed — acceptable because gameplay never inspects raw
/// stream position, only the sequence of draws going forward.
#[derive(Debug, Clone)]
pub struct EngineRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Serialize for EngineRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EngineRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(EngineRng::new(seed))
    }
}

impl EngineRng {
    /// Creates a new RNG from an explicit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a new RNG seeded from OS entropy.
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Returns the seed this RNG was constructed from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns a value in `0..n`. Returns 0 if `n` is 0.
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Returns a value in `0..len` as a `usize`. Returns 0 if `len` is 0.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    /// Returns true with probability `1/n`.
    pub fn one_in(&mut self, n: u32) -> bool {
        self.below(n) == 0
    }

    /// Returns true with probability `percent/100`.
    pub fn percent(&mut self, percent: u32) -> bool {
        self.below(100) < percent
    }

    /// Chooses a random element from a non-empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

impl Default for EngineRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_is_in_bounds() {
        let mut rng = EngineRng::new(42);
        for _ in 0..1000 {
            assert!(rng.below(7) < 7);
        }
    }

    #[test]
    fn below_zero_is_zero() {
        let mut rng = EngineRng::new(1);
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = EngineRng::new(1234);
        let mut b = EngineRng::new(1234);
        for _ in 0..200 {
            assert_eq!(a.below(100), b.below(100));
        }
    }

    #[test]
    fn choose_none_on_empty() {
        let mut rng = EngineRng::new(7);
        let empty: [u8; 0] = [];
        assert_eq!(rng.choose(&empty), None);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = EngineRng::new(99);
        let mut items: Vec<u32> = (0..20).collect();
        let original = items.clone();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, original);
    }
}
