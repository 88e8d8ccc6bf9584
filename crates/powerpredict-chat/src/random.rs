//! Injectable randomness for response, greeting and delay selection.
//!
//! Production code uses [`StdRandom`]; tests pin every choice with
//! [`FixedRandom`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the few random choices the chat makes.
pub trait RandomSource: Send {
    /// Pick an index in `0..len`. Returns 0 when `len` is 0.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Pick a delay in `min_ms..=max_ms`. Returns `min_ms` when the range is empty.
    fn pick_delay_ms(&mut self, min_ms: u64, max_ms: u64) -> u64;
}

/// Uniform choices backed by a [`StdRng`].
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for StdRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn pick_delay_ms(&mut self, min_ms: u64, max_ms: u64) -> u64 {
        if max_ms <= min_ms {
            return min_ms;
        }
        self.rng.random_range(min_ms..=max_ms)
    }
}

/// Always picks the same index (clamped to the list) and the minimum delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRandom {
    pub index: usize,
}

impl FixedRandom {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl RandomSource for FixedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.index.min(len.saturating_sub(1))
    }

    fn pick_delay_ms(&mut self, min_ms: u64, _max_ms: u64) -> u64 {
        min_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_random_index_in_range() {
        let mut rng = StdRandom::seeded(7);
        for _ in 0..200 {
            assert!(rng.pick_index(3) < 3);
        }
    }

    #[test]
    fn test_std_random_empty_list() {
        let mut rng = StdRandom::seeded(7);
        assert_eq!(rng.pick_index(0), 0);
    }

    #[test]
    fn test_std_random_delay_bounds() {
        let mut rng = StdRandom::seeded(42);
        for _ in 0..200 {
            let d = rng.pick_delay_ms(1000, 2000);
            assert!((1000..=2000).contains(&d));
        }
        assert_eq!(rng.pick_delay_ms(800, 800), 800);
        assert_eq!(rng.pick_delay_ms(900, 100), 900);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = StdRandom::seeded(99);
        let mut b = StdRandom::seeded(99);
        let xs: Vec<usize> = (0..20).map(|_| a.pick_index(10)).collect();
        let ys: Vec<usize> = (0..20).map(|_| b.pick_index(10)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_fixed_random_clamps() {
        let mut fixed = FixedRandom::new(5);
        assert_eq!(fixed.pick_index(3), 2);
        assert_eq!(fixed.pick_index(10), 5);
        assert_eq!(fixed.pick_index(0), 0);
        assert_eq!(fixed.pick_delay_ms(1000, 2000), 1000);
    }
}
