//! Deterministic Random Number Generator
//!
//! Uses the mulberry32 algorithm. Given the same seed, produces the exact
//! same sequence as the client's generator, bit for bit.

use serde::{Deserialize, Serialize};

/// Deterministic PRNG using the mulberry32 algorithm.
///
/// # Determinism Guarantee
///
/// Given the same 32-bit seed, this RNG produces the exact same sequence
/// of values as the client-side generator on any platform. The output of
/// [`next_f64`](Self::next_f64) is a 32-bit integer divided by 2^32, which
/// is exactly representable in an `f64`, so the floating-point normalization
/// introduces no platform variance.
///
/// # Example
///
/// ```
/// use gridpop::core::rng::SeededRng;
///
/// let mut rng = SeededRng::new(42);
/// assert_eq!(rng.next_f64(), 2581720956.0 / 4294967296.0); // Always the same!
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a new RNG from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Generate the next value in `[0, 1)`.
    ///
    /// One mulberry32 step: advance the state by a fixed odd increment,
    /// XOR-shift and multiply, then normalize the 32-bit output.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        (t ^ (t >> 14)) as f64 / 4_294_967_296.0
    }

    /// Generate a random integer in range `[min, max]` (inclusive).
    ///
    /// Maps the fraction via `floor(value * (max - min + 1)) + min`,
    /// matching the client's integer draw.
    #[inline]
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let range = (max - min + 1) as f64;
        (self.next_f64() * range) as i32 + min
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> u32 {
        self.state
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        // Same seed must produce same sequence
        let mut rng1 = SeededRng::new(12345);
        let mut rng2 = SeededRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_f64(), rng2.next_f64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        // Different seeds produce different sequences
        let mut rng1 = SeededRng::new(12345);
        let mut rng2 = SeededRng::new(54321);

        // Very unlikely to match
        assert_ne!(rng1.next_f64(), rng2.next_f64());
    }

    #[test]
    fn test_rng_known_values() {
        // Verify specific output for regression testing
        let mut rng = SeededRng::new(42);

        // These values must never change!
        // If they do, client boards and replays will disagree.
        assert_eq!(rng.next_f64(), 2581720956.0 / 4294967296.0);
        assert_eq!(rng.next_f64(), 1925393290.0 / 4294967296.0);
        assert_eq!(rng.next_f64(), 3661312704.0 / 4294967296.0);
    }

    #[test]
    fn test_output_range() {
        let mut rng = SeededRng::new(1234);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!((0.0..1.0).contains(&val));
        }
    }

    #[test]
    fn test_next_int_range() {
        let mut rng = SeededRng::new(5678);

        for _ in 0..1000 {
            let val = rng.next_int(1, 9);
            assert!((1..=9).contains(&val));
        }

        // Edge case: min = max
        assert_eq!(rng.next_int(5, 5), 5);
    }

    #[test]
    fn test_next_int_covers_bounds() {
        // Both endpoints of the inclusive range must be reachable
        let mut rng = SeededRng::new(99);
        let mut seen_min = false;
        let mut seen_max = false;

        for _ in 0..10_000 {
            match rng.next_int(1, 9) {
                1 => seen_min = true,
                9 => seen_max = true,
                _ => {}
            }
        }

        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_zero_seed() {
        // Seed 0 is valid for mulberry32 (the increment breaks symmetry)
        let mut rng = SeededRng::new(0);
        let first = rng.next_f64();
        assert!((0.0..1.0).contains(&first));
        assert_ne!(first, rng.next_f64());
    }
}
