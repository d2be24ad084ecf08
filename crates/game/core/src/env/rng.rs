//! RNG oracle for deterministic random number generation.
//!
//! Every roll in combat (crits, status chances, hit chances, flee noise, AI
//! draws, loot) goes through an [`RngOracle`] injected into the encounter.
//! There is no process-wide generator, so a seeded oracle replays a fight
//! exactly and a [`ScriptedRng`] can force individual rolls in tests.
//!
//! # Determinism
//!
//! All implementations must be deterministic: given the same seed (or script)
//! they must produce the same sequence of values.

use std::collections::VecDeque;

/// RNG oracle consumed by the combat rules.
pub trait RngOracle {
    /// Generate the next raw 64-bit value.
    fn next_u64(&mut self) -> u64;

    /// Uniform float in `[0, 1)`.
    fn uniform(&mut self) -> f64 {
        // 53 high bits -> exactly representable mantissa
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform float in `[low, high)`.
    fn range_f64(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        low + self.uniform() * (high - low)
    }

    /// Uniform index in `[0, len)`. Returns 0 for an empty range.
    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        ((self.uniform() * len as f64) as usize).min(len - 1)
    }

    /// Roll against a probability. Certain outcomes consume no roll.
    fn chance(&mut self, probability: f64) -> bool {
        if probability >= 1.0 {
            return true;
        }
        if probability <= 0.0 {
            return false;
        }
        self.uniform() < probability
    }

    /// Standard weighted draw. Non-positive weights are never selected.
    ///
    /// Returns `None` when no weight is positive.
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut remaining = self.uniform() * total;
        let mut last_positive = None;
        for (idx, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            last_positive = Some(idx);
            if remaining < *weight {
                return Some(idx);
            }
            remaining -= weight;
        }

        // Float drift at the top of the range
        last_positive
    }
}

impl<R: RngOracle + ?Sized> RngOracle for &mut R {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }

    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

impl<R: RngOracle + ?Sized> RngOracle for Box<R> {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }

    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 64-bit LCG state, 32-bit permuted output. Two outputs are
/// combined per `next_u64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn seeded(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    /// XSH-RR output permutation of the current state.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}

impl RngOracle for PcgRng {
    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }
}

/// Replays a fixed sequence of uniform draws, then repeats a fallback value.
///
/// Used to force specific rolls ("crit", "always accept", "always resist").
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedRng {
    script: VecDeque<f64>,
    fallback: f64,
    draws: usize,
}

impl ScriptedRng {
    /// Every draw returns `value` (clamped into `[0, 1)`).
    pub fn constant(value: f64) -> Self {
        Self::new(Vec::new(), value)
    }

    /// Draws `script` in order, then `fallback` forever.
    pub fn new(script: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            script: script.into_iter().map(Self::clamp_unit).collect(),
            fallback: Self::clamp_unit(fallback),
            draws: 0,
        }
    }

    /// Number of uniform draws consumed so far.
    pub fn draws(&self) -> usize {
        self.draws
    }

    fn clamp_unit(value: f64) -> f64 {
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

impl RngOracle for ScriptedRng {
    fn next_u64(&mut self) -> u64 {
        (self.uniform() * (1u64 << 53) as f64) as u64
    }

    fn uniform(&mut self) -> f64 {
        self.draws += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic_per_seed() {
        let mut a = PcgRng::seeded(42);
        let mut b = PcgRng::seeded(42);
        let mut c = PcgRng::seeded(43);

        let seq_a: Vec<u64> = (0..8).map(|_| a.next_u64()).collect();
        let seq_b: Vec<u64> = (0..8).map(|_| b.next_u64()).collect();
        let seq_c: Vec<u64> = (0..8).map(|_| c.next_u64()).collect();

        assert_eq!(seq_a, seq_b);
        assert_ne!(seq_a, seq_c);
    }

    #[test]
    fn uniform_stays_in_unit_interval() {
        let mut rng = PcgRng::seeded(7);
        for _ in 0..10_000 {
            let v = rng.uniform();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn scripted_rng_replays_then_falls_back() {
        let mut rng = ScriptedRng::new([0.1, 0.9], 0.5);
        assert_eq!(rng.uniform(), 0.1);
        assert_eq!(rng.uniform(), 0.9);
        assert_eq!(rng.uniform(), 0.5);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn certain_chances_consume_no_roll() {
        let mut rng = ScriptedRng::constant(0.99);
        assert!(rng.chance(1.0));
        assert!(!rng.chance(0.0));
        assert_eq!(rng.draws(), 0);
        assert!(!rng.chance(0.5));
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn weighted_index_respects_weights() {
        let weights = [1.0, 0.0, 3.0];
        // 0.2 * 4.0 = 0.8 -> first bucket
        assert_eq!(ScriptedRng::constant(0.2).weighted_index(&weights), Some(0));
        // 0.5 * 4.0 = 2.0 -> skips the zero bucket, lands in the last
        assert_eq!(ScriptedRng::constant(0.5).weighted_index(&weights), Some(2));
        assert_eq!(ScriptedRng::constant(0.5).weighted_index(&[0.0, -1.0]), None);
    }

    #[test]
    fn range_and_index_bounds() {
        let mut rng = ScriptedRng::constant(0.0);
        assert_eq!(rng.range_f64(-0.12, 0.12), -0.12);
        assert_eq!(rng.index(0), 0);
        let mut rng = ScriptedRng::constant(0.999);
        assert_eq!(rng.index(3), 2);
    }
}
