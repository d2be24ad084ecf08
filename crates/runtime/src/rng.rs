//! `rand`-backed RNG oracle.

use combat_core::RngOracle;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Seedable oracle over [`StdRng`]. Same seed, same encounter.
#[derive(Clone, Debug)]
pub struct StdRngOracle {
    rng: StdRng,
}

impl StdRngOracle {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RngOracle for StdRngOracle {
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}
