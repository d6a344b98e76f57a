//! Shared test fixtures for wear_core and downstream crates.
//!
//! `make_rng()` gives every test the same seeded stream so Monte Carlo
//! assertions are reproducible.

use crate::{EstimatorConfig, OutcomeHistogram, ToolState, UsesSample};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

pub fn base_config() -> EstimatorConfig {
    EstimatorConfig::default()
}

/// Durability 100, enchant level 2: mean 300 uses to break.
pub fn sample_tool() -> ToolState {
    ToolState {
        durability: 100,
        enchant_level: 2,
    }
}

/// Build a uses-to-break sample from `(outcome, count)` pairs.
pub fn sample_from(counts: &[(u64, u64)]) -> UsesSample {
    let mut histogram = OutcomeHistogram::new();
    for &(outcome, count) in counts {
        for _ in 0..count {
            histogram.record(outcome);
        }
    }
    UsesSample {
        histogram,
        saturated_trials: 0,
    }
}
