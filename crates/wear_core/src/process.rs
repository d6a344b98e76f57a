//! Durability-loss process: every use is an independent Bernoulli trial.
//!
//! Uses until breaking is a sum of `durability` geometric variables; durability
//! lost after a fixed number of uses is binomial. Both the analytic moments and
//! the Monte Carlo trials below are views of the same process.

use rand::Rng;
use serde::Serialize;

use crate::{EstimateError, ToolState};

/// Probability that one use consumes a durability point: `1 / (1 + level)`.
pub fn reduce_probability(enchant_level: u32) -> Result<f64, EstimateError> {
    let p = 1.0 / (1.0 + f64::from(enchant_level));
    if p > 0.0 && p <= 1.0 {
        Ok(p)
    } else {
        Err(EstimateError::InvalidReduceProbability(p))
    }
}

/// Moments of the normal approximation used by the analytic estimators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProcessParameters {
    pub reduce_probability: f64,
    pub mean: f64,
    /// Variance contributed by one step (one durability point, or one use).
    pub step_variance: f64,
    /// Standard deviation of the whole sum of steps.
    pub std_dev: f64,
}

impl ProcessParameters {
    /// Uses until the tool breaks.
    pub fn uses_to_break(tool: &ToolState) -> Result<Self, EstimateError> {
        tool.validate()?;
        let p = reduce_probability(tool.enchant_level)?;
        let durability = f64::from(tool.durability);
        let step_variance = (1.0 - p) / p.powi(2);
        Ok(Self {
            reduce_probability: p,
            mean: durability / p,
            step_variance,
            std_dev: (durability * step_variance).sqrt(),
        })
    }

    /// Durability lost after `blocks` uses.
    ///
    /// The step variance is `p²(1-p) + (1-p)²p`, kept in this form.
    pub fn durability_lost(tool: &ToolState, blocks: u64) -> Result<Self, EstimateError> {
        tool.validate()?;
        if blocks == 0 {
            return Err(EstimateError::ZeroBlocks);
        }
        let p = reduce_probability(tool.enchant_level)?;
        let blocks = blocks as f64;
        let step_variance = p.powi(2) * (1.0 - p) + (1.0 - p).powi(2) * p;
        Ok(Self {
            reduce_probability: p,
            mean: p * blocks,
            step_variance,
            std_dev: (blocks * step_variance).sqrt(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurabilityLossProcess {
    reduce_probability: f64,
}

impl DurabilityLossProcess {
    pub fn for_tool(tool: &ToolState) -> Result<Self, EstimateError> {
        Ok(Self {
            reduce_probability: reduce_probability(tool.enchant_level)?,
        })
    }

    pub fn reduce_probability(&self) -> f64 {
        self.reduce_probability
    }

    /// One use: does it consume a durability point?
    pub fn reduces_durability(&self, rng: &mut impl Rng) -> bool {
        rng.gen::<f64>() < self.reduce_probability
    }

    /// Use the tool until it breaks. Returns the 1-based index of the breaking
    /// use, or `None` if `cap` uses pass without breaking.
    pub fn uses_until_break(&self, durability: u32, cap: u64, rng: &mut impl Rng) -> Option<u64> {
        if durability == 0 {
            return Some(0);
        }
        let mut remaining = durability;
        for use_index in 1..=cap {
            if self.reduces_durability(rng) {
                remaining -= 1;
                if remaining == 0 {
                    return Some(use_index);
                }
            }
        }
        None
    }

    /// Use the tool exactly `blocks` times and count the durability lost.
    pub fn durability_lost(&self, blocks: u64, rng: &mut impl Rng) -> u64 {
        let mut lost = 0;
        for _ in 0..blocks {
            if self.reduces_durability(rng) {
                lost += 1;
            }
        }
        lost
    }
}
