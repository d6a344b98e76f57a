//! Raw CLI values → estimator inputs. Ranges match what the product accepts.

use anyhow::{anyhow, bail, Result};
use wear_core::{ConfidenceLevel, EstimatorConfig};

/// Enchant levels the product offers.
const ENCHANT_LEVELS: std::ops::RangeInclusive<u32> = 1..=3;

pub fn durability(value: i64) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|&durability| durability > 0)
        .ok_or_else(|| anyhow!("Durability must be a positive integer"))
}

pub fn enchant_level(value: i64) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|level| ENCHANT_LEVELS.contains(level))
        .ok_or_else(|| anyhow!("Unbreaking level must be an integer from 1 to 3"))
}

pub fn blocks(value: i64) -> Result<u64> {
    u64::try_from(value)
        .ok()
        .filter(|&blocks| blocks > 0)
        .ok_or_else(|| anyhow!("Blocks number must be a positive integer"))
}

/// Confidence arrives as a percentage in `(0.1, 100]`.
pub fn confidence(percent: Option<f64>, config: &EstimatorConfig) -> Result<ConfidenceLevel> {
    let Some(percent) = percent else {
        return Ok(config.default_confidence_level()?);
    };
    if !(percent > 0.1 && percent <= 100.0) {
        bail!("Confidence level must be a fractional number from 0.1 to 100");
    }
    Ok(ConfidenceLevel::new(percent / 100.0)?)
}

pub fn experiments(value: Option<i64>, config: &EstimatorConfig) -> Result<u32> {
    let Some(value) = value else {
        return Ok(config.default_experiments);
    };
    u32::try_from(value)
        .ok()
        .filter(|&experiments| experiments > 0)
        .ok_or_else(|| anyhow!("Number of experiments must be a positive integer"))
}
