use anyhow::{anyhow, bail, Result};
use serde::Deserialize;
use std::collections::HashMap;
use wear_core::{EstimatorConfig, SaturationPolicy};

const VALID_KEYS: &[&str] = &[
    "default_confidence",
    "default_experiments",
    "interval_density_points",
    "probability_density_points",
    "density_span_std",
    "trial_cap_multiplier",
    "saturation_policy",
];

pub fn apply_overrides(
    config: &mut EstimatorConfig,
    overrides: &HashMap<String, serde_json::Value>,
) -> Result<()> {
    for (key, value) in overrides {
        match key.as_str() {
            "default_confidence" => config.default_confidence = as_f64(key, value)?,
            "default_experiments" => config.default_experiments = as_u32(key, value)?,
            "interval_density_points" => {
                config.interval_density_points = as_usize(key, value)?;
            }
            "probability_density_points" => {
                config.probability_density_points = as_usize(key, value)?;
            }
            "density_span_std" => config.density_span_std = as_f64(key, value)?,
            "trial_cap_multiplier" => config.trial_cap_multiplier = as_f64(key, value)?,
            "saturation_policy" => {
                config.saturation_policy = SaturationPolicy::deserialize(value).map_err(|_| {
                    anyhow!("override '{key}': expected \"record_zero\" or \"exclude\", got {value}")
                })?;
            }
            _ => bail!(
                "unknown override key '{key}'. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        }
    }
    Ok(())
}

fn as_f64(key: &str, value: &serde_json::Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| anyhow!("override '{key}': expected a number, got {value}"))
}

fn as_u64(key: &str, value: &serde_json::Value) -> Result<u64> {
    value
        .as_u64()
        .ok_or_else(|| anyhow!("override '{key}': expected a positive integer, got {value}"))
}

fn as_u32(key: &str, value: &serde_json::Value) -> Result<u32> {
    let val = as_u64(key, value)?;
    u32::try_from(val).map_err(|_| anyhow!("override '{key}': value {val} exceeds u32 range"))
}

fn as_usize(key: &str, value: &serde_json::Value) -> Result<usize> {
    let val = as_u64(key, value)?;
    usize::try_from(val).map_err(|_| anyhow!("override '{key}': value {val} exceeds usize range"))
}
