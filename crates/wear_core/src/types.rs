//! Type definitions for `wear_core`.
//!
//! Inputs, configuration and estimate types. Everything here is a value type
//! that lives for the duration of one estimator call.

use serde::{Deserialize, Serialize};

use crate::{DisplaySeries, EstimateError};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A tool as the estimators see it: remaining durability and the level of the
/// enchantment that lowers the chance of losing durability per use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolState {
    /// Uses remaining before the tool breaks. Always > 0.
    pub durability: u32,
    pub enchant_level: u32,
}

impl ToolState {
    pub fn new(durability: u32, enchant_level: u32) -> Result<Self, EstimateError> {
        let tool = Self {
            durability,
            enchant_level,
        };
        tool.validate()?;
        Ok(tool)
    }

    pub(crate) fn validate(&self) -> Result<(), EstimateError> {
        if self.durability == 0 {
            return Err(EstimateError::ZeroDurability);
        }
        Ok(())
    }
}

/// Probability mass an interval should enclose, centred on the distribution.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// Accepts values in `(0, 1]`. NaN is rejected.
    pub fn new(value: f64) -> Result<Self, EstimateError> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(EstimateError::ConfidenceOutOfRange(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// `1 - confidence`: total mass left outside the interval.
    pub fn alpha(self) -> f64 {
        1.0 - self.0
    }

    /// Mass left outside on each side.
    pub fn tail(self) -> f64 {
        self.alpha() / 2.0
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What a Monte Carlo uses-to-break trial records when it reaches the use cap
/// without breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturationPolicy {
    /// Record outcome 0.
    #[default]
    RecordZero,
    /// Leave the trial out of the histogram entirely.
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Used by callers when no confidence level is supplied.
    pub default_confidence: f64,
    /// Used by callers when no experiment count is supplied.
    pub default_experiments: u32,
    /// Density samples for the uses-to-break curve.
    pub interval_density_points: usize,
    /// Density samples for the durability-lost curve.
    pub probability_density_points: usize,
    /// Density curves span `mean ± density_span_std · std`.
    pub density_span_std: f64,
    /// Uses-to-break trials stop after `trial_cap_multiplier · mean` uses.
    pub trial_cap_multiplier: f64,
    pub saturation_policy: SaturationPolicy,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            default_confidence: 0.95,
            default_experiments: 5000,
            interval_density_points: 500,
            probability_density_points: 100,
            density_span_std: 4.0,
            trial_cap_multiplier: 10.0,
            saturation_policy: SaturationPolicy::RecordZero,
        }
    }
}

impl EstimatorConfig {
    pub fn default_confidence_level(&self) -> Result<ConfidenceLevel, EstimateError> {
        ConfidenceLevel::new(self.default_confidence)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Range of uses the tool is expected to survive, plus the data to plot it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalEstimate {
    /// May be `-inf` when the confidence level is 1.
    #[serde(serialize_with = "crate::serde_float::serialize")]
    pub lower: f64,
    /// May be `+inf` when the confidence level is 1.
    #[serde(serialize_with = "crate::serde_float::serialize")]
    pub upper: f64,
    /// Mean for the analytic estimate, median for the simulated one.
    pub center: f64,
    /// Simulated trials that hit the use cap. Always 0 for the analytic estimate.
    pub saturated_trials: u64,
    pub series: DisplaySeries,
}

impl IntervalEstimate {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, uses: f64) -> bool {
        self.lower <= uses && uses <= self.upper
    }
}

/// Probability that the tool survives a fixed number of uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityEstimate {
    pub probability: f64,
    /// Mean durability lost for the analytic estimate, modal loss for the
    /// simulated one.
    pub center: f64,
    pub series: DisplaySeries,
}
