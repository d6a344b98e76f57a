//! Normal approximation helpers on top of `statrs`.
//!
//! A zero standard deviation (every use consumes durability) is a point mass,
//! which `statrs` refuses to construct; it is handled here instead.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::{ConfidenceLevel, EstimateError};

#[derive(Debug, Clone, Copy)]
pub(crate) struct NormalApprox {
    mean: f64,
    dist: Option<Normal>,
}

impl NormalApprox {
    pub(crate) fn new(mean: f64, std_dev: f64) -> Result<Self, EstimateError> {
        let dist = if std_dev > 0.0 {
            let dist = Normal::new(mean, std_dev)
                .map_err(|err| EstimateError::Distribution(err.to_string()))?;
            Some(dist)
        } else {
            tracing::debug!(mean, "zero variance, using point mass");
            None
        };
        Ok(Self { mean, dist })
    }

    pub(crate) fn is_point_mass(&self) -> bool {
        self.dist.is_none()
    }

    /// Probability density. Zero everywhere for a point mass.
    pub(crate) fn density(&self, x: f64) -> f64 {
        self.dist.as_ref().map_or(0.0, |dist| dist.pdf(x))
    }

    pub(crate) fn cdf(&self, x: f64) -> f64 {
        match &self.dist {
            Some(dist) => dist.cdf(x),
            None if x >= self.mean => 1.0,
            None => 0.0,
        }
    }
}

/// Standard normal quantile at `1 - alpha/2`. Infinite when confidence is 1.
pub(crate) fn two_sided_z(confidence: ConfidenceLevel) -> Result<f64, EstimateError> {
    let cumulative = 1.0 - confidence.tail();
    if cumulative >= 1.0 {
        return Ok(f64::INFINITY);
    }
    let standard =
        Normal::new(0.0, 1.0).map_err(|err| EstimateError::Distribution(err.to_string()))?;
    Ok(standard.inverse_cdf(cumulative))
}

/// `points` evenly spaced values from `start` to `end`, both included.
pub(crate) fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points)
                .map(|i| {
                    if i == points - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}
