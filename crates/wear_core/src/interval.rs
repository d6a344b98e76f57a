//! Interval estimators: how many uses a tool survives at a confidence level.

use rand::Rng;
use serde::Serialize;

use crate::normal::{linspace, two_sided_z, NormalApprox};
use crate::{
    ConfidenceLevel, DisplaySeries, DurabilityLossProcess, EstimateError, EstimatorConfig,
    IntervalEstimate, MarkerKind, OutcomeHistogram, PointClass, ProcessParameters,
    SaturationPolicy, SeriesKind, ToolState,
};

/// Analytic interval: uses-to-break approximated as normal with
/// `mean = D/p` and `variance = D(1-p)/p²`.
///
/// Confidence 1 yields `[-inf, +inf]`. An unenchanted tool has zero variance
/// and collapses to `[D, D]`.
pub fn precise_interval(
    tool: &ToolState,
    confidence: ConfidenceLevel,
    config: &EstimatorConfig,
) -> Result<IntervalEstimate, EstimateError> {
    let params = ProcessParameters::uses_to_break(tool)?;
    let normal = NormalApprox::new(params.mean, params.std_dev)?;
    let mean = params.mean;

    if normal.is_point_mass() {
        let mut series = DisplaySeries::point_mass(mean, PointClass::Inside);
        for kind in [MarkerKind::Lower, MarkerKind::Mean, MarkerKind::Upper] {
            series.mark(kind, mean, 1.0);
        }
        return Ok(IntervalEstimate {
            lower: mean,
            upper: mean,
            center: mean,
            saturated_trials: 0,
            series,
        });
    }

    let half_width = two_sided_z(confidence)? * params.std_dev;
    let lower = mean - half_width;
    let upper = mean + half_width;

    let span = config.density_span_std * params.std_dev;
    let xs = linspace(mean - span, mean + span, config.interval_density_points);
    let mut series = DisplaySeries::sampled(
        xs,
        |x| normal.density(x),
        |x| {
            if lower <= x && x <= upper {
                PointClass::Inside
            } else {
                PointClass::Outside
            }
        },
    );
    for (kind, x) in [
        (MarkerKind::Lower, lower),
        (MarkerKind::Mean, mean),
        (MarkerKind::Upper, upper),
    ] {
        series.mark(kind, x, normal.density(x));
    }

    Ok(IntervalEstimate {
        lower,
        upper,
        center: mean,
        saturated_trials: 0,
        series,
    })
}

/// Uses-to-break histogram from a batch of Monte Carlo trials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsesSample {
    pub histogram: OutcomeHistogram,
    /// Trials that reached the use cap without breaking.
    pub saturated_trials: u64,
}

impl UsesSample {
    pub fn merge(&mut self, other: &Self) {
        self.histogram.merge(&other.histogram);
        self.saturated_trials += other.saturated_trials;
    }
}

/// Maximum uses simulated per trial: `floor(mean · multiplier)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn trial_cap(mean: f64, multiplier: f64) -> u64 {
    (mean * multiplier).floor().max(0.0) as u64
}

pub fn sample_uses_to_break(
    tool: &ToolState,
    experiments: u32,
    config: &EstimatorConfig,
    rng: &mut impl Rng,
) -> Result<UsesSample, EstimateError> {
    if experiments == 0 {
        return Err(EstimateError::ZeroExperiments);
    }
    let params = ProcessParameters::uses_to_break(tool)?;
    let process = DurabilityLossProcess::for_tool(tool)?;
    let cap = trial_cap(params.mean, config.trial_cap_multiplier);

    let mut sample = UsesSample::default();
    for _ in 0..experiments {
        match process.uses_until_break(tool.durability, cap, rng) {
            Some(uses) => sample.histogram.record(uses),
            None => {
                sample.saturated_trials += 1;
                if config.saturation_policy == SaturationPolicy::RecordZero {
                    sample.histogram.record(0);
                }
            }
        }
    }

    if sample.saturated_trials > 0 {
        tracing::debug!(
            saturated = sample.saturated_trials,
            cap,
            policy = ?config.saturation_policy,
            "trials reached the use cap"
        );
    }
    Ok(sample)
}

/// Summarise a uses-to-break sample into an interval.
///
/// Outcomes are swept in ascending order accumulating relative frequency. An
/// outcome is outside the interval when the running mass is `<= alpha/2` or
/// `>= confidence + alpha/2`. The median is the first outcome where the mass
/// reaches 0.5; if nothing lands inside, the interval collapses to it.
pub fn interval_from_histogram(
    sample: &UsesSample,
    confidence: ConfidenceLevel,
) -> Result<IntervalEstimate, EstimateError> {
    let histogram = &sample.histogram;
    if histogram.is_empty() {
        return Err(EstimateError::NoCompletedTrials);
    }

    let tail = confidence.tail();
    let upper_cut = confidence.value() + tail;

    let mut series = DisplaySeries::new(SeriesKind::Histogram);
    let mut cumulative = 0.0;
    let mut median: Option<(f64, f64)> = None;
    for (outcome, freq) in histogram.relative_frequencies() {
        cumulative += freq;
        let class = if cumulative <= tail || cumulative >= upper_cut {
            PointClass::Outside
        } else {
            PointClass::Inside
        };
        let x = outcome as f64;
        series.push(x, freq, class);
        if median.is_none() && cumulative >= 0.5 {
            median = Some((x, freq));
        }
    }
    let Some((median_x, median_y)) = median else {
        return Err(EstimateError::NoCompletedTrials);
    };
    series.mark(MarkerKind::Median, median_x, median_y);

    let first_inside = series.classes.iter().position(|c| *c == PointClass::Inside);
    let last_inside = series.classes.iter().rposition(|c| *c == PointClass::Inside);
    let (lower, upper) = match (first_inside, last_inside) {
        (Some(first), Some(last)) => {
            let (lower, upper) = (series.x[first], series.x[last]);
            let (lower_y, upper_y) = (series.y[first], series.y[last]);
            series.mark(MarkerKind::Lower, lower, lower_y);
            series.mark(MarkerKind::Upper, upper, upper_y);
            (lower, upper)
        }
        _ => {
            tracing::debug!(median = median_x, "no outcome inside the interval");
            (median_x, median_x)
        }
    };

    Ok(IntervalEstimate {
        lower,
        upper,
        center: median_x,
        saturated_trials: sample.saturated_trials,
        series,
    })
}

/// Monte Carlo interval over `experiments` independent trials.
pub fn simulate_interval(
    tool: &ToolState,
    confidence: ConfidenceLevel,
    experiments: u32,
    config: &EstimatorConfig,
    rng: &mut impl Rng,
) -> Result<IntervalEstimate, EstimateError> {
    let sample = sample_uses_to_break(tool, experiments, config, rng)?;
    interval_from_histogram(&sample, confidence)
}
