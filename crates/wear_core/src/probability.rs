//! Probability estimators: how likely a tool survives a fixed number of uses.

use rand::Rng;

use crate::normal::{linspace, NormalApprox};
use crate::{
    DisplaySeries, DurabilityLossProcess, EstimateError, EstimatorConfig, MarkerKind,
    OutcomeHistogram, PointClass, ProbabilityEstimate, ProcessParameters, ToolState,
};

fn survives(loss: f64, durability: f64) -> PointClass {
    if loss <= durability {
        PointClass::Inside
    } else {
        PointClass::Outside
    }
}

/// Analytic survival probability: durability lost after `blocks` uses is
/// approximated as normal, and the tool survives while the loss stays at or
/// below its durability.
pub fn precise_probability(
    tool: &ToolState,
    blocks: u64,
    config: &EstimatorConfig,
) -> Result<ProbabilityEstimate, EstimateError> {
    let params = ProcessParameters::durability_lost(tool, blocks)?;
    let normal = NormalApprox::new(params.mean, params.std_dev)?;
    let durability = f64::from(tool.durability);
    let probability = normal.cdf(durability);

    let series = if normal.is_point_mass() {
        let mut series = DisplaySeries::point_mass(params.mean, survives(params.mean, durability));
        series.mark(MarkerKind::Peak, params.mean, 1.0);
        series
    } else {
        let span = config.density_span_std * params.std_dev;
        let xs = linspace(
            params.mean - span,
            params.mean + span,
            config.probability_density_points,
        );
        let mut series = DisplaySeries::sampled(
            xs,
            |x| normal.density(x),
            |x| {
                if x < durability {
                    PointClass::Inside
                } else {
                    PointClass::Outside
                }
            },
        );
        series.mark(MarkerKind::Peak, params.mean, normal.density(params.mean));
        series
    };

    Ok(ProbabilityEstimate {
        probability,
        center: params.mean,
        series,
    })
}

/// Durability-lost histogram: each trial makes exactly `blocks` draws.
pub fn sample_durability_lost(
    tool: &ToolState,
    blocks: u64,
    experiments: u32,
    rng: &mut impl Rng,
) -> Result<OutcomeHistogram, EstimateError> {
    tool.validate()?;
    if blocks == 0 {
        return Err(EstimateError::ZeroBlocks);
    }
    if experiments == 0 {
        return Err(EstimateError::ZeroExperiments);
    }
    let process = DurabilityLossProcess::for_tool(tool)?;

    let mut histogram = OutcomeHistogram::new();
    for _ in 0..experiments {
        histogram.record(process.durability_lost(blocks, rng));
    }
    Ok(histogram)
}

/// Empirical survival rate: relative frequency of `loss <= durability`.
pub fn probability_from_histogram(
    histogram: &OutcomeHistogram,
    durability: u32,
) -> Result<ProbabilityEstimate, EstimateError> {
    let Some((mode, mode_count)) = histogram.mode() else {
        return Err(EstimateError::NoCompletedTrials);
    };
    let threshold = u64::from(durability);
    let mut series = DisplaySeries::bars(histogram, |loss| {
        if loss <= threshold {
            PointClass::Inside
        } else {
            PointClass::Outside
        }
    });
    let mode = mode as f64;
    series.mark(
        MarkerKind::Mode,
        mode,
        mode_count as f64 / histogram.total() as f64,
    );

    Ok(ProbabilityEstimate {
        probability: series.inside_mass(),
        center: mode,
        series,
    })
}

/// Monte Carlo survival probability over `experiments` independent trials.
pub fn simulate_probability(
    tool: &ToolState,
    blocks: u64,
    experiments: u32,
    rng: &mut impl Rng,
) -> Result<ProbabilityEstimate, EstimateError> {
    let histogram = sample_durability_lost(tool, blocks, experiments, rng)?;
    probability_from_histogram(&histogram, tool.durability)
}
