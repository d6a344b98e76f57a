use crate::runner::{self, CaseSample, SeedResult};
use crate::scenario::Case;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use wear_core::EstimatorConfig;

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub seed_count: usize,
    pub experiments_per_seed: u32,
    pub cases: Vec<CaseSummary>,
}

#[derive(Debug, Serialize)]
pub struct CaseSummary {
    pub case: String,
    /// Trials that hit the use cap, summed over seeds.
    pub saturated_trials: u64,
    pub metrics: Vec<MetricSummary>,
}

#[derive(Debug, Serialize)]
pub struct MetricSummary {
    pub name: String,
    #[serde(serialize_with = "wear_core::serde_float::serialize")]
    pub precise: f64,
    pub simulated: Spread,
    pub abs_error: Spread,
    /// Estimate from every seed's trials merged into one sample.
    #[serde(serialize_with = "wear_core::serde_float::serialize")]
    pub pooled: f64,
    #[serde(serialize_with = "wear_core::serde_float::serialize")]
    pub pooled_abs_error: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spread {
    #[serde(serialize_with = "wear_core::serde_float::serialize")]
    pub mean: f64,
    #[serde(serialize_with = "wear_core::serde_float::serialize")]
    pub min: f64,
    #[serde(serialize_with = "wear_core::serde_float::serialize")]
    pub max: f64,
    #[serde(serialize_with = "wear_core::serde_float::serialize")]
    pub stddev: f64,
}

/// Summarise per-seed results case by case. `results` must all come from
/// the same `cases` list.
pub fn compute_summary(
    cases: &[Case],
    results: &[SeedResult],
    experiments: u32,
    config: &EstimatorConfig,
) -> Result<SummaryStats> {
    let mut summaries = Vec::with_capacity(cases.len());
    for (index, case) in cases.iter().enumerate() {
        let runs: Vec<_> = results.iter().map(|r| &r.cases[index]).collect();
        let Some((first, rest)) = runs.split_first() else {
            continue;
        };

        let mut pooled = first.sample.clone();
        for run in rest {
            pooled.merge(&run.sample)?;
        }
        let saturated_trials = match &pooled {
            CaseSample::Interval(uses) => uses.saturated_trials,
            CaseSample::Probability(_) => 0,
        };
        let pooled_metrics = runner::evaluate(case, &pooled, config)
            .with_context(|| format!("evaluating pooled sample for {}", case.label()))?;

        let metrics = pooled_metrics
            .iter()
            .enumerate()
            .map(|(m, pooled_metric)| {
                let simulated: Vec<f64> = runs.iter().map(|r| r.metrics[m].simulated).collect();
                let errors: Vec<f64> = runs.iter().map(|r| r.metrics[m].abs_error()).collect();
                MetricSummary {
                    name: pooled_metric.name.to_string(),
                    precise: pooled_metric.precise,
                    simulated: compute_spread(&simulated),
                    abs_error: compute_spread(&errors),
                    pooled: pooled_metric.simulated,
                    pooled_abs_error: pooled_metric.abs_error(),
                }
            })
            .collect();

        summaries.push(CaseSummary {
            case: case.label(),
            saturated_trials,
            metrics,
        });
    }

    Ok(SummaryStats {
        seed_count: results.len(),
        experiments_per_seed: experiments,
        cases: summaries,
    })
}

/// Population statistics over `values`.
pub fn compute_spread(values: &[f64]) -> Spread {
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;

    Spread {
        mean,
        min,
        max,
        stddev: variance.sqrt(),
    }
}

pub fn print_summary(scenario_name: &str, stats: &SummaryStats) {
    println!(
        "\n=== {} ({} seeds, {} experiments each) ===",
        scenario_name, stats.seed_count, stats.experiments_per_seed
    );
    for case in &stats.cases {
        println!("\n{}", case.case);
        println!(
            "{:<12} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Metric", "Precise", "Mean", "Min", "Max", "StdDev", "MeanErr", "Pooled"
        );
        println!("{}", "-".repeat(89));
        for metric in &case.metrics {
            println!(
                "{:<12} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                metric.name,
                metric.precise,
                metric.simulated.mean,
                metric.simulated.min,
                metric.simulated.max,
                metric.simulated.stddev,
                metric.abs_error.mean,
                metric.pooled,
            );
        }
        if case.saturated_trials > 0 {
            println!("{:<12} {}", "saturated", case.saturated_trials);
        }
    }
}

/// Write `value` as pretty JSON via a sibling tmp file and rename.
pub fn write_atomic(path: &Path, value: &impl Serialize) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value).context("serializing summary")?;
    let mut file = std::fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("writing {}", tmp_path.display()))?;
    file.sync_all()?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} to {}", tmp_path.display(), path.display()))?;
    Ok(())
}
