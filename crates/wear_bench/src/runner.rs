use crate::scenario::Case;
use anyhow::{bail, Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use wear_core::{
    interval_from_histogram, precise_interval, precise_probability, probability_from_histogram,
    sample_durability_lost, sample_uses_to_break, ConfidenceLevel, EstimatorConfig,
    OutcomeHistogram, UsesSample,
};

/// Raw Monte Carlo outcomes for one case, kept so seeds can be pooled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseSample {
    Interval(UsesSample),
    Probability(OutcomeHistogram),
}

impl CaseSample {
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (CaseSample::Interval(ours), CaseSample::Interval(theirs)) => ours.merge(theirs),
            (CaseSample::Probability(ours), CaseSample::Probability(theirs)) => {
                ours.merge(theirs);
            }
            _ => bail!("cannot pool samples from different case kinds"),
        }
        Ok(())
    }
}

/// A simulated value next to its analytic counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: &'static str,
    pub simulated: f64,
    pub precise: f64,
}

impl Metric {
    pub fn abs_error(&self) -> f64 {
        (self.simulated - self.precise).abs()
    }
}

pub struct CaseRun {
    pub sample: CaseSample,
    pub metrics: Vec<Metric>,
}

pub struct SeedResult {
    pub seed: u64,
    pub cases: Vec<CaseRun>,
    pub wall_time_ms: u64,
}

/// Draw the Monte Carlo sample for one case.
pub fn sample_case(
    case: &Case,
    experiments: u32,
    config: &EstimatorConfig,
    rng: &mut ChaCha8Rng,
) -> Result<CaseSample> {
    let tool = case.tool()?;
    Ok(match case {
        Case::Interval { .. } => {
            CaseSample::Interval(sample_uses_to_break(&tool, experiments, config, rng)?)
        }
        Case::Probability { blocks, .. } => {
            CaseSample::Probability(sample_durability_lost(&tool, *blocks, experiments, rng)?)
        }
    })
}

/// Compare a sample's estimate with the analytic one.
pub fn evaluate(case: &Case, sample: &CaseSample, config: &EstimatorConfig) -> Result<Vec<Metric>> {
    let tool = case.tool()?;
    match (case, sample) {
        (Case::Interval { confidence, .. }, CaseSample::Interval(uses)) => {
            let confidence = ConfidenceLevel::new(*confidence)?;
            let simulated = interval_from_histogram(uses, confidence)?;
            let precise = precise_interval(&tool, confidence, config)?;
            Ok(vec![
                Metric {
                    name: "lower",
                    simulated: simulated.lower,
                    precise: precise.lower,
                },
                Metric {
                    name: "upper",
                    simulated: simulated.upper,
                    precise: precise.upper,
                },
                Metric {
                    name: "center",
                    simulated: simulated.center,
                    precise: precise.center,
                },
            ])
        }
        (Case::Probability { blocks, .. }, CaseSample::Probability(losses)) => {
            let simulated = probability_from_histogram(losses, tool.durability)?;
            let precise = precise_probability(&tool, *blocks, config)?;
            Ok(vec![Metric {
                name: "probability",
                simulated: simulated.probability,
                precise: precise.probability,
            }])
        }
        _ => bail!("sample kind does not match case '{}'", case.label()),
    }
}

/// Run every case for one seed. Cases share the seed's RNG stream in order.
pub fn run_seed(
    cases: &[Case],
    experiments: u32,
    config: &EstimatorConfig,
    seed: u64,
) -> Result<SeedResult> {
    let start = Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut runs = Vec::with_capacity(cases.len());
    for case in cases {
        let sample = sample_case(case, experiments, config, &mut rng)
            .with_context(|| format!("seed {seed}: sampling {}", case.label()))?;
        let metrics = evaluate(case, &sample, config)
            .with_context(|| format!("seed {seed}: evaluating {}", case.label()))?;
        runs.push(CaseRun { sample, metrics });
    }

    #[allow(clippy::cast_possible_truncation)]
    let wall_time_ms = start.elapsed().as_millis() as u64;
    tracing::debug!(seed, wall_time_ms, "seed finished");

    Ok(SeedResult {
        seed,
        cases: runs,
        wall_time_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wear_core::test_fixtures::base_config;

    fn cases() -> Vec<Case> {
        vec![
            Case::Interval {
                durability: 100,
                enchant_level: 2,
                confidence: 0.95,
            },
            Case::Probability {
                durability: 100,
                enchant_level: 2,
                blocks: 300,
            },
        ]
    }

    #[test]
    fn test_run_seed_produces_metrics_per_case() {
        let result = run_seed(&cases(), 2000, &base_config(), 42).unwrap();

        assert_eq!(result.seed, 42);
        assert_eq!(result.cases.len(), 2);
        let names: Vec<_> = result.cases[0].metrics.iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["lower", "upper", "center"]);
        let probability = &result.cases[1].metrics[0];
        assert!((probability.precise - 0.5).abs() < 1e-9);
        assert!(probability.abs_error() < 0.1, "{probability:?}");
    }

    #[test]
    fn test_run_seed_determinism() {
        let first = run_seed(&cases(), 500, &base_config(), 7).unwrap();
        let second = run_seed(&cases(), 500, &base_config(), 7).unwrap();

        for (a, b) in first.cases.iter().zip(&second.cases) {
            assert_eq!(a.sample, b.sample);
            assert_eq!(a.metrics, b.metrics);
        }
    }

    #[test]
    fn test_pooled_sample_counts_every_trial() {
        let config = base_config();
        let case = &cases()[0];
        let mut pooled = run_seed(std::slice::from_ref(case), 300, &config, 1)
            .unwrap()
            .cases
            .remove(0)
            .sample;
        let other = run_seed(std::slice::from_ref(case), 300, &config, 2)
            .unwrap()
            .cases
            .remove(0)
            .sample;
        pooled.merge(&other).unwrap();

        let CaseSample::Interval(uses) = &pooled else {
            panic!("expected interval sample");
        };
        assert_eq!(uses.histogram.total(), 600);
        assert!(evaluate(case, &pooled, &config).is_ok());
    }

    #[test]
    fn test_merge_rejects_mixed_kinds() {
        let mut interval = CaseSample::Interval(UsesSample::default());
        let probability = CaseSample::Probability(OutcomeHistogram::new());
        assert!(interval.merge(&probability).is_err());
    }
}
