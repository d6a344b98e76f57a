//! Integration tests: behaviour of the four estimators over the shared process.

use wear_core::test_fixtures::{base_config, make_rng, sample_tool};
use wear_core::*;

fn confidence(value: f64) -> ConfidenceLevel {
    ConfidenceLevel::new(value).unwrap()
}

#[test]
fn precise_interval_brackets_mean() {
    let config = base_config();
    for durability in [1, 5, 60, 250, 1561] {
        for enchant_level in 0..=5 {
            let tool = ToolState::new(durability, enchant_level).unwrap();
            let estimate = precise_interval(&tool, confidence(0.95), &config).unwrap();
            assert!(
                estimate.lower <= estimate.center && estimate.center <= estimate.upper,
                "durability={durability} level={enchant_level}: {} <= {} <= {}",
                estimate.lower,
                estimate.center,
                estimate.upper
            );
        }
    }
}

#[test]
fn precise_interval_widens_with_confidence() {
    let config = base_config();
    let tool = sample_tool();
    let levels = [0.1, 0.5, 0.8, 0.9, 0.95, 0.99, 0.999, 1.0];
    let estimates: Vec<IntervalEstimate> = levels
        .iter()
        .map(|&c| precise_interval(&tool, confidence(c), &config).unwrap())
        .collect();
    for pair in estimates.windows(2) {
        assert!(pair[1].lower < pair[0].lower);
        assert!(pair[1].upper > pair[0].upper);
    }
}

#[test]
fn precise_interval_scenario_durability_100_level_2() {
    let tool = ToolState::new(100, 2).unwrap();
    let params = ProcessParameters::uses_to_break(&tool).unwrap();
    assert!((params.mean - 300.0).abs() < 1e-9);
    assert!((params.step_variance - 6.0).abs() < 1e-9);

    let estimate = precise_interval(&tool, confidence(0.95), &base_config()).unwrap();
    let expected_half_width = 1.96 * (100.0_f64 * 6.0).sqrt();
    let lower_gap = 300.0 - estimate.lower;
    let upper_gap = estimate.upper - 300.0;
    assert!((lower_gap - upper_gap).abs() < 1e-9);
    assert!((upper_gap - expected_half_width).abs() < 0.01);
}

#[test]
fn precise_probability_is_a_probability() {
    let config = base_config();
    for durability in [1, 10, 100] {
        for enchant_level in 0..=3 {
            for blocks in [1, 5, 50, 500, 5000] {
                let tool = ToolState::new(durability, enchant_level).unwrap();
                let p = precise_probability(&tool, blocks, &config).unwrap().probability;
                assert!((0.0..=1.0).contains(&p), "{durability}/{enchant_level}/{blocks}: {p}");
            }
        }
    }
}

#[test]
fn precise_probability_near_one_for_few_blocks() {
    let tool = ToolState::new(10, 1).unwrap();
    let estimate = precise_probability(&tool, 1, &base_config()).unwrap();
    assert!(estimate.probability > 0.999_999);
}

#[test]
fn precise_probability_never_drops_with_enchant_level() {
    let config = base_config();
    for (durability, blocks) in [(10, 10), (10, 100), (100, 150), (250, 2000)] {
        let probabilities: Vec<f64> = (1..=10)
            .map(|level| {
                let tool = ToolState::new(durability, level).unwrap();
                precise_probability(&tool, blocks, &config).unwrap().probability
            })
            .collect();
        for pair in probabilities.windows(2) {
            assert!(
                pair[1] >= pair[0] - 1e-12,
                "durability={durability} blocks={blocks}: {probabilities:?}"
            );
        }
    }
}

#[test]
fn unenchanted_tool_survives_uses_equal_to_durability() {
    let config = base_config();
    let ten = ToolState::new(10, 0).unwrap();
    let estimate = precise_probability(&ten, 10, &config).unwrap();
    assert!((estimate.probability - 1.0).abs() < f64::EPSILON);

    // The survival threshold is inclusive: losing the last point still counts.
    let one = ToolState::new(1, 0).unwrap();
    let at_boundary = precise_probability(&one, 1, &config).unwrap();
    assert!((at_boundary.probability - 1.0).abs() < f64::EPSILON);
    let past_boundary = precise_probability(&one, 2, &config).unwrap();
    assert!(past_boundary.probability.abs() < f64::EPSILON);
}

#[test]
fn simulated_probability_converges_to_precise() {
    // mean loss 200, std 10; durability 1.5 std above the mean.
    let tool = ToolState::new(215, 1).unwrap();
    let precise = precise_probability(&tool, 400, &base_config()).unwrap();
    let simulated = simulate_probability(&tool, 400, 100_000, &mut make_rng()).unwrap();
    assert!(
        (simulated.probability - precise.probability).abs() < 0.02,
        "simulated {} vs precise {}",
        simulated.probability,
        precise.probability
    );
}

#[test]
fn simulated_interval_tracks_precise() {
    let config = base_config();
    let tool = sample_tool();
    let precise = precise_interval(&tool, confidence(0.95), &config).unwrap();
    let simulated =
        simulate_interval(&tool, confidence(0.95), 20_000, &config, &mut make_rng()).unwrap();

    assert_eq!(simulated.saturated_trials, 0);
    assert!((simulated.lower - precise.lower).abs() < 0.05 * precise.lower);
    assert!((simulated.upper - precise.upper).abs() < 0.05 * precise.upper);
    assert!((simulated.center - precise.center).abs() < 0.05 * precise.center);
    assert!(simulated.series.marker(MarkerKind::Median).is_some());
    assert!(simulated.series.marker(MarkerKind::Lower).is_some());
    assert!(simulated.series.marker(MarkerKind::Upper).is_some());
}

#[test]
fn simulated_interval_without_inside_bucket_collapses_to_median() {
    // Every trial breaks on use 8, so the single bucket closes at mass 1.0.
    let tool = ToolState::new(8, 0).unwrap();
    let estimate =
        simulate_interval(&tool, confidence(0.95), 500, &base_config(), &mut make_rng()).unwrap();
    assert!(!estimate.series.classes.contains(&PointClass::Inside));
    assert!((estimate.lower - 8.0).abs() < 1e-12);
    assert!((estimate.upper - 8.0).abs() < 1e-12);
    assert!((estimate.center - 8.0).abs() < 1e-12);
}

#[test]
fn simulated_probability_series_splits_at_durability() {
    let tool = ToolState::new(20, 1).unwrap();
    let estimate = simulate_probability(&tool, 40, 5_000, &mut make_rng()).unwrap();
    let series = &estimate.series;
    assert_eq!(series.kind, SeriesKind::Histogram);
    for row in series.rows() {
        assert_eq!(row.class == PointClass::Inside, row.x <= 20.0);
    }
    assert!((series.y.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    let mode = series.marker(MarkerKind::Mode).unwrap();
    assert!(series.y.iter().all(|&y| y <= mode.y));
}

#[test]
fn estimators_are_idempotent() {
    let config = base_config();
    let tool = sample_tool();
    let c = confidence(0.9);

    assert_eq!(
        precise_interval(&tool, c, &config).unwrap(),
        precise_interval(&tool, c, &config).unwrap()
    );
    assert_eq!(
        precise_probability(&tool, 250, &config).unwrap(),
        precise_probability(&tool, 250, &config).unwrap()
    );
    assert_eq!(
        simulate_interval(&tool, c, 1_000, &config, &mut make_rng()).unwrap(),
        simulate_interval(&tool, c, 1_000, &config, &mut make_rng()).unwrap()
    );
    assert_eq!(
        simulate_probability(&tool, 250, 1_000, &mut make_rng()).unwrap(),
        simulate_probability(&tool, 250, 1_000, &mut make_rng()).unwrap()
    );
}

#[test]
fn pooled_samples_summarise_like_one_run() {
    let config = base_config();
    let tool = sample_tool();
    let mut rng = make_rng();
    let mut pooled = sample_uses_to_break(&tool, 2_000, &config, &mut rng).unwrap();
    let second = sample_uses_to_break(&tool, 3_000, &config, &mut rng).unwrap();
    pooled.merge(&second);

    let estimate = interval_from_histogram(&pooled, confidence(0.95)).unwrap();
    assert_eq!(pooled.histogram.total(), 5_000);
    assert!(estimate.lower < 300.0 && 300.0 < estimate.upper);
}

#[test]
fn estimates_serialize_for_renderers() {
    let tool = sample_tool();
    let estimate = precise_interval(&tool, confidence(0.95), &base_config()).unwrap();
    let json = serde_json::to_value(&estimate).unwrap();
    assert_eq!(json["series"]["kind"], "density");
    assert_eq!(json["series"]["markers"].as_array().unwrap().len(), 3);
    assert_eq!(json["saturated_trials"], 0);
}

#[test]
fn full_confidence_bounds_serialize_as_infinite() {
    let estimate = precise_interval(&sample_tool(), confidence(1.0), &base_config()).unwrap();
    let json = serde_json::to_value(&estimate).unwrap();
    assert_eq!(json["lower"], "-inf");
    assert_eq!(json["upper"], "inf");
    assert!(json["center"].is_f64());
    let markers = json["series"]["markers"].as_array().unwrap();
    assert_eq!(markers[0]["kind"], "lower");
    assert_eq!(markers[0]["x"], "-inf");
    assert_eq!(markers[2]["x"], "inf");
}
