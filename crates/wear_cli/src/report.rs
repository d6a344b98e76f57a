//! Human-readable rendering of estimates.

use serde::Serialize;
use wear_core::{ConfidenceLevel, IntervalEstimate, ProbabilityEstimate};

/// Precise and simulated results for one invocation, as emitted by `--json`.
#[derive(Debug, Serialize)]
pub struct Report<T> {
    pub seed: Option<u64>,
    pub experiments: Option<u32>,
    pub precise: Option<T>,
    pub simulated: Option<T>,
}

/// Interval bounds are whole uses; infinite bounds print as `∞`.
pub fn format_bound(value: f64) -> String {
    if value.is_infinite() {
        if value > 0.0 { "∞" } else { "-∞" }.to_string()
    } else {
        format!("{}", value.round() + 0.0)
    }
}

/// Percentage without trailing zeros: 0.95 → "95", 0.999 → "99.9".
pub fn format_percent(fraction: f64) -> String {
    let text = format!("{:.3}", fraction * 100.0);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn interval_message(confidence: ConfidenceLevel, estimate: &IntervalEstimate) -> String {
    format!(
        "You can be {}% sure that the pickaxe will mine\nfrom {} to {} blocks",
        format_percent(confidence.value()),
        format_bound(estimate.lower),
        format_bound(estimate.upper),
    )
}

pub fn probability_message(blocks: u64, estimate: &ProbabilityEstimate) -> String {
    format!(
        "Probability of not breaking pickaxe after mining {blocks} blocks is {:.2}%",
        estimate.probability * 100.0
    )
}

pub const PRECISE_INTERVAL_LEGEND: &str = "\
X axis: how many blocks will be mined
Highest point of curve: the most expected amount of blocks to mine
Left and right boundaries: the least expected amount of blocks to mine";

pub const SIMULATED_INTERVAL_LEGEND: &str = "\
X axis: how many blocks were mined before breaking
Y axis: relative frequency (frequency / number of experiments)
Marked bar in the middle: median amount of blocks mined
Shaded green bars: blocks mined within the confidence interval";

pub const PRECISE_PROBABILITY_LEGEND: &str = "\
X axis: how much durability will be lost
Highest point of curve: the most expected durability amount to lose
Shaded area: probability of not breaking pickaxe after mining";

pub const SIMULATED_PROBABILITY_LEGEND: &str = "\
X axis: how much durability will be lost
Y axis: relative frequency (frequency / number of experiments)
Highest bar: the most frequent durability amount to lose
Shaded green area: probability of not breaking pickaxe after mining";

/// Simulation section heading; carries the seed so the run can be repeated.
pub fn simulation_title(seed: Option<u64>) -> String {
    match seed {
        Some(seed) => format!("Simulation (seed {seed})"),
        None => "Simulation".to_string(),
    }
}

pub fn print_section(title: &str, message: &str, legend: &str) {
    println!("=== {title} ===");
    println!("{message}");
    println!();
    println!("{legend}");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use wear_core::test_fixtures::{base_config, sample_tool};
    use wear_core::{precise_interval, precise_probability};

    #[test]
    fn bounds_round_to_whole_uses() {
        assert_eq!(format_bound(252.49), "252");
        assert_eq!(format_bound(347.5), "348");
        assert_eq!(format_bound(-0.2), "0");
    }

    #[test]
    fn infinite_bounds_use_symbol() {
        assert_eq!(format_bound(f64::INFINITY), "∞");
        assert_eq!(format_bound(f64::NEG_INFINITY), "-∞");
    }

    #[test]
    fn percent_trims_trailing_zeros() {
        assert_eq!(format_percent(0.95), "95");
        assert_eq!(format_percent(0.999), "99.9");
        assert_eq!(format_percent(1.0), "100");
    }

    #[test]
    fn interval_message_shows_both_bounds() {
        let confidence = ConfidenceLevel::new(0.95).unwrap();
        let estimate = precise_interval(&sample_tool(), confidence, &base_config()).unwrap();
        let message = interval_message(confidence, &estimate);
        assert!(message.contains("95% sure"));
        assert!(message.contains("from 252 to 348 blocks"), "{message}");
    }

    #[test]
    fn unbounded_interval_message() {
        let confidence = ConfidenceLevel::new(1.0).unwrap();
        let estimate = precise_interval(&sample_tool(), confidence, &base_config()).unwrap();
        assert!(interval_message(confidence, &estimate).contains("from -∞ to ∞ blocks"));
    }

    #[test]
    fn json_report_keeps_unbounded_interval() {
        let confidence = ConfidenceLevel::new(1.0).unwrap();
        let report = Report {
            seed: None,
            experiments: None,
            precise: Some(precise_interval(&sample_tool(), confidence, &base_config()).unwrap()),
            simulated: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["seed"].is_null());
        assert_eq!(json["precise"]["lower"], "-inf");
        assert_eq!(json["precise"]["upper"], "inf");
    }

    #[test]
    fn simulation_title_names_seed() {
        assert_eq!(simulation_title(Some(1234)), "Simulation (seed 1234)");
        assert_eq!(simulation_title(None), "Simulation");
    }

    #[test]
    fn probability_message_two_decimals() {
        let estimate = precise_probability(&sample_tool(), 300, &base_config()).unwrap();
        let message = probability_message(300, &estimate);
        assert!(message.contains("after mining 300 blocks is 50.00%"), "{message}");
    }
}
