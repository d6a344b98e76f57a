use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use wear_core::{
    precise_interval, precise_probability, simulate_interval, simulate_probability,
    ConfidenceLevel, DisplaySeries, EstimatorConfig, ToolState,
};

mod output;
mod report;
mod validate;

use report::Report;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "wear_cli", about = "Tool durability estimator")]
struct Cli {
    /// Estimator settings JSON. Missing fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Range of blocks the tool will mine at a confidence level.
    Interval {
        #[command(flatten)]
        tool: ToolArgs,
        /// Confidence level in percent, from 0.1 (exclusive) to 100.
        #[arg(long)]
        confidence: Option<f64>,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Probability the tool survives mining a number of blocks.
    Probability {
        #[command(flatten)]
        tool: ToolArgs,
        #[arg(long, allow_negative_numbers = true)]
        blocks: i64,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct ToolArgs {
    #[arg(long, allow_negative_numbers = true)]
    durability: i64,
    /// Unbreaking enchantment level.
    #[arg(long, allow_negative_numbers = true)]
    enchant_level: i64,
}

#[derive(Args)]
struct RunArgs {
    /// Monte Carlo trials (default from config).
    #[arg(long, allow_negative_numbers = true)]
    experiments: Option<i64>,
    /// Seed for the simulation RNG. Drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = Method::Both)]
    method: Method,
    /// Print the estimates as JSON instead of text.
    #[arg(long)]
    json: bool,
    /// Write each display series as CSV into this directory.
    #[arg(long)]
    series_out: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    Precise,
    Simulated,
    Both,
}

impl Method {
    fn precise(self) -> bool {
        matches!(self, Method::Precise | Method::Both)
    }

    fn simulated(self) -> bool {
        matches!(self, Method::Simulated | Method::Both)
    }
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EstimatorConfig> {
    let Some(path) = path else {
        return Ok(EstimatorConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file: {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing config file: {}", path.display()))
}

fn parse_tool(args: &ToolArgs) -> Result<ToolState> {
    let durability = validate::durability(args.durability)?;
    let enchant_level = validate::enchant_level(args.enchant_level)?;
    Ok(ToolState::new(durability, enchant_level)?)
}

/// Seeded RNG for the simulated method, or `None` when it is not requested.
fn make_rng(run: &RunArgs) -> Option<(u64, ChaCha8Rng)> {
    if !run.method.simulated() {
        return None;
    }
    let seed = run.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "simulation seed");
    Some((seed, ChaCha8Rng::seed_from_u64(seed)))
}

fn export_series(dir: Option<&Path>, name: &str, series: &DisplaySeries) -> Result<()> {
    if let Some(dir) = dir {
        let path = output::write_series_csv(dir, name, series)?;
        println!("Series written to {}", path.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run_interval(
    tool: &ToolState,
    confidence: ConfidenceLevel,
    run: &RunArgs,
    config: &EstimatorConfig,
) -> Result<()> {
    let experiments = validate::experiments(run.experiments, config)?;
    tracing::info!(
        durability = tool.durability,
        enchant_level = tool.enchant_level,
        confidence = confidence.value(),
        experiments,
        "interval estimate"
    );

    let precise = if run.method.precise() {
        Some(precise_interval(tool, confidence, config)?)
    } else {
        None
    };
    let (seed, simulated) = match make_rng(run) {
        Some((seed, mut rng)) => (
            Some(seed),
            Some(simulate_interval(
                tool,
                confidence,
                experiments,
                config,
                &mut rng,
            )?),
        ),
        None => (None, None),
    };
    if let Some(estimate) = simulated.as_ref().filter(|e| e.saturated_trials > 0) {
        tracing::warn!(
            saturated = estimate.saturated_trials,
            "some trials reached the use cap without breaking"
        );
    }

    if run.json {
        let report = Report {
            seed,
            experiments: simulated.as_ref().map(|_| experiments),
            precise,
            simulated,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let series_dir = run.series_out.as_deref();
    if let Some(estimate) = &precise {
        let message = report::interval_message(confidence, estimate);
        report::print_section("Precise", &message, report::PRECISE_INTERVAL_LEGEND);
        export_series(series_dir, "interval_precise", &estimate.series)?;
    }
    if let Some(estimate) = &simulated {
        let message = report::interval_message(confidence, estimate);
        report::print_section(
            &report::simulation_title(seed),
            &message,
            report::SIMULATED_INTERVAL_LEGEND,
        );
        export_series(series_dir, "interval_simulated", &estimate.series)?;
    }
    Ok(())
}

fn run_probability(
    tool: &ToolState,
    blocks: u64,
    run: &RunArgs,
    config: &EstimatorConfig,
) -> Result<()> {
    let experiments = validate::experiments(run.experiments, config)?;
    tracing::info!(
        durability = tool.durability,
        enchant_level = tool.enchant_level,
        blocks,
        experiments,
        "probability estimate"
    );

    let precise = if run.method.precise() {
        Some(precise_probability(tool, blocks, config)?)
    } else {
        None
    };
    let (seed, simulated) = match make_rng(run) {
        Some((seed, mut rng)) => (
            Some(seed),
            Some(simulate_probability(tool, blocks, experiments, &mut rng)?),
        ),
        None => (None, None),
    };

    if run.json {
        let report = Report {
            seed,
            experiments: simulated.as_ref().map(|_| experiments),
            precise,
            simulated,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let series_dir = run.series_out.as_deref();
    if let Some(estimate) = &precise {
        let message = report::probability_message(blocks, estimate);
        report::print_section("Precise", &message, report::PRECISE_PROBABILITY_LEGEND);
        export_series(series_dir, "probability_precise", &estimate.series)?;
    }
    if let Some(estimate) = &simulated {
        let message = report::probability_message(blocks, estimate);
        report::print_section(
            &report::simulation_title(seed),
            &message,
            report::SIMULATED_PROBABILITY_LEGEND,
        );
        export_series(series_dir, "probability_simulated", &estimate.series)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Interval {
            tool,
            confidence,
            run,
        } => {
            let tool = parse_tool(&tool)?;
            let confidence = validate::confidence(confidence, &config)?;
            run_interval(&tool, confidence, &run, &config)?;
        }
        Commands::Probability { tool, blocks, run } => {
            let tool = parse_tool(&tool)?;
            let blocks = validate::blocks(blocks)?;
            run_probability(&tool, blocks, &run, &config)?;
        }
    }
    Ok(())
}
