use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use wear_core::EstimatorConfig;

mod overrides;
mod runner;
mod scenario;
mod summary;

#[derive(Parser)]
#[command(
    name = "wear_bench",
    about = "Convergence runner comparing simulated and analytic estimates"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file across multiple seeds.
    Run {
        /// Path to the scenario JSON file.
        #[arg(long)]
        scenario: PathBuf,
        /// Output directory (default: runs/).
        #[arg(long, default_value = "runs")]
        output_dir: PathBuf,
    },
}

#[derive(Serialize)]
struct BatchSummary<'a> {
    batch_schema_version: u32,
    batch_id: String,
    scenario_name: &'a str,
    config: &'a EstimatorConfig,
    seeds: Vec<u64>,
    failed_seeds: Vec<u64>,
    total_wall_time_ms: u64,
    summary: summary::SummaryStats,
}

fn run(scenario_path: &Path, output_dir: &Path) -> Result<()> {
    let scenario = scenario::load_scenario(scenario_path)?;
    let seeds = scenario.seeds.expand();

    println!(
        "Loading scenario '{}': {} seeds × {} cases × {} experiments",
        scenario.name,
        seeds.len(),
        scenario.cases.len(),
        scenario.experiments
    );

    let mut config = EstimatorConfig::default();
    overrides::apply_overrides(&mut config, &scenario.overrides)?;

    // Create timestamped output directory.
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_dir = output_dir.join(format!("{}_{}", scenario.name, timestamp));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating output directory: {}", run_dir.display()))?;
    std::fs::copy(scenario_path, run_dir.join("scenario.json")).context("copying scenario file")?;

    println!("Output: {}", run_dir.display());
    println!("Running {} seeds in parallel...", seeds.len());

    let results: Vec<(u64, Result<runner::SeedResult>)> = seeds
        .par_iter()
        .map(|&seed| {
            let result = runner::run_seed(&scenario.cases, scenario.experiments, &config, seed);
            (seed, result)
        })
        .collect();

    let mut seed_results = Vec::new();
    let mut failed_seeds = Vec::new();
    for (seed, result) in results {
        match result {
            Ok(seed_result) => seed_results.push(seed_result),
            Err(err) => {
                tracing::error!(seed, "seed failed: {err:#}");
                failed_seeds.push(seed);
            }
        }
    }
    if seed_results.is_empty() {
        anyhow::bail!("all seeds failed");
    }

    let stats = summary::compute_summary(
        &scenario.cases,
        &seed_results,
        scenario.experiments,
        &config,
    )?;
    summary::print_summary(&scenario.name, &stats);

    let batch = BatchSummary {
        batch_schema_version: 1,
        batch_id: Uuid::new_v4().to_string(),
        scenario_name: &scenario.name,
        config: &config,
        seeds: seed_results.iter().map(|r| r.seed).collect(),
        failed_seeds,
        total_wall_time_ms: seed_results.iter().map(|r| r.wall_time_ms).sum(),
        summary: stats,
    };
    let summary_path = run_dir.join("summary.json");
    summary::write_atomic(&summary_path, &batch)?;
    tracing::info!(batch_id = %batch.batch_id, "batch complete");

    println!("Summary written to {}", summary_path.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            scenario,
            output_dir,
        } => run(&scenario, &output_dir)?,
    }
    Ok(())
}
