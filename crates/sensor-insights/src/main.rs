use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::Table;
use sensor_insights_core::{all_tasks, AnalysisConfig, AnalysisSession, TaskOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs the five sensor-reading analyses and writes one CSV per task.
#[derive(Parser, Debug)]
#[command(author, version, about = "Batch analysis of IoT sensor readings", long_about = None)]
struct Cli {
    /// TOML file with analysis settings (falls back to SENSOR_INSIGHTS_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Input CSV, overriding the configured path
    #[arg(long)]
    input: Option<PathBuf>,
    /// Directory for the task output files, overriding the configured directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let mut session =
        AnalysisSession::open(config).context("failed to open analysis session")?;

    for (index, task) in all_tasks().into_iter().enumerate() {
        let outcome = session
            .run_task(task)
            .with_context(|| format!("task '{}' failed", task.name()))?;
        print_outcome(index + 1, task.name(), &outcome);
    }

    let summary = session.close();
    if let Some(path) = cli.summary.as_ref() {
        summary
            .write_json(path)
            .with_context(|| format!("failed to write run summary to {}", path.display()))?;
        info!(path = %path.display(), "Wrote run summary");
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<AnalysisConfig> {
    let config_path = cli
        .config
        .clone()
        .or_else(|| env::var("SENSOR_INSIGHTS_CONFIG").ok().map(PathBuf::from));

    let mut config = match config_path {
        Some(path) => AnalysisConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(input) = cli.input.clone() {
        config.input_path = input;
    }
    if let Some(output_dir) = cli.output_dir.clone() {
        config.output_dir = output_dir;
    }

    Ok(config)
}

fn print_outcome(number: usize, name: &str, outcome: &TaskOutcome) {
    println!("------ Task {number}: {name} ------");
    println!("{}", outcome.preview);

    if !outcome.highlights.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Metric", "Value"]);
        for (label, value) in &outcome.highlights {
            table.add_row(vec![label.as_str(), value.as_str()]);
        }
        println!("{table}");
    }
}
