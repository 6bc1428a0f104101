use std::path::PathBuf;

use clap::Parser;

use pullrate_ingest::config::{IngestConfig, ResolvedOutputs};
use pullrate_ingest::logging::init_logging;
use pullrate_ingest::pipeline::PipelineRunner;

/// Turns a bulk card snapshot into booster pull-rate data.
#[derive(Debug, Parser)]
#[command(
    name = "pullrate-ingest",
    author,
    version,
    about = "Build per-card records and per-set rarity statistics from a bulk card snapshot"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "ingest.yaml")]
    config: PathBuf,

    /// Override the bulk snapshot path.
    #[arg(short, long, value_name = "FILE")]
    input: Option<String>,

    /// Override the language code cards must be printed in.
    #[arg(long, value_name = "LANG")]
    language: Option<String>,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Exit after validating the configuration (no snapshot is read).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = IngestConfig::from_path(&cli.config)?;

    if let Some(input) = cli.input {
        config.input = input;
    }

    if let Some(language) = cli.language {
        config.filter.language = language;
    }

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();

    println!("Reading:  {}", outputs.input.display());
    println!("Writing:  {}", outputs.cards_ndjson.display());
    println!("Sets:     {}", outputs.sets_json.display());

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = PipelineRunner::new(config)?;

    if cli.validate_only {
        println!("Validation-only mode: snapshot not read.");
        return Ok(());
    }

    let summary = runner.run()?;
    let counters = &summary.counters;
    println!();
    println!("=== Done ===");
    println!("Total read:    {}", counters.read);
    println!("Total kept:    {}", counters.kept);
    println!("Total skipped: {}", counters.skipped);
    println!("Duplicates:    {}", counters.duplicates);
    println!("No set info:   {}", counters.incomplete);
    println!("Total sets:    {}", summary.sets);
    println!("Set files:     {}", summary.set_files_written);
    println!(
        "Output size:   {:.2} MB",
        summary.cards_bytes as f64 / 1024.0 / 1024.0
    );
    println!("Sets size:     {:.2} KB", summary.sets_bytes as f64 / 1024.0);
    for (reason, count) in &counters.skip_reasons {
        println!("  skipped ({}): {count}", reason.as_str());
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Log:           {}", guard.log_path.display());
    }

    Ok(())
}
