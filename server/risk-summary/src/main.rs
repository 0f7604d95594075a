//! Terminal dashboard: render the sample records, optionally ask for a risk summary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use metric_risk::{assess_all, sample_records, ThresholdTable};
use risk_summary::dashboard::{http_controller, render_table, stream_summary, unavailable_text};
use risk_summary::SummaryConfig;

#[derive(Parser)]
#[command(name = "blood-metrics")]
#[command(about = "Blood metrics dashboard with LLM risk summary")]
#[command(version)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the records with high-risk values marked
  Table,
  /// Print per-record risk flags as JSON
  Flags,
  /// Print the table, then request a risk summary
  Summarize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();

  let records = sample_records().context("loading sample records")?;
  let thresholds = ThresholdTable::CLINICAL;

  match cli.command {
    Commands::Table => print!("{}", render_table(&records, &thresholds)),
    Commands::Flags => {
      let flags = assess_all(&records, &thresholds);
      println!("{}", serde_json::to_string_pretty(&flags)?);
    }
    Commands::Summarize => {
      print!("{}", render_table(&records, &thresholds));
      println!();

      match SummaryConfig::from_env().and_then(http_controller) {
        Ok(controller) => {
          stream_summary(&controller, &records, &thresholds, |line| println!("{}", line)).await;
        }
        Err(e) => println!("{}", unavailable_text(&e)),
      }
    }
  }

  Ok(())
}
