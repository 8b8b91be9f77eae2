mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use framecut_core::pipeline::{self, ExtractConfig, ExtractionSummary};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let config = ExtractConfig {
        input: cli.video_path,
        output_dir: cli.output_dir,
        rate: cli.rate,
        format: cli.format.into(),
        prefix: cli.prefix,
    };

    let summary = match pipeline::run_extraction(&config) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {:#}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    };

    print_summary(&summary, cli.json)
}

fn print_summary(summary: &ExtractionSummary, json: bool) -> Result<()> {
    if json {
        let line = serde_json::to_string(summary).context("failed to serialize summary")?;
        println!("{line}");
    } else {
        println!(
            "Extracted and saved {} frames to {}",
            summary.frames_saved,
            summary.output_dir.display()
        );
    }
    Ok(())
}
