//! Batch processing command for multiple returns.
//!
//! Status lines go to stderr; stdout carries only the report.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use beyan_core::batch::{document_identifier, filter_supported};
use beyan_core::{BatchState, DeclarationParser, PdfExtractor, Report, SequentialExtraction};

/// Default file name of the CSV summary.
const DEFAULT_SUMMARY_FILE: &str = "KDV_Beyanname_Listesi.csv";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output file (CSV default: KDV_Beyanname_Listesi.csv, otherwise stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format of the summary table
    #[arg(short, long, value_enum, default_value = "csv")]
    format: SummaryFormat,

    /// State file accumulating results across runs
    #[arg(short, long)]
    state: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SummaryFormat {
    /// CSV file, one row per return
    Csv,
    /// JSON array of results
    Json,
    /// Aligned plain-text table
    Text,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let candidates: Vec<PathBuf> = glob(&args.input)?.filter_map(|r| r.ok()).collect();
    let mut files = filter_supported(candidates);

    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for pattern: {}", args.input);
    }

    let mut state = match &args.state {
        Some(path) => BatchState::load(path)?,
        None => BatchState::new(),
    };

    let before = files.len();
    files.retain(|p| !state.contains(&document_identifier(p)));
    if files.len() < before {
        eprintln!(
            "{} Skipping {} files already in the state",
            style("ℹ").blue(),
            before - files.len()
        );
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let parser = DeclarationParser::from_config(&config);
    let mut extractor = PdfExtractor::new().with_max_pages(config.pdf.max_pages);
    let extraction = SequentialExtraction::new(&parser, &mut extractor, files);

    let pb = ProgressBar::new(extraction.total() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::new();
    for result in extraction {
        pb.set_message(result.identifier.clone());
        if let Some(error) = &result.error {
            warn!("Failed to process {}: {}", result.identifier, error.cause);
        }
        results.push(result);
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    let failed: Vec<(String, String)> = results
        .iter()
        .filter_map(|r| r.error.as_ref().map(|e| (r.identifier.clone(), e.cause.clone())))
        .collect();
    let processed = results.len();
    let added = state.add_documents(results);

    if let Some(path) = &args.state {
        state.save(path)?;
        debug!("Saved state to {}", path.display());
    }

    let ordered = state.chronological();
    let report = Report::build(&ordered, &config.rules, &config.export);

    match args.format {
        SummaryFormat::Csv => {
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SUMMARY_FILE));
            write_csv(&path, &report)?;
            eprintln!(
                "{} Summary written to {}",
                style("✓").green(),
                path.display()
            );
        }
        SummaryFormat::Json => {
            let content = serde_json::to_string_pretty(&ordered)?;
            write_or_print(args.output.as_deref(), &content)?;
        }
        SummaryFormat::Text => {
            write_or_print(args.output.as_deref(), &report.to_text())?;
        }
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?} ({} added, {} total)",
        style("✓").green(),
        processed,
        start.elapsed(),
        added,
        state.len()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(processed - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for (identifier, cause) in &failed {
            eprintln!("  - {}: {}", identifier, cause);
        }
    }

    Ok(())
}

fn write_csv(path: &Path, report: &Report) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(&report.headers)?;
    for row in &report.rows {
        wtr.write_record(row.iter().map(|cell| cell.to_string()))?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_or_print(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}
