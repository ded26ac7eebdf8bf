//! Process command - extract data from a single return.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use beyan_core::batch::{document_identifier, is_supported};
use beyan_core::models::declaration::DocumentExtractionResult;
use beyan_core::{DeclarationParser, PdfExtractor};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !is_supported(&args.input) {
        anyhow::bail!("Unsupported file format: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let data = fs::read(&args.input)?;
    let parser = DeclarationParser::from_config(&config);
    let mut extractor = PdfExtractor::new().with_max_pages(config.pdf.max_pages);

    let result = parser.extract(&document_identifier(&args.input), &data, &mut extractor);

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(error) = &result.error {
        eprintln!(
            "{} {} ({})",
            style("✗").red(),
            error.message,
            error.cause
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_result(result: &DocumentExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &DocumentExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "value"])?;
    wtr.write_record(["Dosya Adı", result.identifier.as_str()])?;
    wtr.write_record(["Dönem", result.period.as_str()])?;
    for value in &result.values {
        wtr.write_record([value.label.as_str(), value.value.as_str()])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &DocumentExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Dosya: {}\n", result.identifier));
    output.push_str(&format!("Dönem: {}\n", result.period));
    output.push('\n');

    let width = result
        .values
        .iter()
        .map(|v| v.label.chars().count())
        .max()
        .unwrap_or(0);

    for value in &result.values {
        let fill = width - value.label.chars().count();
        let shown = if value.value.is_empty() { "-" } else { value.value.as_str() };
        output.push_str(&format!(
            "  {}{}  {}\n",
            value.label,
            " ".repeat(fill),
            shown
        ));
    }

    output
}
