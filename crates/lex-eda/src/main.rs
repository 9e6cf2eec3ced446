//! CLI entry point for the automated EDA engine.

use anyhow::{Result, anyhow};
use clap::Parser;
use lex_eda::{AnalysisConfig, AnalysisReport, Analyzer, ReportGenerator, loader};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Automated Exploratory Data Analysis",
    long_about = "Profiles a CSV, JSON or spreadsheet dataset: statistics, data quality, \
                  correlations, chart specifications and insights.\n\n\
                  EXAMPLES:\n  \
                  # Human-readable summary\n  \
                  lex-eda -i sales.csv\n\n  \
                  # Full report as JSON on stdout\n  \
                  lex-eda -i sales.csv --json | jq .insights\n\n  \
                  # Save JSON and text reports\n  \
                  lex-eda -i sales.xlsx -r --text-report -o results/"
)]
struct Args {
    /// Path to the dataset (csv, json, xlsx, xls, xlsm, ods)
    #[arg(short, long)]
    input: String,

    /// Treat the input as this extension instead of the file's own
    #[arg(long)]
    format: Option<String>,

    /// Output directory for reports
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the full report as JSON to stdout instead of a summary
    ///
    /// Disables all progress logs; only outputs the JSON report.
    #[arg(long)]
    json: bool,

    /// Write the full JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Write the plain-text analysis report to the output directory
    #[arg(long)]
    text_report: bool,

    /// Number of preview rows included in the report
    #[arg(long, default_value = "5")]
    preview_rows: usize,

    /// Run the analysis components sequentially
    #[arg(long)]
    no_parallel: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only
/// carries the JSON report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let input = Path::new(&args.input);

    info!("Loading dataset from: {}", args.input);
    let data = match &args.format {
        Some(format) => loader::load(input, format),
        None => loader::load_path(input),
    }?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let config = AnalysisConfig::builder()
        .preview_rows(args.preview_rows)
        .parallel(!args.no_parallel)
        .build()?;

    let mut builder = Analyzer::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let analyzer = builder.build()?;

    let report = match analyzer.analyze(&data) {
        Ok(report) => report,
        Err(e) => {
            error!("Analysis failed: {}", e);
            return Err(anyhow!("Analysis failed: {}", e));
        }
    };

    handle_output(&report, &args)
}

/// Handle analysis output based on CLI flags.
///
/// - Default: Print human-readable summary to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report` / `--text-report`: Write report files
fn handle_output(report: &AnalysisReport, args: &Args) -> Result<()> {
    if args.emit_report || args.text_report {
        let generator = ReportGenerator::new(PathBuf::from(&args.output));
        if args.emit_report {
            let path = generator.write_report_to_file(report, &extract_file_stem(&args.input))?;
            info!("Report written to: {}", path.display());
        }
        if args.text_report {
            let path = generator.write_text_report(report, &extract_file_name(&args.input))?;
            info!("Text report written to: {}", path.display());
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    print_human_readable_summary(report, args);
    Ok(())
}

fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

fn extract_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string()
}

/// Print a human-readable summary of the analysis.
///
/// Uses `println!` rather than tracing: this is the command's output.
fn print_human_readable_summary(report: &AnalysisReport, args: &Args) {
    let quality = &report.data_quality;

    println!();
    println!("{}", "=".repeat(80));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input: {} ({} rows x {} columns)",
        args.input,
        report.rows(),
        report.width()
    );
    println!(
        "Columns: {} numeric, {} categorical, {} datetime",
        report.numeric_columns.len(),
        report.categorical_columns.len(),
        report.datetime_columns.len()
    );
    println!();

    println!("Data Quality:");
    println!("  Completeness: {:.2}%", quality.completeness);
    println!("  Missing: {} cells ({:.2}%)", report.total_missing, quality.missing_percentage);
    println!("  Duplicate rows: {}", quality.duplicate_rows);
    println!("  Memory usage: {:.2} MB", quality.memory_usage);
    println!();

    if !report.basic_stats.is_empty() {
        println!("Numeric Columns:");
        println!(
            "  {:<20} {:>8} {:>12} {:>12} {:>12} {:>12}",
            "Column", "Count", "Mean", "Std", "Min", "Max"
        );
        for (name, stats) in &report.basic_stats {
            println!(
                "  {:<20} {:>8} {:>12} {:>12} {:>12} {:>12}",
                truncate_str(name, 19),
                stats.count,
                fmt_stat(stats.mean),
                fmt_stat(stats.std),
                fmt_stat(stats.min),
                fmt_stat(stats.max)
            );
        }
        println!();
    }

    println!("Charts: {}", report.visualizations.ids().collect::<Vec<_>>().join(", "));
    if let Some(ref err) = report.visualizations.error {
        println!("  ! {}", err);
    }
    println!();

    let insights = &report.insights;
    for (heading, notes) in [
        ("Insights", &insights.data_quality),
        ("Patterns", &insights.patterns),
        ("Recommendations", &insights.recommendations),
    ] {
        if notes.is_empty() {
            continue;
        }
        println!("{}:", heading);
        for note in notes {
            println!("  - {}", note);
        }
        println!();
    }
    if let Some(ref err) = insights.error {
        println!("  ! {}", err);
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report or --text-report to save reports");
    println!("{}", "=".repeat(80));
}

fn fmt_stat(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.4}", v))
        .unwrap_or_else(|| lex_eda::types::NO_DATA_SENTINEL.to_string())
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
