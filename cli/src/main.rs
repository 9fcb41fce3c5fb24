use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use rayon::prelude::*;
use report_pipeline_core::{RandomNonce, Sanitiser};
use report_pipeline_reader::Report;
use report_pipeline_sanitise::{BridgeDb, SanitiserRegistry};

#[derive(Debug, Parser)]
#[command(name = "report-sanitise")]
#[command(about = "Sanitise measurement report files into raw/sanitised JSON record streams")]
struct Cli {
    /// Output directory for per-report .raw.jsonl and .sanitised.jsonl files.
    #[arg(long)]
    output: PathBuf,
    /// Bridge identity database (JSON or YAML) consulted by the scrubbing
    /// handlers. Without it every bridge lookup misses.
    #[arg(long)]
    bridge_db: Option<PathBuf>,
    /// Report files to process. Files are independent and processed in
    /// parallel.
    #[arg(required = true)]
    reports: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    fs::create_dir_all(&cli.output).map_err(|err| {
        format!(
            "Failed to create output directory '{}': {err}",
            cli.output.display()
        )
    })?;

    let bridge_db = match &cli.bridge_db {
        Some(path) => Arc::new(BridgeDb::from_path(path).map_err(|err| {
            format!("Failed to load bridge db '{}': {err}", path.display())
        })?),
        None => Arc::new(BridgeDb::new()),
    };
    let sanitiser: Arc<dyn Sanitiser> = Arc::new(SanitiserRegistry::with_defaults(bridge_db));

    let failures: Vec<String> = cli
        .reports
        .par_iter()
        .filter_map(|report| {
            process_report(report, &cli.output, Arc::clone(&sanitiser))
                .err()
                .map(|err| format!("{}: {err}", report.display()))
        })
        .collect();

    for failure in &failures {
        eprintln!("failed: {failure}");
    }
    println!(
        "Processed {}/{} report(s)",
        cli.reports.len() - failures.len(),
        cli.reports.len()
    );

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} report(s) failed", failures.len()))
    }
}

/// Streams one report into its pair of JSON-lines output files.
fn process_report(
    path: &Path,
    output: &Path,
    sanitiser: Arc<dyn Sanitiser>,
) -> Result<(), String> {
    let report = Report::open(path, sanitiser, &RandomNonce).map_err(|err| err.to_string())?;

    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("report");
    let raw_path = output.join(format!("{stem}.raw.jsonl"));
    let sanitised_path = output.join(format!("{stem}.sanitised.jsonl"));

    let mut raw_out = create_writer(&raw_path)?;
    let mut sanitised_out = create_writer(&sanitised_path)?;

    for pair in report {
        let pair = pair.map_err(|err| err.to_string())?;
        write_record(&mut raw_out, &pair.raw)?;
        write_record(&mut sanitised_out, &pair.sanitised)?;
    }

    raw_out.flush().map_err(|err| err.to_string())?;
    sanitised_out.flush().map_err(|err| err.to_string())?;
    Ok(())
}

fn create_writer(path: &Path) -> Result<BufWriter<fs::File>, String> {
    let file = fs::File::create(path)
        .map_err(|err| format!("Failed to create '{}': {err}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn write_record(
    out: &mut BufWriter<fs::File>,
    record: &report_pipeline_core::Document,
) -> Result<(), String> {
    let line = record.to_json().map_err(|err| err.to_string())?;
    writeln!(out, "{line}").map_err(|err| err.to_string())
}
