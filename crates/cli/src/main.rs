//! # xls2json
//!
//! Open spreadsheet files and transform them to JSON, one line of output
//! per input file.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use xls2json_sheet::{
    extract_tables, write_sheet_names, write_tables, JsonOptions, ValueFormats, Workbook,
};

/// Open an xls(x|m) file and transform to JSON.
#[derive(Parser)]
#[command(name = "xls2json", version)]
#[command(about = "Open an xls(x|m) file and transform to JSON.")]
#[command(long_about = "\
Open an xls(x|m) file and transform to JSON.

If no --table is provided, all tables are extracted.

All files are processed one by one, each outputting one line of JSON.")]
struct Cli {
    /// Show more information
    #[arg(short, long)]
    verbose: bool,

    /// Pretty print the JSON
    #[arg(long)]
    pretty: bool,

    /// Highlight the JSON with ANSI colors
    #[arg(long)]
    color: bool,

    /// List all tables
    #[arg(short = 'l', long)]
    list_tables: bool,

    /// Specify the tables to transform
    #[arg(short = 't', long = "table", value_name = "NAME")]
    tables: Vec<String>,

    /// Password for opening the input file(s)
    #[arg(short, long)]
    password: Option<String>,

    /// Strip empty columns and empty rows
    #[arg(short, long)]
    strip: bool,

    /// The datetime format
    #[arg(
        short = 'D',
        long,
        value_name = "PATTERN",
        default_value = "%Y-%m-%dT%H:%M:%S%.3f"
    )]
    datetime_format: String,

    /// The time format
    #[arg(short = 'T', long, value_name = "PATTERN", default_value = "%H:%M:%S%.3f")]
    time_format: String,

    /// xls(x|m)-file(s) to transform
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

impl Cli {
    fn json_options(&self) -> JsonOptions {
        JsonOptions {
            pretty: self.pretty,
            color: self.color,
            formats: ValueFormats {
                datetime: self.datetime_format.clone(),
                time: self.time_format.clone(),
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Cell-level diagnostics (formula fallbacks, error cells) are warnings
    // and always shown; verbose adds per-file progress. Everything goes to
    // stderr, keeping stdout pure JSON.
    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let stderr = io::stderr();
    if run(&cli, &mut stdout.lock(), &mut stderr.lock()) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Process every input file in order, one JSON line per file on `out`.
///
/// A failing file is reported on `err` and does not stop the remaining
/// files. Returns whether any file failed.
fn run(cli: &Cli, out: &mut dyn Write, err: &mut dyn Write) -> bool {
    let options = cli.json_options();
    let mut failed = false;
    for file in &cli.files {
        if let Err(e) = process_file(file, cli, &options, out) {
            writeln!(err, "{} {e:#}", "Error:".red().bold()).ok();
            failed = true;
        }
    }
    failed
}

/// Process one input file: open the workbook, list its sheet names or
/// extract the requested tables, and emit one line of JSON. The workbook
/// handle is dropped, and its resources released, on every exit path.
fn process_file(
    path: &Path,
    cli: &Cli,
    options: &JsonOptions,
    out: &mut dyn Write,
) -> Result<()> {
    tracing::info!(file = %path.display(), "transforming");

    let mut workbook = Workbook::open(path, cli.password.as_deref())
        .with_context(|| format!("failed to open `{}`", path.display()))?;

    if cli.list_tables {
        write_sheet_names(&mut *out, workbook.sheet_names(), options)?;
        writeln!(out)?;
        return Ok(());
    }

    let tables = extract_tables(&mut workbook, &cli.tables, cli.strip)?;
    write_tables(&mut *out, &tables, options)?;
    writeln!(out)?;
    Ok(())
}
