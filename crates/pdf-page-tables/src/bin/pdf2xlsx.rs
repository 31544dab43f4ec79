use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_page_tables::{
    ExtractOptions, ExtractionReport, PdfSource, export_file_name, extract_page_tables, write_csv,
    write_xlsx,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2xlsx",
    version,
    about = "Extract the tables of selected PDF pages into spreadsheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract one table per requested page and write one file per table.
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    const fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Comma-separated page numbers like 1,3,3,7.
    #[arg(short, long)]
    pages: String,

    /// Output directory. Defaults to the input file's directory.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output file format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Xlsx)]
    format: OutputFormat,

    /// Delimiter character for CSV output.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Minimum cells required per candidate table row.
    #[arg(long, default_value_t = 2)]
    min_cols: usize,

    /// Fail when any page token is not a number instead of skipping it.
    #[arg(long)]
    strict_pages: bool,

    /// Log each processed page.
    #[arg(short, long)]
    verbose: bool,
}

fn output_dir(args: &ExtractArgs) -> PathBuf {
    args.output_dir.clone().unwrap_or_else(|| {
        args.input
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    })
}

fn input_file_name(input: &Path) -> Result<String> {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("input path '{}' has no file name", input.display()))
}

fn write_tables(args: &ExtractArgs, report: &ExtractionReport) -> Result<usize> {
    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    let dir = output_dir(args);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    let file_name = input_file_name(&args.input)?;

    let mut written = 0;
    for (page, table) in report.tables() {
        let path = dir.join(export_file_name(&file_name, page, args.format.extension()));
        let result = match args.format {
            OutputFormat::Xlsx => write_xlsx(&path, table),
            OutputFormat::Csv => write_csv(&path, table, args.delimiter as u8),
        };
        result.with_context(|| format!("failed to write '{}'", path.display()))?;
        println!("page {page}: {}", path.display());
        written += 1;
    }
    Ok(written)
}

fn log_report(report: &ExtractionReport) {
    for warning in &report.warnings {
        eprintln!("warning: {}", warning.message);
    }
}

fn run_extract(args: &ExtractArgs) -> Result<usize> {
    let options = ExtractOptions {
        min_cols: args.min_cols,
        strict_pages: args.strict_pages,
    };
    let report = extract_page_tables(PdfSource::Path(&args.input), &args.pages, &options)
        .with_context(|| format!("failed to extract tables from '{}'", args.input.display()))?;
    log_report(&report);
    write_tables(args, &report)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Commands::Extract(args) = cli.command;

    let default_filter = if args.verbose {
        "pdf_page_tables=info"
    } else {
        "pdf_page_tables=error"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match run_extract(&args) {
        Ok(0) => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
