//! Command-line front end: load a wide municipal table, decompose one row,
//! print the strengths and components.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use munistl::calendar::DateWindow;
use munistl::config::{AnalysisConfig, DecimalSeparator};
use munistl::core::MatchPolicy;
use munistl::io::{read_dataset, CsvOptions, Encoding};
use munistl::pipeline::{decompose, DecompositionRequest};
use munistl::report::{render_csv, render_json, render_preview, render_text};
use munistl::seasonality::STL;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputEncoding {
    Latin1,
    Utf8,
}

/// STL decomposition of one municipality's monthly series.
#[derive(Debug, Parser)]
#[command(name = "munistl", version, about)]
struct Args {
    /// Delimited input file, one row per municipality.
    #[arg(short, long)]
    input: PathBuf,

    /// Identity value to analyse, e.g. "110150 SERINGUEIRAS".
    #[arg(short, long)]
    key: Option<String>,

    /// First month of the window (YYYY-MM).
    #[arg(long, default_value = "2008-01")]
    start: String,

    /// Last month of the window (YYYY-MM).
    #[arg(long, default_value = "2023-12")]
    end: String,

    /// Field delimiter.
    #[arg(long, default_value_t = ';')]
    delimiter: char,

    #[arg(long, value_enum, default_value_t = InputEncoding::Latin1)]
    encoding: InputEncoding,

    /// Identity column header (defaults to "Município", else the first column).
    #[arg(long)]
    key_column: Option<String>,

    /// Cell text treated as zero.
    #[arg(long, default_value = "-")]
    placeholder: String,

    /// Numbers use ',' as decimal separator.
    #[arg(long)]
    decimal_comma: bool,

    /// Fail when the key matches more than one row.
    #[arg(long)]
    strict: bool,

    /// Use robust STL fitting.
    #[arg(long)]
    robust: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the first N rows of the table and exit.
    #[arg(long, value_name = "N")]
    preview: Option<usize>,

    /// Log progress to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<String> {
    let delimiter = u8::try_from(args.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .context("delimiter must be a single ASCII character")?;

    let mut options = CsvOptions::new()
        .with_delimiter(delimiter)
        .with_encoding(match args.encoding {
            InputEncoding::Latin1 => Encoding::Latin1,
            InputEncoding::Utf8 => Encoding::Utf8,
        });
    if let Some(name) = &args.key_column {
        options = options.with_key_column(name.clone());
    }

    let dataset = read_dataset(&args.input, &options)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    if let Some(n) = args.preview {
        return Ok(render_preview(&dataset, n, delimiter)?);
    }

    let key = args
        .key
        .as_deref()
        .context("--key is required unless --preview is given")?;

    let window = DateWindow::parse(&args.start, &args.end)?;
    let request = DecompositionRequest::new(key, window);

    let stl = if args.robust { STL::new().robust() } else { STL::new() };
    let config = AnalysisConfig::new()
        .with_placeholder(args.placeholder.as_str())
        .with_decimal_separator(if args.decimal_comma {
            DecimalSeparator::Comma
        } else {
            DecimalSeparator::Point
        })
        .with_match_policy(if args.strict {
            MatchPolicy::Unique
        } else {
            MatchPolicy::First
        })
        .with_stl(stl);

    let report = decompose(&dataset, &request, &config)?;

    let output = match args.format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => render_json(&report)? + "\n",
        OutputFormat::Csv => render_csv(&report)?,
    };
    Ok(output)
}
