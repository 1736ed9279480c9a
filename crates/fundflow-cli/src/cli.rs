//! CLI argument definitions for fundflow.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Fetch, clean and save a scheme's NAV history |
//! | `metrics` | Compute CAGR and volatility from the saved history |
//! | `analyze` | `fetch` followed by `metrics` |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--verbose` | `false` | Debug logging on stderr |
//! | `--base-url` | `$FUNDFLOW_MFAPI_BASE_URL` or `https://api.mfapi.in` | NAV source |
//! | `--data-file` | `$FUNDFLOW_DATA_FILE` or `fund_data.csv` | Saved series |
//! | `--timeout-ms` | `$FUNDFLOW_TIMEOUT_MS` or `10000` | Request timeout |
//!
//! # Examples
//!
//! ```bash
//! fundflow fetch 120503
//! fundflow metrics --pretty
//! fundflow analyze 120503 --lookback-days 365 --format table
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Mutual fund NAV history and growth/risk metrics.
#[derive(Debug, Parser)]
#[command(
    name = "fundflow",
    author,
    version,
    about = "Mutual fund NAV history and growth/risk metrics",
    long_about = "fundflow fetches the NAV history of an Indian mutual fund scheme by its AMFI \
scheme code, cleans and saves it as CSV, and computes CAGR and annualized volatility from the \
saved series.\n\
\n\
Use 'fundflow <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Log at debug level to stderr. `RUST_LOG` takes precedence.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Base URL of the MFAPI-compatible NAV source.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path of the saved NAV series.
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned key/value text for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a scheme's NAV history, clean it and save it as CSV.
    ///
    /// # Examples
    ///
    ///   fundflow fetch 120503
    ///   fundflow fetch 120503 --lookback-days 0 --data-file axis.csv
    Fetch(FetchArgs),

    /// Compute CAGR and annualized volatility from the saved series.
    ///
    /// # Examples
    ///
    ///   fundflow metrics
    ///   fundflow metrics --data-file axis.csv --format table
    Metrics(MetricsArgs),

    /// Fetch, save, then compute metrics from the saved series.
    ///
    /// # Examples
    ///
    ///   fundflow analyze 120503 --pretty
    Analyze(FetchArgs),
}

/// Arguments shared by `fetch` and `analyze`.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// AMFI scheme code (e.g. 120503).
    pub scheme_code: String,

    /// Keep only this many days before the latest NAV; 0 keeps the full history.
    /// Defaults to `$FUNDFLOW_LOOKBACK_DAYS` or 1095.
    #[arg(long)]
    pub lookback_days: Option<u32>,
}

/// Arguments for the `metrics` command.
#[derive(Debug, Args)]
pub struct MetricsArgs {}
