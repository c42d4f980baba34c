//! Command-line front end for sales trend reports.
//!
//! Usage:
//!     sales-trend report --input sales.json [--trend-type exponential] [--format table]
//!     sales-trend sales --input sales.json --start-date 2024-01-01 --end-date 2024-03-31
//!
//! The input file holds the sale records and, optionally, a request:
//!
//! ```json
//! {
//!   "request": { "startDate": "2024-01-01", "endDate": "2024-03-31", "trendType": "linear" },
//!   "sales": [ { "sale_id": 1, "sale_date": "2024-01-05", "total_sales": 12.5 } ]
//! }
//! ```
//!
//! Command-line options override fields of the file's request. Logs go to
//! stderr and are controlled by `RUST_LOG`.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trend_report::prelude::*;

/// Exit status for a request the caller can fix.
const EXIT_BAD_REQUEST: u8 = 2;
/// Exit status for everything else.
const EXIT_FAILURE: u8 = 1;

#[derive(Parser)]
#[command(name = "sales-trend")]
#[command(about = "Sales trend fitting and forecasting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a trend to the selected sales and forecast it
    Report {
        #[command(flatten)]
        request: RequestArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the sales a request selects
    Sales {
        #[command(flatten)]
        request: RequestArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// JSON file with `sales` and an optional `request`
    #[arg(short, long)]
    input: PathBuf,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Trend model (linear, polynomial, exponential, logarithmic, power-law, moving_average)
    #[arg(short, long)]
    trend_type: Option<String>,

    /// Frequency of forecast labels and aggregation (Daily, Monthly, Yearly)
    #[arg(long)]
    frequency: Option<String>,

    /// Years to forecast, twelve periods each
    #[arg(long)]
    prediction_years: Option<u32>,

    /// Explicit number of forecast periods
    #[arg(long)]
    horizon: Option<usize>,

    /// Sum sales per period instead of one observation per sale
    #[arg(long)]
    aggregate: bool,

    /// Only sales by clients of this gender ("All" for any)
    #[arg(long)]
    gender: Option<String>,

    /// Only sales in this city ("All" for any)
    #[arg(long)]
    city: Option<String>,

    /// Minimum client age
    #[arg(long)]
    min_age: Option<u32>,

    /// Maximum client age
    #[arg(long)]
    max_age: Option<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

#[derive(Debug, Deserialize)]
struct InputDocument {
    #[serde(default)]
    request: Option<ReportRequest>,
    sales: Vec<SaleRecord>,
}

#[derive(Serialize)]
struct SalesListing<'a> {
    data: Vec<&'a SaleRecord>,
}

/// A failure with the exit status it maps to.
struct CliError {
    message: String,
    status: u8,
}

impl CliError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: EXIT_BAD_REQUEST,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: EXIT_FAILURE,
        }
    }
}

impl From<ReportError> for CliError {
    fn from(err: ReportError) -> Self {
        let message = match &err {
            ReportError::Trend(source) => format!("{err}: {source}"),
            _ => err.to_string(),
        };
        if err.is_client_error() {
            Self::bad_request(message)
        } else {
            Self::failure(message)
        }
    }
}

impl From<TrendError> for CliError {
    fn from(err: TrendError) -> Self {
        ReportError::from(err).into()
    }
}

type CliResult<T> = Result<T, CliError>;

fn load_input(path: &Path) -> CliResult<InputDocument> {
    let file = File::open(path)
        .map_err(|e| CliError::failure(format!("Failed to open {}: {e}", path.display())))?;
    let document: InputDocument = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| CliError::bad_request(format!("Failed to parse {}: {e}", path.display())))?;
    debug!(sales = document.sales.len(), "loaded input");
    Ok(document)
}

/// Merge the file's request with command-line overrides.
fn build_request(args: &RequestArgs, base: Option<ReportRequest>) -> CliResult<ReportRequest> {
    let mut request = match (base, args.start_date, args.end_date) {
        (Some(mut request), start, end) => {
            if let Some(start) = start {
                request.start_date = start;
            }
            if let Some(end) = end {
                request.end_date = end;
            }
            request
        }
        (None, Some(start), Some(end)) => ReportRequest::new(start, end),
        (None, _, _) => {
            return Err(CliError::bad_request("startDate and endDate are required"));
        }
    };

    if let Some(name) = &args.trend_type {
        request.trend_type = name.parse::<ModelKind>()?;
    }
    if let Some(name) = &args.frequency {
        request.frequency = name.parse::<Frequency>()?;
    }
    if let Some(years) = args.prediction_years {
        request.prediction_years = years;
    }
    if args.horizon.is_some() {
        request.horizon = args.horizon;
    }
    if args.aggregate {
        request.aggregate = true;
    }
    if let Some(gender) = &args.gender {
        request.filter = request.filter.with_gender(gender.as_str());
    }
    if let Some(city) = &args.city {
        request.filter = request.filter.with_city(city.as_str());
    }
    if args.min_age.is_some() {
        request.filter.min_age = args.min_age;
    }
    if args.max_age.is_some() {
        request.filter.max_age = args.max_age;
    }

    Ok(request)
}

fn write_output(output: Option<&Path>, contents: &str) -> CliResult<()> {
    let result = match output {
        Some(path) => File::create(path).and_then(|mut f| writeln!(f, "{contents}")),
        None => writeln!(io::stdout().lock(), "{contents}"),
    };
    result.map_err(|e| CliError::failure(format!("Failed to write output: {e}")))
}

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::failure(format!("Failed to serialize output: {e}")))
}

fn run(cli: Cli) -> CliResult<()> {
    let pipeline = ReportPipeline::default();

    match cli.command {
        Commands::Report {
            request,
            format,
            output,
        } => {
            let input = load_input(&request.input)?;
            let req = build_request(&request, input.request)?;
            let report = pipeline.run(&req, &input.sales)?;
            let rendered = match format {
                Format::Json => to_json(&report)?,
                Format::Table => report.to_string(),
            };
            write_output(output.as_deref(), rendered.trim_end())
        }
        Commands::Sales { request, output } => {
            let input = load_input(&request.input)?;
            let req = build_request(&request, input.request)?;
            let data = pipeline.select_sales(&req, &input.sales)?;
            write_output(output.as_deref(), &to_json(&SalesListing { data })?)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_trend=info,trend_report=info".into()),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err.message);
            ExitCode::from(err.status)
        }
    }
}
