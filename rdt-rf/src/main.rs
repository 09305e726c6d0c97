//! rdt-rf - fetch analysis results
//!
//! Input is one of:
//! - a CSV with `file_name` and `request_id` columns (rdt-up's manifest);
//!   results are left-joined onto its rows
//! - `--request-id` for a single job
//! - `--all` to page through every job visible to the API key

use anyhow::Result;
use clap::{ArgGroup, Parser, ValueEnum};
use rdt_common::api::ApiClient;
use rdt_common::cli::{parse_args, ApiArgs, CREDENTIALS_HELP};
use rdt_common::Table;
use rdt_rf::ResultFetcher;
use std::path::PathBuf;
use tracing::info;

/// Column used to join results back onto the input table
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum JoinKey {
    RequestId,
    FileName,
}

impl JoinKey {
    /// `(input column, result column)` pairs that must all match
    ///
    /// File names are not unique across directories, so a file-name join
    /// also requires the job ids to agree.
    fn columns(self) -> &'static [(&'static str, &'static str)] {
        match self {
            JoinKey::RequestId => &[("request_id", "request_id")],
            JoinKey::FileName => &[("file_name", "file_name"), ("request_id", "request_id")],
        }
    }
}

/// Command-line arguments for rdt-rf
#[derive(Parser, Debug)]
#[command(name = "rdt-rf")]
#[command(about = "Fetch analysis results into a CSV table")]
#[command(version)]
#[command(after_help = CREDENTIALS_HELP)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["input", "request_id", "all"]),
))]
struct Args {
    /// CSV with file_name and request_id columns
    input: Option<PathBuf>,

    /// Fetch a single job
    #[arg(long)]
    request_id: Option<String>,

    /// Fetch every job visible to the API key
    #[arg(long)]
    all: bool,

    /// Column used to join results onto the input CSV [default: request-id]
    #[arg(long, value_enum, requires = "input")]
    join_on: Option<JoinKey>,

    /// Results table to write
    #[arg(short, long, default_value = "results.csv")]
    output: PathBuf,

    #[command(flatten)]
    api: ApiArgs,
}

const REQUIRED_COLUMNS: [&str; 2] = ["file_name", "request_id"];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Args = parse_args();

    info!("Starting rdt-rf v{}", env!("CARGO_PKG_VERSION"));

    // Validate the input table before any request is made
    let input = match &args.input {
        Some(path) => {
            let table = Table::read_csv(path)?;
            table.require_columns(&REQUIRED_COLUMNS)?;
            Some(table)
        }
        None => None,
    };

    let config = args.api.client_config()?;
    let fetcher = ResultFetcher::new(ApiClient::new(config)?);
    let mut results = Vec::new();

    let output = if let Some(input) = input {
        let summary = fetcher
            .fetch_many(input.column_values("request_id")?, &mut results)
            .await;
        info!(
            fetched = summary.fetched,
            failed = summary.failed,
            "Fetched results for {} jobs",
            summary.requested
        );

        let keys = args.join_on.unwrap_or(JoinKey::RequestId).columns();
        input.left_join_on(&Table::from(results.as_slice()), keys)?
    } else if let Some(request_id) = &args.request_id {
        let summary = fetcher
            .fetch_many(std::iter::once(request_id.as_str()), &mut results)
            .await;
        if summary.failed > 0 {
            info!("No result fetched for {}", request_id);
        }
        Table::from(results.as_slice())
    } else {
        let summary = fetcher.fetch_all(&mut results).await;
        info!(pages = summary.pages, end = ?summary.end, "Listing walked");
        Table::from(results.as_slice())
    };

    output.write_csv(&args.output)?;
    info!("Results saved to {}", args.output.display());

    Ok(())
}
