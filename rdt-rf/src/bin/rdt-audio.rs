//! rdt-audio - fetch audio results linked to video jobs
//!
//! For every video job id: resolve the linked audio job, enable its result,
//! then fetch it. With a CSV input the audio rows are left-joined onto the
//! input rows by video job id.

use anyhow::Result;
use clap::{ArgGroup, Parser};
use rdt_common::api::ApiClient;
use rdt_common::cli::{parse_args, ApiArgs, CREDENTIALS_HELP};
use rdt_common::{AudioResultRecord, Error, Table};
use rdt_rf::AudioLinker;
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for rdt-audio
#[derive(Parser, Debug)]
#[command(name = "rdt-audio")]
#[command(about = "Fetch audio results linked to video jobs into a CSV table")]
#[command(version)]
#[command(after_help = CREDENTIALS_HELP)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["input", "request_id"]),
))]
struct Args {
    /// CSV with a requestId (or request_id) column of video job ids
    input: Option<PathBuf>,

    /// Process a single video job
    #[arg(long)]
    request_id: Option<String>,

    /// Results table to write
    #[arg(short, long, default_value = "audio_results.csv")]
    output: PathBuf,

    #[command(flatten)]
    api: ApiArgs,
}

/// Accepted names of the video id column, in order of preference
const VIDEO_ID_COLUMNS: [&str; 2] = ["requestId", "request_id"];

fn video_id_column(table: &Table) -> Result<&'static str, Error> {
    VIDEO_ID_COLUMNS
        .into_iter()
        .find(|name| table.column_index(name).is_some())
        .ok_or_else(|| Error::MissingColumns(vec![VIDEO_ID_COLUMNS[0].to_string()]))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Args = parse_args();

    info!("Starting rdt-audio v{}", env!("CARGO_PKG_VERSION"));

    // Validate the input table before any request is made
    let input = match &args.input {
        Some(path) => {
            let table = Table::read_csv(path)?;
            let column = video_id_column(&table)?;
            Some((table, column))
        }
        None => None,
    };

    let config = args.api.client_config()?;
    let linker = AudioLinker::new(ApiClient::new(config)?);
    let mut results: Vec<AudioResultRecord> = Vec::new();

    let output = if let Some((table, column)) = input {
        let summary = linker
            .fetch_audio_many(table.column_values(column)?, &mut results)
            .await;
        info!(
            fetched = summary.fetched,
            failed = summary.failed,
            "Processed {} video jobs",
            summary.requested
        );
        table.left_join(column, &Table::from(results.as_slice()), "video_request_id")?
    } else if let Some(video_request_id) = &args.request_id {
        linker
            .fetch_audio_many(std::iter::once(video_request_id.as_str()), &mut results)
            .await;
        Table::from(results.as_slice())
    } else {
        anyhow::bail!("Either a CSV file or --request-id is required");
    };

    output.write_csv(&args.output)?;
    info!("Results saved to {}", args.output.display());

    Ok(())
}
