//! rdt-up - upload media files for analysis
//!
//! Writes `uploads.csv` (file_name, request_id, file_path) with one row per
//! file whose upload fully succeeded.

use anyhow::Result;
use clap::Parser;
use rdt_common::api::ApiClient;
use rdt_common::cli::{parse_args, ApiArgs, CREDENTIALS_HELP};
use rdt_common::Table;
use rdt_up::Uploader;
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for rdt-up
#[derive(Parser, Debug)]
#[command(name = "rdt-up")]
#[command(about = "Upload a file or directory of files to the analysis API")]
#[command(version)]
#[command(after_help = CREDENTIALS_HELP)]
struct Args {
    /// File or directory to upload (directories are walked recursively)
    path: PathBuf,

    /// Manifest to write
    #[arg(short, long, default_value = "uploads.csv")]
    output: PathBuf,

    #[command(flatten)]
    api: ApiArgs,
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

    info!("Starting rdt-up v{}", env!("CARGO_PKG_VERSION"));

    let config = args.api.client_config()?;
    let uploader = Uploader::new(ApiClient::new(config)?);

    let mut manifest = Vec::new();
    let summary = uploader.upload_path(&args.path, &mut manifest).await?;

    Table::from(manifest.as_slice()).write_csv(&args.output)?;
    info!(
        uploaded = summary.uploaded,
        failed = summary.failed,
        "Results saved to {}",
        args.output.display()
    );

    Ok(())
}
