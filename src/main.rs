mod cli;

use std::sync::Arc;

use clap::Parser;
use cli::{CaptureArgs, Cli, Commands};

use shotlink::api;
use shotlink::capture::{Envelope, FileCapturer, Orchestrator, StaticPage, message};
use shotlink::client::UploadClient;
use shotlink::config::Config;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => api::run(args.address).await?,
        Commands::Capture(args) => run_capture(args).await?,
    }

    Ok(())
}

async fn run_capture(args: CaptureArgs) -> Result<(), AnyError> {
    let config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;
    let area = cli::parse_area(&args.area)?;

    let base_url = args
        .base_url
        .unwrap_or_else(|| config.client.base_url.clone());
    let uploader = UploadClient::new(&base_url)?;

    let orchestrator = Orchestrator::new(
        Arc::new(FileCapturer::new(args.input)),
        Arc::new(StaticPage::new(args.dpr)),
        Arc::new(uploader),
        &config.client.source,
    );

    let result = orchestrator.handle(Envelope::request(area)).await;
    println!("{}", serde_json::to_string_pretty(&message::encode(&result))?);

    match result {
        Envelope::CaptureResult { success: true, .. } => Ok(()),
        _ => Err("capture failed".into()),
    }
}
