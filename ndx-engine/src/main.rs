//! ndx-engine - NatureDex Discovery & Progression Engine
//!
//! CLI presentation shell over the engine:
//! - `submit <image>` classifies a photo and advances the collection
//! - `status` shows collection progress and the usage quota

use anyhow::Result;
use clap::{Parser, Subcommand};
use ndx_common::config::{self, ConfigOverrides};
use ndx_common::events::EventBus;
use ndx_common::{DiscoveryCategory, MAX_PER_TYPE, TOTAL_REQUESTS_AVAILABLE};
use ndx_engine::services::{CollectionClient, DiscoveryClient, RecognizerClient, UsageClient};
use ndx_engine::Orchestrator;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "ndx-engine", version, about = "NatureDex discovery & progression engine")]
struct Cli {
    /// Config file path (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL override
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Recognizer endpoint override
    #[arg(long, global = true)]
    recognizer_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit an image for classification and collection
    Submit {
        /// Path to the image file
        image: PathBuf,
    },
    /// Show collection progress and usage quota
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let config = config::resolve_config(&ConfigOverrides {
        config_path: cli.config.clone(),
        backend_url: cli.backend_url.clone(),
        recognizer_url: cli.recognizer_url.clone(),
        ..Default::default()
    })?;

    info!("Backend: {}", config.backend_url);
    info!("Recognizer: {}", config.recognizer_url);

    let event_bus = EventBus::new(100);

    // Forward engine events to the log; drains until the bus closes
    let mut event_rx = event_bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            tracing::debug!(?event, "Engine event");
        }
    });

    let recognizer = Arc::new(RecognizerClient::new(config.recognizer_url.as_str())?);
    let usage_meter = Arc::new(UsageClient::new(
        config.backend_url.as_str(),
        config.auth_token.clone(),
        config.user_id.clone(),
    )?);
    let discovery_store = Arc::new(DiscoveryClient::new(
        config.backend_url.as_str(),
        config.auth_token.clone(),
    )?);
    let collection_store = Arc::new(CollectionClient::new(
        config.backend_url.as_str(),
        config.auth_token.clone(),
    )?);

    let mut orchestrator = Orchestrator::new(
        recognizer,
        usage_meter,
        discovery_store,
        collection_store,
        event_bus,
    );

    // Reconcile from the store; a failure falls back to the initial state
    orchestrator.load().await;

    match cli.command {
        Command::Submit { image } => {
            let bytes = tokio::fs::read(&image).await?;
            let file_name = image
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload.jpg")
                .to_string();

            match orchestrator.submit(bytes, &file_name).await {
                Ok(outcome) => {
                    println!("{}", outcome.description);
                    if let Some(notification) = outcome.notification {
                        println!("{}", notification);
                    }
                }
                Err(e) => {
                    // Classifier failures are the only user-visible errors
                    println!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Status => {
            let state = orchestrator.state();

            println!("NatureDex");
            for category in DiscoveryCategory::ALL {
                let badge = if state.unlocked(category) {
                    format!("  [{}]", category.badge_title())
                } else {
                    String::new()
                };
                println!(
                    "  {:<8} {}/{}{}",
                    category.as_str(),
                    state.count(category),
                    MAX_PER_TYPE,
                    badge
                );
            }

            match orchestrator.usage().await {
                Ok(record) => println!(
                    "Requests used: {}/{} ({} remaining)",
                    record.used,
                    TOTAL_REQUESTS_AVAILABLE,
                    record.remaining()
                ),
                Err(e) => warn!("Usage unavailable: {}", e),
            }
        }
    }

    Ok(())
}
