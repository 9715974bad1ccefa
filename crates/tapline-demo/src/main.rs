//! Tapline demo — wires the hook framework into a document pipeline.

use clap::Parser;
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt};

use tapline_core::config::AppConfig;
use tapline_core::error::TapError;

mod pipeline;

use pipeline::{Pipeline, Publish};

#[derive(Parser, Debug)]
#[command(name = "tapline-demo", about = "Run sample documents through a hook pipeline")]
struct Cli {
    /// Configuration file (TOML, extension omitted).
    #[arg(long, default_value = "config/default")]
    config: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Pipeline error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), TapError> {
    tracing::info!("Starting Tapline demo v{}", env!("CARGO_PKG_VERSION"));

    let mut pipeline = Pipeline::new(&config)?;

    let documents = [
        json!({"title": "welcome", "body": "  Hooks compose independent collaborators.  "}),
        json!({"title": "blank", "body": "   "}),
        json!({"title": "essay", "body": "x".repeat(2 * 1024 * 1024)}),
    ];

    for document in documents {
        let title = document["title"].as_str().unwrap_or("untitled").to_string();
        match pipeline.publish(document).await? {
            Publish::Accepted(text) => {
                tracing::info!(title = %title, chars = text.len(), "Document published");
            }
            Publish::Rejected(reason) => {
                tracing::warn!(title = %title, reason = %reason, "Document rejected");
            }
        }
    }

    tracing::info!("Demo complete");
    Ok(())
}
