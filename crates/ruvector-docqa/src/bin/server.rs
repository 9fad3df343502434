//! Document QA server binary
//!
//! Run with: cargo run -p ruvector-docqa --bin ruvector-docqa-server -- --config docqa.toml

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ruvector_docqa::{config::RagConfig, generation::OllamaClient, server::RagServer};

#[derive(Parser, Debug)]
#[command(author, version, about = "Document question answering server", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "DOCQA_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bind address, overrides server.host
    #[arg(long, env = "DOCQA_HOST")]
    host: Option<String>,

    /// Port, overrides server.port
    #[arg(short, long, env = "DOCQA_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruvector_docqa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RagConfig::from_file(path)?,
        None => RagConfig::default(),
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!(
        "  - Embeddings: {:?} ({}, {} dimensions)",
        config.embeddings.backend,
        config.embeddings.model,
        config.embeddings.dimensions
    );
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Store scope: {:?}", config.vector_db.scope);
    tracing::info!("  - Intent analysis: {}", config.nlu.enabled);

    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let ollama = OllamaClient::new(&config.llm)?;
    match ollama.health_check().await {
        Ok(true) => tracing::info!("Ollama is running"),
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Start it with `ollama serve` and pull the models:");
            tracing::warn!(
                "  ollama pull {} && ollama pull {}",
                config.llm.generate_model,
                config.llm.embed_model
            );
        }
    }

    let server = RagServer::new(config).await?;

    tracing::info!("Health: http://{}/health", server.address());

    server.start().await?;

    Ok(())
}
