//! Query server binary
//!
//! Run with: cargo run -p deepquery --bin deepquery-server

use deepquery::{config::AppConfig, server::AppServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deepquery=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing credentials fail here, before anything is bound or spawned.
    let config = AppConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Embedding model: {}", config.embedding.text_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - API tokens: {}", config.api_tokens.len());

    let server = AppServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/query            - Ask a question (streams NDJSON events)");
    println!("  POST /api/validate         - Re-synthesize over supplied context");
    println!("  POST /api/documents/upload - Upload a document for ingestion");
    println!("  GET  /api/jobs/:id         - Ingestion job progress");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
