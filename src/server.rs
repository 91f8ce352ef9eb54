use anyhow::{Context, Result};
use rmcp::transport::sse_server::SseServer;
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::{DocStore, FileCache};
use crate::index::parse_index;
use crate::mcp::RfcServer;

/// Download-or-reuse the master index, parse it, and assemble the service.
/// The parsed index is immutable for the life of the process; picking up
/// new RFCs means restarting or clearing the cache.
pub async fn build_service(cache_dir: PathBuf) -> Result<RfcServer> {
    let cache = FileCache::new(cache_dir);
    let index_path = cache
        .ensure_index()
        .await
        .context("failed to obtain the RFC index")?;
    let index = parse_index(&index_path)
        .with_context(|| format!("failed to parse the RFC index at {:?}", index_path))?;
    tracing::info!(
        "Serving {} RFC documents from index {:?}",
        index.doc_count,
        index_path
    );
    Ok(RfcServer::new(Arc::new(index), Arc::new(cache)))
}

// start sse server
pub async fn start_sse_server(addr: &str, cache_dir: PathBuf) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let service = build_service(cache_dir).await?;
    let ct = SseServer::serve(addr.parse()?)
        .await?
        .with_service(move || service.clone());

    tokio::signal::ctrl_c().await?;
    ct.cancel();
    Ok(())
}

// start stdio server
pub async fn start_stdio_server(cache_dir: PathBuf) -> Result<()> {
    // Log to stderr: stdout carries the MCP protocol stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting RFC MCP server");

    let service = build_service(cache_dir)
        .await?
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}
