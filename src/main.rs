mod cache;
mod document;
mod index;
mod mcp;
mod server;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "IETF RFC Document MCP Server")]
struct Cli {
    /// Type of server to run
    #[arg(short, long, value_enum, default_value_t = ServerType::Sse)]
    server_type: ServerType,

    /// Address for the SSE server
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    address: String,

    /// Directory for the index and document cache
    #[arg(short, long)]
    cache_dir: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ServerType {
    /// Start an SSE server
    Sse,
    /// Start a stdio server
    Stdio,
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("rfc-mcp")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cache_dir = cli.cache_dir.unwrap_or_else(default_cache_dir);

    match cli.server_type {
        ServerType::Sse => {
            println!(
                "Starting SSE server on {}. Cache directory: {:?}",
                cli.address, cache_dir
            );
            server::start_sse_server(&cli.address, cache_dir).await?;
        }
        ServerType::Stdio => {
            server::start_stdio_server(cache_dir).await?;
        }
    }

    Ok(())
}
