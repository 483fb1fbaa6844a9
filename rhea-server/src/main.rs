use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chat_runtime::ChatService;
use clap::Parser;
use llm_client::OllamaLlmClient;
use rhea_core::{init_tracing, AppConfig};
use storage::DataDir;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rhea-server", about = "Character chat over HTTP and WebSocket")]
struct Args {
    /// Address to listen on (overrides RHEA_BIND_ADDR)
    #[arg(long)]
    bind: Option<String>,
    /// Directory holding config.json and profiles.json (overrides RHEA_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Ollama base URL (overrides OLLAMA_BASE_URL)
    #[arg(long)]
    ollama_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::from_env()
        .with_bind_addr(args.bind)
        .with_data_dir(args.data_dir)
        .with_ollama_base_url(args.ollama_url);
    config.validate()?;

    init_tracing(&config.log_file, true)?;
    info!(
        bind_addr = %config.bind_addr,
        data_dir = %config.data_dir.display(),
        ollama = %config.ollama_base_url,
        "Starting rhea-server"
    );

    let data_dir = DataDir::open(&config.data_dir)
        .await
        .context("Failed to open data directory")?;
    let llm = Arc::new(OllamaLlmClient::with_base_url(&config.ollama_base_url));
    let service = Arc::new(ChatService::open(llm, data_dir).await);

    let app = rhea_server::router(service);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("rhea-server listening on http://{}", config.bind_addr);
    axum::serve(listener, app)
        .await
        .context("Server error")?;
    Ok(())
}
