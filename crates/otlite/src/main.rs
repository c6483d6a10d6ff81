mod telemetry;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use otlite_core::config::Config;
use otlite_ingest::server::run_ingest_server;
use otlite_store::Store;

#[derive(Parser, Debug)]
#[command(name = "otlite", version)]
#[command(about = "Local OTLP/JSON collector backed by SQLite")]
struct Cli {
    /// Path to a TOML config file (defaults to $XDG_CONFIG_HOME/otlite/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the SQLite database file
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Listen address for the OTLP/HTTP receiver
    #[arg(long)]
    otlp_http_addr: Option<String>,

    /// Maximum accepted request body size in bytes
    #[arg(long)]
    max_body_bytes: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(path) => Config::load_from(path).context("loading config file")?,
        None => Config::load().context("loading configuration")?,
    };
    if let Some(db_path) = cli.db_path {
        cfg.db_path = db_path;
    }
    if let Some(addr) = cli.otlp_http_addr {
        cfg.otlp_http_addr = addr;
    }
    if let Some(max_body_bytes) = cli.max_body_bytes {
        cfg.max_body_bytes = max_body_bytes;
    }

    let store = Store::open(&cfg.db_path)
        .await
        .with_context(|| format!("opening sqlite store at {}", cfg.db_path.display()))?;
    tracing::info!(db_path = %cfg.db_path.display(), "sqlite store opened");

    let result = run_ingest_server(store.clone(), &cfg).await;
    store.close().await;
    tracing::info!("server stopped");
    result.map_err(Into::into)
}
