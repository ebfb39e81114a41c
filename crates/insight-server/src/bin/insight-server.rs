//! stock-insight web server
//!
//! # Usage
//!
//! ```bash
//! # Set up environment variables (or put them in .env)
//! export GROQ_API_KEY="gsk-..."
//!
//! # Run the server
//! cargo run --bin insight-server -- --port 5000
//! ```

use clap::Parser;
use insight_server::{HistoryRange, ServerConfig, build_router};
use insight_utils::{LogFormat, init_tracing, load_dotenv};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "insight-server")]
#[command(about = "Stock analysis web backend", long_about = None)]
struct Args {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory with index.html and front-end assets (overrides STATIC_DIR)
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Default history range: 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, ytd (overrides HISTORY_RANGE)
    #[arg(short, long)]
    range: Option<HistoryRange>,

    /// Log format: pretty or json (overrides LOG_FORMAT)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_path = load_dotenv();
    let args = Args::parse();

    let mut builder = ServerConfig::builder().base(ServerConfig::from_env()?);
    if let Some(host) = args.host {
        builder = builder.host(host);
    }
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if let Some(dir) = args.static_dir {
        builder = builder.static_dir(dir);
    }
    if let Some(range) = args.range {
        builder = builder.history_range(range);
    }
    if let Some(format) = args.log_format {
        builder = builder.log_format(format);
    }
    let config = builder.build()?;

    init_tracing("info,insight_server=debug,tower_http=debug", config.log_format);

    match dotenv_path {
        Some(path) => info!("Loaded environment from {}", path.display()),
        None => info!("No .env file found, using process environment"),
    }
    if !config.static_dir.is_dir() {
        warn!(
            "Static directory {} does not exist; only API routes will respond",
            config.static_dir.display()
        );
    }

    let app = build_router(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(
        "Listening on http://{} (model: {}, default range: {})",
        listener.local_addr()?,
        config.model,
        config.history_range
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
