//! # Façade Server
//!
//! Serves the façade over HTTP. Configuration is read from the environment
//! (and a `.env` file when present).

use std::env;

use anyhow::Result;
use credibil_facade::Config;
use facade_server::{ServerProvider, router};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;
    let provider = ServerProvider::new(&config);

    let addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(config, provider)).with_graceful_shutdown(shutdown()).await?;
    Ok(())
}

// block until `ctrl-c`
async fn shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
