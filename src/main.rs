use std::sync::Arc;

use courier::config::Config;
use courier::routing::Router;
use courier::server;
use courier::storage::DirStorage;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    tracing::info!(directory = %cfg.files.directory.display(), "Serving files");

    let storage = Arc::new(DirStorage::new(cfg.files.directory.clone()));
    let router = Arc::new(Router::standard(storage));

    tokio::select! {
        res = server::listener::run(&cfg, router) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
