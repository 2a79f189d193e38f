//! census-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `CENSUS_*`
//! environment overrides, sets up logging to stdout and `<log_dir>/all.log`,
//! opens the SQLite store, and serves the JSON API.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use census_api::{ServerConfig, config::expand_tilde, telemetry};
use census_enrich::EnrichmentClient;
use census_service::PersonService;
use census_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about = "Census person registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config).context("failed to read configuration")?;

  // Initialise tracing. Dropping the guard flushes the log file.
  let _log_guard = telemetry::init(&expand_tilde(&server_cfg.log_dir))
    .context("failed to initialise logging")?;
  tracing::info!(config = ?cli.config, "configuration loaded");

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let enricher = EnrichmentClient::from_config(&server_cfg.enrichment.to_enrich_config())
    .context("failed to build enrichment client")?;

  let service = Arc::new(PersonService::new(Arc::new(store), enricher));
  let app = census_api::router(service);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
  tracing::info!("shutdown signal received, draining connections");
}
