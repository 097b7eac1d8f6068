//! Application setup and runtime.

use crate::{
  db, http,
  storage::{BlobStore, LocalBlobStore},
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
  pub db: SqlitePool,
  pub store: Arc<dyn BlobStore>,
  /// Directory served read-only under `/uploads`.
  pub upload_dir: PathBuf,
}

/// Settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub addr: SocketAddr,
  pub upload_dir: PathBuf,
  pub public_url: String,
}

impl Config {
  pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
    let database_url = std::env::var("OFFERDOCS_DATABASE")
      .unwrap_or_else(|_| "sqlite://offerdocs.db".to_string());
    let addr: SocketAddr = std::env::var("OFFERDOCS_ADDR")
      .unwrap_or_else(|_| "127.0.0.1:3811".to_string())
      .parse()?;
    let upload_dir =
      PathBuf::from(std::env::var("OFFERDOCS_UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));
    let public_url =
      std::env::var("OFFERDOCS_PUBLIC_URL").unwrap_or_else(|_| format!("http://{addr}"));
    Ok(Self {
      database_url,
      addr,
      upload_dir,
      public_url,
    })
  }
}

/// Open the pool, run migrations, serve until Ctrl-C, then close the pool.
pub async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  crate::util::init_tracing();
  let config = Config::from_env()?;

  let db_url = db::ensure_sqlite_path(&config.database_url);
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;
  db::run_migrations(&pool).await?;

  let store = LocalBlobStore::new(&config.upload_dir, &config.public_url).await?;
  let state = AppState {
    db: pool.clone(),
    store: Arc::new(store),
    upload_dir: config.upload_dir.clone(),
  };

  let app = http::build_router(state);

  info!("upload endpoint:  POST http://{}/api/applications/upload", config.addr);
  info!("list endpoint:    GET  http://{}/api/applications/:id/files", config.addr);
  info!("stored files:     {}/uploads/", config.public_url);

  let listener = tokio::net::TcpListener::bind(config.addr).await?;
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  pool.close().await;
  info!("database pool closed");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("failed to listen for shutdown signal: {e}");
    std::future::pending::<()>().await;
  }
  info!("shutdown requested");
}
