// app/src/main.rs

mod config;
mod db;
mod errors;
mod models;
mod services;
mod state;
mod web;

#[cfg(test)]
mod test_support;

use crate::config::{AppConfig, LogFormat};
use crate::db::{PgCatalog, PgOrderStore, PgUsers};
use crate::state::AppState;

use actix_web::HttpServer;
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

/// Log format has to be known before the subscriber exists, so it is read
/// straight from the environment; `AppConfig::from_env` validates it again.
fn log_format_from_env() -> LogFormat {
  dotenvy::dotenv().ok();
  std::env::var("LOG_FORMAT")
    .ok()
    .and_then(|raw| raw.parse().ok())
    .unwrap_or(LogFormat::Pretty)
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
  tracing::error!(error = %err, "{}", context);
  io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  init_tracing(log_format_from_env());
  tracing::info!("Starting storefront server...");

  let app_config = Arc::new(AppConfig::from_env().map_err(|e| startup_error("Failed to load configuration", e))?);

  let db_pool = PgPoolOptions::new()
    .max_connections(app_config.db_max_connections)
    .acquire_timeout(app_config.db_acquire_timeout)
    .connect(&app_config.database_url)
    .await
    .map_err(|e| startup_error("Failed to connect to the database", e))?;
  tracing::info!("Successfully connected to the database.");

  if app_config.run_migrations {
    sqlx::migrate!("./migrations")
      .run(&db_pool)
      .await
      .map_err(|e| startup_error("Failed to run database migrations", e))?;
    tracing::info!("Database migrations applied.");
  }

  let catalog = Arc::new(PgCatalog::new(db_pool.clone()));
  let app_state = AppState::new(
    app_config.clone(),
    Arc::new(PgOrderStore::new(db_pool.clone())),
    catalog.clone(),
    catalog,
    Arc::new(PgUsers::new(db_pool)),
  );

  let server_address = app_config.bind_address();
  tracing::info!("Binding server to {}...", server_address);

  HttpServer::new(move || web::build_app(app_state.clone()).wrap(tracing_actix_web::TracingLogger::default()))
    .bind(&server_address)?
    .run()
    .await
}
