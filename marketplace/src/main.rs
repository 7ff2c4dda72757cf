// marketplace/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use marketplace_api::config::AppConfig;
use marketplace_api::seed;
use marketplace_api::services::email_mock::MockMailer;
use marketplace_api::state::AppState;
use marketplace_api::store::{MemoryStore, PgStore, Store};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
  let Some(database_url) = config.database_url.as_deref() else {
    tracing::info!("DATABASE_URL not set, using the in-memory store.");
    return Ok(Arc::new(MemoryStore::new()));
  };

  let pool = PgPool::connect(database_url)
    .await
    .context("Failed to connect to the database")?;
  tracing::info!("Successfully connected to the database.");

  let store = PgStore::new(pool);
  if config.run_migrations {
    store.migrate().await?;
  }
  Ok(Arc::new(store))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // RUST_LOG overrides
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting marketplace server...");

  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  let store = build_store(&app_config).await?;

  if app_config.seed_db {
    seed::seed_demo_data(store.as_ref()).await?;
  }

  let notifier = Arc::new(MockMailer::new(app_config.mail_sender.clone()));
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  let app_state = AppState::new(app_config, store, notifier);
  tracing::info!("Pipelines registered; binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(marketplace_api::web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await?;
  Ok(())
}
