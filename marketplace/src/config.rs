// marketplace/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` selects the in-memory store.
  pub database_url: Option<String>,
  pub run_migrations: bool,
  pub mail_sender: String,
  pub seed_db: bool,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      run_migrations: true,
      mail_sender: "noreply@example.com".to_string(),
      seed_db: false,
    }
  }
}

fn parse_bool(var_name: &str, value: &str) -> Result<bool> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" => Ok(false),
    other => Err(AppError::Config(format!("Invalid {} value: '{}'", var_name, other))),
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the config from any variable source; unset variables take their defaults.
  pub fn from_lookup(get_env: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();

    let server_host = get_env("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = match get_env("SERVER_PORT") {
      Some(port) => port
        .trim()
        .parse::<u16>()
        .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?,
      None => defaults.server_port,
    };
    let database_url = get_env("DATABASE_URL").filter(|url| !url.trim().is_empty());
    let run_migrations = match get_env("RUN_MIGRATIONS") {
      Some(v) => parse_bool("RUN_MIGRATIONS", &v)?,
      None => defaults.run_migrations,
    };
    let mail_sender = get_env("MAIL_SENDER").unwrap_or(defaults.mail_sender);
    let seed_db = match get_env("SEED_DB") {
      Some(v) => parse_bool("SEED_DB", &v)?,
      None => defaults.seed_db,
    };

    tracing::info!(
      %server_host,
      server_port,
      persistent = database_url.is_some(),
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      run_migrations,
      mail_sender,
      seed_db,
    })
  }
}
