// app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(raw: &str) -> Result<Self> {
    match raw.trim().to_ascii_lowercase().as_str() {
      "pretty" | "" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!(
        "Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'",
        other
      ))),
    }
  }
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,
  pub db_acquire_timeout: Duration,
  pub jwt_secret: String,
  pub token_ttl_hours: i64,
  pub run_migrations: bool,
  /// Lets `POST /auth/register?admin=true` create admin accounts.
  pub allow_admin_signup: bool,
  pub log_format: LogFormat,
}

// Hand-written so the secret and the connection string never reach the logs.
impl std::fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &"[REDACTED]")
      .field("db_max_connections", &self.db_max_connections)
      .field("db_acquire_timeout", &self.db_acquire_timeout)
      .field("jwt_secret", &"[REDACTED]")
      .field("token_ttl_hours", &self.token_ttl_hours)
      .field("run_migrations", &self.run_migrations)
      .field("allow_admin_signup", &self.allow_admin_signup)
      .field("log_format", &self.log_format)
      .finish()
  }
}

/// Reads `var_name`, falling back to `default` when it is unset, and parses it.
fn parse_env_or<T>(var_name: &str, default: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  let raw = env::var(var_name).unwrap_or_else(|_| default.to_string());
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e)))
}

fn required_env(var_name: &str) -> Result<String> {
  let value =
    env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))?;
  if value.trim().is_empty() {
    return Err(AppError::Config(format!("Environment variable '{}' must not be empty", var_name)));
  }
  Ok(value)
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = parse_env_or::<u16>("SERVER_PORT", "8080")?;
    let database_url = required_env("DATABASE_URL")?;
    let db_max_connections = parse_env_or::<u32>("DB_MAX_CONNECTIONS", "10")?;
    if db_max_connections == 0 {
      return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".to_string()));
    }
    let db_acquire_timeout = Duration::from_secs(parse_env_or::<u64>("DB_ACQUIRE_TIMEOUT_SECS", "5")?);
    let jwt_secret = required_env("JWT_SECRET")?;
    let token_ttl_hours = parse_env_or::<i64>("TOKEN_TTL_HOURS", "24")?;
    if token_ttl_hours <= 0 {
      return Err(AppError::Config("TOKEN_TTL_HOURS must be positive".to_string()));
    }
    let run_migrations = parse_env_or::<bool>("RUN_MIGRATIONS", "true")?;
    let allow_admin_signup = parse_env_or::<bool>("ALLOW_ADMIN_SIGNUP", "false")?;
    let log_format = parse_env_or::<LogFormat>("LOG_FORMAT", "pretty")?;

    let config = Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      db_acquire_timeout,
      jwt_secret,
      token_ttl_hours,
      run_migrations,
      allow_admin_signup,
      log_format,
    };
    tracing::info!(?config, "Application configuration loaded successfully.");
    Ok(config)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
