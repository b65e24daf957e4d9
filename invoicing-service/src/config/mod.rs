//! Configuration module for invoicing-service.

use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct InvoicingConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub connection: DatabaseConnection,
    pub max_connections: u32,
    pub min_connections: u32,
    pub statement_timeout: Duration,
    pub run_migrations: bool,
}

/// Where to reach PostgreSQL: a full URL or discrete parts.
#[derive(Debug, Clone)]
pub enum DatabaseConnection {
    Url(Secret<String>),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: Secret<String>,
        name: String,
    },
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub issuer: Option<String>,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, AppError> {
        match &self.connection {
            DatabaseConnection::Url(url) => PgConnectOptions::from_str(url.expose_secret())
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid DATABASE_URL: {}", e))),
            DatabaseConnection::Parts {
                host,
                port,
                user,
                password,
                name,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password.expose_secret())
                .database(name)),
        }
    }
}

impl InvoicingConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the configuration from `lookup`, which resolves a variable name
    /// to its value.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::ConfigError(anyhow::anyhow!("JWT_SECRET is required")))?;

        Ok(Self {
            common,
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| "invoicing-service".to_string()),
            service_version: lookup("SERVICE_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|s| !s.is_empty()),
            database: DatabaseConfig {
                connection: database_connection(&lookup)?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1)?,
                statement_timeout: Duration::from_millis(parse_or(
                    &lookup,
                    "DATABASE_STATEMENT_TIMEOUT_MS",
                    5_000,
                )?),
                run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true)?,
            },
            jwt: JwtConfig {
                secret: Secret::new(jwt_secret),
                issuer: lookup("JWT_ISSUER").filter(|s| !s.is_empty()),
            },
        })
    }
}

fn database_connection<F>(lookup: &F) -> Result<DatabaseConnection, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
        return Ok(DatabaseConnection::Url(Secret::new(url)));
    }

    let required = |key: &str| {
        lookup(key)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::ConfigError(anyhow::anyhow!("{} is required", key)))
    };

    Ok(DatabaseConnection::Parts {
        host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
        port: parse_or(lookup, "DB_PORT", 5432)?,
        user: required("DB_USER")?,
        password: Secret::new(required("DB_PASSWORD")?),
        name: required("DB_NAME")?,
    })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
