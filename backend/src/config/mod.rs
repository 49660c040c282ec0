//! Central module for application-wide configuration settings.
//!
//! Settings are layered, lowest precedence first:
//! 1. Built-in defaults
//! 2. A TOML file given with `--config`
//! 3. Environment variables prefixed with `BARISTA__`, using `__` between
//!    sections (e.g. `BARISTA__AUTH__AUDIENCE=drinks`)
//! 4. Command-line flags
//!
//! The `auth` section names the trusted key source: either a JWKS document on
//! disk (`jwks_path`) or an HMAC secret (`shared_secret`), never both.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use barista_adapters::{AdapterError, JwksKeySource, KeySource, SharedSecretKeySource};
use clap::Parser;
use config::{Config, Environment, File};
use jsonwebtoken::Algorithm;
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "BARISTA";

/// Command-line arguments
#[derive(Debug, Default, Parser)]
#[command(version, about)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "BARISTA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("auth: one of `jwks_path` or `shared_secret` must be set")]
    MissingKeySource,

    #[error("auth: `jwks_path` and `shared_secret` are mutually exclusive")]
    ConflictingKeySources,

    #[error("auth: audience must not be empty")]
    EmptyAudience,

    #[error("server: invalid listen address {0}")]
    InvalidAddress(String),

    #[error("auth: {0}")]
    KeySource(#[from] AdapterError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub audience: String,
    #[serde(default)]
    pub issuer: Option<String>,
    pub algorithm: Algorithm,
    #[serde(default)]
    pub jwks_path: Option<PathBuf>,
    #[serde(default)]
    pub shared_secret: Option<String>,
    #[serde(default = "default_shared_secret_kid")]
    pub shared_secret_kid: String,
    /// Seconds between key set reloads; 0 disables refreshing.
    #[serde(default)]
    pub refresh_interval_secs: u64,
}

fn default_shared_secret_kid() -> String {
    "barista".to_string()
}

impl AppConfig {
    /// Load configuration from all sources
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000_i64)?
            .set_default("auth.audience", "drinks")?
            .set_default("auth.algorithm", "RS256")?;

        if let Some(path) = &args.config {
            builder = builder.add_source(File::from(path.as_path()));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        if let Some(host) = &args.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }
        if let Some(port) = args.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.audience.trim().is_empty() {
            return Err(ConfigError::EmptyAudience);
        }
        match (&self.auth.jwks_path, &self.auth.shared_secret) {
            (None, None) => Err(ConfigError::MissingKeySource),
            (Some(_), Some(_)) => Err(ConfigError::ConflictingKeySources),
            _ => Ok(()),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}

impl AuthConfig {
    /// Builds the configured key source. JWKS documents are read from disk
    /// here, once; later reloads go through `KeySource::refresh`.
    pub async fn key_source(&self) -> Result<Arc<dyn KeySource>, ConfigError> {
        match (&self.jwks_path, &self.shared_secret) {
            (Some(path), None) => Ok(Arc::new(self.jwks(path).await?)),
            (None, Some(secret)) => Ok(Arc::new(SharedSecretKeySource::new(
                secret,
                self.shared_secret_kid.clone(),
                self.algorithm,
            )?)),
            (None, None) => Err(ConfigError::MissingKeySource),
            (Some(_), Some(_)) => Err(ConfigError::ConflictingKeySources),
        }
    }

    async fn jwks(&self, path: &Path) -> Result<JwksKeySource, AdapterError> {
        JwksKeySource::from_path(path, self.algorithm).await
    }
}
