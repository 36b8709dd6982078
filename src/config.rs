//! Environment-backed configuration.
//!
//! Infrastructure URLs carry local defaults; the API key matching the active
//! provider and `DATABASE_URL` are required.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::providers::ProviderKind;

const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_PORT: u16 = 3000;

/// Configuration errors raised at boot.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing API key: {0} environment variable not set")]
    MissingApiKey(&'static str),

    #[error("missing DATABASE_URL environment variable")]
    MissingDatabaseUrl,

    #[error("invalid PORT value '{0}'")]
    InvalidPort(String),
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderKind,
    /// API key for the active provider.
    pub api_key: String,
    pub qdrant_url: String,
    pub redis_url: String,
    pub database_url: String,
    pub models_cache_dir: Option<PathBuf>,
    pub hf_model_name: Option<String>,
    pub port: u16,
}

impl AppConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match env::var("LLM_PROVIDER") {
            Ok(name) => ProviderKind::parse(&name),
            Err(_) => ProviderKind::OpenRouter,
        };

        let key_var = provider.api_key_var();
        let api_key = env::var(key_var).map_err(|_| ConfigError::MissingApiKey(key_var))?;

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            provider,
            api_key,
            qdrant_url: env::var("QDRANT_URL").unwrap_or_else(|_| DEFAULT_QDRANT_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            database_url,
            models_cache_dir: env::var("MODELS_CACHE_DIR").ok().map(PathBuf::from),
            hf_model_name: env::var("HF_MODEL_NAME").ok(),
            port,
        })
    }
}
