use std::{env, fmt::Display, path::Path, path::PathBuf, str::FromStr};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_MONGODB_DATABASE: &str = "food_orders";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("Failed to load env file {path}: {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub mongodb_uri: String,
    pub database_name: String,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub port: u16,
    pub store: StoreConfig,
    pub allowed_origins: AllowedOrigins,
    pub public_base_url: Url,
    pub upload_dir: PathBuf,
    pub max_image_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
}

/// Loads `path` into the process environment, or the nearest `.env` when no
/// path is given. A missing default `.env` is fine; a missing explicit file is not.
pub fn load_env_file(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => dotenvy::from_path(path)
            .map(|_| info!("Loaded environment from {}", path.display()))
            .map_err(|source| ConfigError::EnvFile {
                path: path.display().to_string(),
                source,
            }),
        None => {
            if let Ok(path) = dotenvy::dotenv() {
                info!("Loaded environment from {}", path.display());
            }
            Ok(())
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let public_base_url = match lookup("PUBLIC_BASE_URL") {
            Some(raw) => parse_url("PUBLIC_BASE_URL", &raw)?,
            None => parse_url("PUBLIC_BASE_URL", &format!("http://localhost:{port}"))?,
        };

        Ok(Self {
            port,
            store: StoreConfig {
                mongodb_uri: string_or(&lookup, "MONGODB_URI", DEFAULT_MONGODB_URI),
                database_name: string_or(&lookup, "MONGODB_DATABASE", DEFAULT_MONGODB_DATABASE),
            },
            allowed_origins: parse_origins(&string_or(&lookup, "CORS_ORIGINS", "*")),
            public_base_url,
            upload_dir: PathBuf::from(string_or(&lookup, "UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            max_image_bytes: parse_or(&lookup, "MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_url: parse_url("ORDER_API_URL", &string_or(&lookup, "ORDER_API_URL", DEFAULT_API_URL))?,
        })
    }
}

fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key).map(|value| value.trim().to_string()) {
        Some(raw) if !raw.is_empty() => raw.parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::InvalidValue {
                key,
                message: e.to_string(),
            }
        }),
        _ => Ok(default),
    }
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
        key,
        message: e.to_string(),
    })
}

fn parse_origins(raw: &str) -> AllowedOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        AllowedOrigins::Any
    } else {
        AllowedOrigins::List(origins)
    }
}
