use std::{env, net::SocketAddr};

use axum::http::HeaderValue;
use thiserror::Error;

use crate::logging::LogLevel;

pub const DEFAULT_SERVER_NAME: &str = "My First MCP HTTP Server";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_name: String,
    pub server_version: String,
    pub bind_addr: String,
    pub bind_port: u16,
    pub cors_origins: CorsOrigins,
    pub log_level: LogLevel,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16")]
    InvalidPort,
    #[error("CORS_ORIGIN must be '*' or a comma-separated list of valid origins")]
    InvalidCorsOrigin,
    #[error("LOG_LEVEL must be one of: debug, info, warn, error")]
    InvalidLogLevel,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_name: DEFAULT_SERVER_NAME.to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            bind_addr: "127.0.0.1".to_string(),
            bind_port: DEFAULT_PORT,
            cors_origins: CorsOrigins::Any,
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let server_name = non_empty_var("SERVER_NAME").unwrap_or(defaults.server_name);
        let server_version = non_empty_var("SERVER_VERSION").unwrap_or(defaults.server_version);
        let bind_addr = non_empty_var("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let bind_port = non_empty_var("PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(defaults.bind_port);
        let cors_origins = non_empty_var("CORS_ORIGIN")
            .map(|value| parse_cors_origins(&value))
            .transpose()?
            .unwrap_or(defaults.cors_origins);
        let log_level = non_empty_var("LOG_LEVEL")
            .map(|value| {
                value
                    .parse::<LogLevel>()
                    .map_err(|_| ConfigError::InvalidLogLevel)
            })
            .transpose()?
            .unwrap_or(defaults.log_level);

        let config = Self {
            server_name,
            server_version,
            bind_addr,
            bind_port,
            cors_origins,
            log_level,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn parse_cors_origins(value: &str) -> Result<CorsOrigins, ConfigError> {
    if value.trim() == "*" {
        return Ok(CorsOrigins::Any);
    }

    let origins = value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidCorsOrigin))
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        return Err(ConfigError::InvalidCorsOrigin);
    }

    Ok(CorsOrigins::List(origins))
}
