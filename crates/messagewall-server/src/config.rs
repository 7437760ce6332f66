use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::HeaderValue;

pub const DEFAULT_PORT: u16 = 5174;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_DB_PATH: &str = "messages.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origin: HeaderValue,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `HOST`, `PORT`, `CORS_ORIGIN` and `DB_PATH` through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };
        let origin = lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into());
        let cors_origin = HeaderValue::from_str(&origin)
            .with_context(|| format!("CORS_ORIGIN is not a valid header value: {:?}", origin))?;
        let db_path = lookup("DB_PATH")
            .unwrap_or_else(|| DEFAULT_DB_PATH.into())
            .into();

        Ok(Self {
            host,
            port,
            cors_origin,
            db_path,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("invalid listen address {}", addr))
    }
}
