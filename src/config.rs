use std::net::{IpAddr, SocketAddr};

use crate::error::AppError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "Linkedin";

/// Server configuration read from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Address to bind the HTTP listener on.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// MongoDB connection string.
    pub mongodb_uri: String,
    /// Name of the database holding the collections.
    pub database: String,
}

impl AppConfig {
    /// Build the config from environment variables.
    ///
    /// Every variable is optional:
    /// - `HOST` (default `0.0.0.0`)
    /// - `PORT` (default `3000`)
    /// - `MONGODB_URI` (default `mongodb://localhost:27017`)
    /// - `MONGODB_DATABASE` (default `Linkedin`)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (useful for testing).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("Invalid PORT '{raw}': {e}")))?,
            None => DEFAULT_PORT,
        };

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host
            .trim()
            .parse::<IpAddr>()
            .map_err(|e| AppError::Config(format!("Invalid HOST '{host}': {e}")))?;

        Ok(Self {
            host,
            port,
            mongodb_uri: lookup("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string()),
            database: lookup("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
