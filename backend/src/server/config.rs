//! Environment-driven server configuration.
//!
//! Everything the process needs is read once at startup: the database URL,
//! the bind address, pool sizing, and the page limits handed to list
//! handlers. Parsing is separated from `std::env` access so it stays
//! testable.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use pagination::{PageLimits, PageLimitsError};
use thiserror::Error;

/// Errors raised while assembling [`ServerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("{name} must be set")]
    MissingVar { name: &'static str },
    /// An environment variable could not be parsed.
    #[error("{name} is invalid: {message}")]
    InvalidVar { name: &'static str, message: String },
    /// The configured page sizes are inconsistent.
    #[error("page limits are invalid: {0}")]
    PageLimits(#[from] PageLimitsError),
}

/// Startup configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum connections in the database pool.
    pub pool_max_size: u32,
    /// Default/maximum page size for list requests.
    pub page_limits: PageLimits,
}

impl ServerConfig {
    /// Assemble configuration from the process environment.
    ///
    /// `DATABASE_URL` is required; `BIND_ADDR` (default `0.0.0.0:8080`),
    /// `DB_POOL_MAX_SIZE` (default 10), `PAGE_SIZE_DEFAULT` (default 20) and
    /// `PAGE_SIZE_MAX` (default 100) are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar {
            name: "DATABASE_URL",
        })?;

        let bind_addr = parse_var("BIND_ADDR", env::var("BIND_ADDR").ok(), default_bind_addr())?;
        let pool_max_size = parse_var("DB_POOL_MAX_SIZE", env::var("DB_POOL_MAX_SIZE").ok(), 10)?;
        let default_size = parse_var("PAGE_SIZE_DEFAULT", env::var("PAGE_SIZE_DEFAULT").ok(), 20)?;
        let max_size = parse_var("PAGE_SIZE_MAX", env::var("PAGE_SIZE_MAX").ok(), 100)?;

        Ok(Self {
            bind_addr,
            database_url,
            pool_max_size,
            page_limits: PageLimits::new(default_size, max_size)?,
        })
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Parse an optional raw value, falling back to `default` when absent.
fn parse_var<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|err: T::Err| ConfigError::InvalidVar {
            name,
            message: err.to_string(),
        }),
    }
}
