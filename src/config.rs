use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// Directory served under `/data`.
    pub data_dir: PathBuf,
    /// Where the resource services read their JSON from.
    pub data_base_url: String,
    pub cache_ttl: Duration,
    pub fetch: FetchConfig,
}

/// Defaults applied to every request issued by the fetch layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff_base: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let server_addr = SocketAddr::new(ip, port);

        let data_dir = PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| "data".to_string()));
        let data_base_url = lookup("DATA_BASE_URL")
            .unwrap_or_else(|| format!("http://{}", server_addr))
            .trim_end_matches('/')
            .to_string();

        let defaults = FetchConfig::default();
        let cache_ttl = Duration::from_secs(parse_or(&lookup, "CACHE_TTL_SECS", 300)?);
        let fetch = FetchConfig {
            timeout: Duration::from_millis(parse_or(&lookup, "HTTP_TIMEOUT_MS", defaults.timeout.as_millis() as u64)?),
            max_retries: parse_or(&lookup, "HTTP_MAX_RETRIES", defaults.max_retries)?,
            backoff_base: Duration::from_millis(parse_or(&lookup, "HTTP_BACKOFF_BASE_MS", defaults.backoff_base.as_millis() as u64)?),
        };

        Ok(Config {
            server_addr,
            data_dir,
            data_base_url,
            cache_ttl,
            fetch,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
