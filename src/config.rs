use std::net::SocketAddr;
use std::str::FromStr;

use serde::Deserialize;
use anyhow::Result;
use dotenvy::dotenv;

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

fn default_max_rows() -> usize {
    100_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_file_size: default_max_file_size(),
            max_rows: default_max_rows(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Ok(Config {
            bind_addr: env_or("BIND_ADDR", default_bind_addr())?,
            max_file_size: env_or("MAX_FILE_SIZE", default_max_file_size())?,
            max_rows: env_or("MAX_ROWS", default_max_rows())?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}={:?}: {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

pub fn load_config() -> Result<Config> {
    let config = Config::new()?;
    tracing::info!(
        "Loaded config: bind_addr={}, max_file_size={}, max_rows={}",
        config.bind_addr,
        config.max_file_size,
        config.max_rows
    );
    Ok(config)
}
