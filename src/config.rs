use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_api_per_min: u32,
    pub rate_import_per_min: u32,

    /// Largest accepted spreadsheet upload, in bytes.
    pub max_upload_bytes: usize,
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            server_addr: "127.0.0.1:8080".to_string(),
            api_prefix: "/api".to_string(),
            rate_api_per_min: 1000,
            rate_import_per_min: 20,
            max_upload_bytes: 10 * 1024 * 1024,
            log_dir: "logs".to_string(),
        }
    }
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default();
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            rate_api_per_min: parsed_or("RATE_API_PER_MIN", defaults.rate_api_per_min)?,
            rate_import_per_min: parsed_or("RATE_IMPORT_PER_MIN", defaults.rate_import_per_min)?,
            max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
        })
    }
}
