use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Sqlite => "sqlite",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(anyhow!(
                "unknown STORAGE_BACKEND '{other}', expecting 'memory' or 'sqlite'"
            )),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub http_addr: String,
    pub storage_backend: StorageBackend,
    pub database_url: String,
    pub static_dir: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub environment: String,
    pub admin_telegram_id: Option<i64>,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let http_addr = match get("HTTP_ADDR") {
            Some(addr) => addr,
            None => {
                let port: u16 = get("PORT")
                    .unwrap_or_else(|| "3000".to_string())
                    .parse()
                    .context("Failed to parse PORT, expecting port number")?;
                format!("0.0.0.0:{port}")
            }
        };
        let storage_backend: StorageBackend = get("STORAGE_BACKEND")
            .unwrap_or_else(|| "sqlite".to_string())
            .parse()?;
        let database_url =
            get("DATABASE_URL").unwrap_or_else(|| "sqlite://database.sqlite?mode=rwc".to_string());
        let static_dir = get("STATIC_DIR").unwrap_or_else(|| "public".to_string());
        let cors_origins = parse_cors_origins(get("CORS_ORIGINS").unwrap_or_else(|| "*".to_string()));
        let log_level = get("LOG_LEVEL")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());
        let environment = get("APP_ENV").unwrap_or_else(|| "development".to_string());
        let admin_telegram_id = get("ADMIN_TELEGRAM_ID")
            .map(|raw| parse_admin_id(&raw))
            .transpose()?;
        let http_request_body_limit_bytes = parse_positive(
            "HTTP_REQUEST_BODY_LIMIT_BYTES",
            get("HTTP_REQUEST_BODY_LIMIT_BYTES"),
            1024 * 1024,
        )?;
        let http_concurrency_limit =
            parse_positive("HTTP_CONCURRENCY_LIMIT", get("HTTP_CONCURRENCY_LIMIT"), 256)?;
        let http_request_timeout_secs = parse_positive(
            "HTTP_REQUEST_TIMEOUT_SECS",
            get("HTTP_REQUEST_TIMEOUT_SECS"),
            10,
        )?;

        Ok(Self {
            http_addr,
            storage_backend,
            database_url,
            static_dir,
            cors_origins,
            log_level,
            environment,
            admin_telegram_id,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
        })
    }
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_admin_id(raw: &str) -> Result<i64> {
    let id = raw
        .parse::<i64>()
        .context("Failed to parse ADMIN_TELEGRAM_ID, expecting integer")?;
    if id <= 0 {
        return Err(anyhow!("ADMIN_TELEGRAM_ID must be > 0"));
    }
    Ok(id)
}

fn parse_positive<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr + PartialEq + Default,
{
    let value = match raw {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| anyhow!("Failed to parse {key}, expecting positive integer"))?,
        None => default,
    };

    if value == T::default() {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
