// src/config.rs
use crate::service::storage_service::StorageConfig;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// 本番フロントエンドのオリジン
pub const DEFAULT_CORS_ORIGINS: &str = "https://socialmediain.netlify.app,http://localhost:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {name} value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// 投稿処理の上限値
#[derive(Clone, Debug)]
pub struct SubmissionConfig {
    pub max_images: usize,
    pub upload_timeout: Duration,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_images: 5,
            upload_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub body_limit: usize,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub database_url: String,
    pub database_require_tls: bool,
    pub storage: StorageConfig,
    pub submission: SubmissionConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を組み立てる（テストでは HashMap を渡す）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let defaults = SubmissionConfig::default();
        let max_images = parse_or(&lookup, "MAX_IMAGES", defaults.max_images)?;
        if max_images == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_IMAGES",
                value: "0".to_string(),
            });
        }
        let upload_timeout_secs = parse_or(
            &lookup,
            "UPLOAD_TIMEOUT_SECS",
            defaults.upload_timeout.as_secs(),
        )?;

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3001)?,
            cors_allowed_origins,
            database_url,
            database_require_tls: parse_or(&lookup, "DATABASE_REQUIRE_TLS", true)?,
            storage: StorageConfig::from_lookup(&lookup)?,
            submission: SubmissionConfig {
                max_images,
                upload_timeout: Duration::from_secs(upload_timeout_secs),
            },
            server: ServerConfig {
                body_limit: parse_or(&lookup, "BODY_LIMIT_BYTES", 50 * 1024 * 1024)?, // 50MB
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
