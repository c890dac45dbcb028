//! Configuration module
//!
//! Environment-driven configuration for the HTTP server and the transform
//! pipeline. Values are read once at startup and validated before the server binds.

use std::env;
use std::str::FromStr;

use crate::constants::{BG_REMOVAL_MAX_CONCURRENT, MAX_UPLOAD_SIZE_MB};

const SERVER_PORT: u16 = 3000;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Log output format for the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Invalid LOG_FORMAT: {}", other)),
        }
    }
}

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
    pub log_format: LogFormat,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            log_format: LogFormat::Text,
        }
    }
}

/// Transform pipeline configuration
#[derive(Clone, Debug)]
pub struct TransformConfig {
    pub base: BaseConfig,
    pub max_upload_size_bytes: usize,
    pub bg_removal_max_concurrent: usize,
    // Remote segmentation backend; unset means background removal always fails
    pub segmentation_url: Option<String>,
    pub segmentation_api_key: Option<String>,
    pub segmentation_timeout_secs: Option<u64>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            bg_removal_max_concurrent: BG_REMOVAL_MAX_CONCURRENT,
            segmentation_url: None,
            segmentation_api_key: None,
            segmentation_timeout_secs: None,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config(pub Box<TransformConfig>);

impl Config {
    fn inner(&self) -> &TransformConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = TransformConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn log_format(&self) -> LogFormat {
        self.inner().base.log_format
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    pub fn bg_removal_max_concurrent(&self) -> usize {
        self.inner().bg_removal_max_concurrent
    }

    pub fn segmentation_url(&self) -> Option<&str> {
        self.inner().segmentation_url.as_deref()
    }

    pub fn segmentation_api_key(&self) -> Option<&str> {
        self.inner().segmentation_api_key.as_deref()
    }

    pub fn segmentation_timeout_secs(&self) -> Option<u64> {
        self.inner().segmentation_timeout_secs
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn env_parse<T>(name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", name, e)),
        _ => Ok(default),
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl TransformConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = env_parse("MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB)?;

        let segmentation_timeout_secs = match env_non_empty("SEGMENTATION_TIMEOUT_SECS") {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|e| anyhow::anyhow!("Invalid SEGMENTATION_TIMEOUT_SECS: {}", e))?,
            ),
            None => None,
        };

        let log_format = match env::var("LOG_FORMAT") {
            Ok(raw) => raw.parse::<LogFormat>()?,
            Err(_) => LogFormat::Text,
        };

        let config = TransformConfig {
            base: BaseConfig {
                server_port: env_parse("SERVER_PORT", SERVER_PORT)?,
                cors_origins,
                environment,
                http_concurrency_limit: env_parse(
                    "HTTP_CONCURRENCY_LIMIT",
                    HTTP_CONCURRENCY_LIMIT,
                )?,
                log_format,
            },
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            bg_removal_max_concurrent: env_parse(
                "BG_REMOVAL_MAX_CONCURRENT",
                BG_REMOVAL_MAX_CONCURRENT,
            )?,
            segmentation_url: env_non_empty("SEGMENTATION_URL"),
            segmentation_api_key: env_non_empty("SEGMENTATION_API_KEY"),
            segmentation_timeout_secs,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.bg_removal_max_concurrent == 0 {
            return Err(anyhow::anyhow!(
                "BG_REMOVAL_MAX_CONCURRENT must be greater than 0"
            ));
        }

        if self.base.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be greater than 0"));
        }

        if let Some(url) = &self.segmentation_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!(
                    "SEGMENTATION_URL must be an http(s) URL, got: {}",
                    url
                ));
            }
        }

        if self.segmentation_timeout_secs == Some(0) {
            return Err(anyhow::anyhow!(
                "SEGMENTATION_TIMEOUT_SECS must be greater than 0 when set"
            ));
        }

        Ok(())
    }
}
