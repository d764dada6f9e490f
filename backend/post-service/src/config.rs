/// Configuration management for Post Service
///
/// Loads configuration from environment variables.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Upload validation
    pub uploads: UploadConfig,
    /// Post lifecycle behaviour
    pub posts: PostConfig,
    /// Counter write retries
    pub counters: CounterConfig,
    /// Log output
    pub logging: LoggingConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// MIME essences rejected on attach (lowercase)
    pub denied_mime_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostConfig {
    /// Remove likes, comments and files together with their post
    pub cascade_delete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Compare-and-swap attempts before a counter update gives up
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

// Default values
fn default_denied_mime_types() -> Vec<String> {
    vec![
        "application/vnd.microsoft.portable-executable".to_string(),
        "application/x-msdownload".to_string(),
        "application/x-dosexec".to_string(),
    ]
}

fn default_max_attempts() -> u32 {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                env: "development".to_string(),
            },
            uploads: UploadConfig {
                denied_mime_types: default_denied_mime_types(),
            },
            posts: PostConfig {
                cascade_delete: true,
            },
            counters: CounterConfig {
                max_attempts: default_max_attempts(),
            },
            logging: LoggingConfig {
                format: LogFormat::Text,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        };

        let uploads = UploadConfig {
            denied_mime_types: match std::env::var("UPLOAD_DENIED_MIME_TYPES") {
                Ok(raw) => parse_mime_list(&raw),
                Err(_) => default_denied_mime_types(),
            },
        };

        let posts = PostConfig {
            cascade_delete: match std::env::var("POST_CASCADE_DELETE") {
                Ok(raw) => raw
                    .parse()
                    .with_context(|| format!("POST_CASCADE_DELETE is not a bool: {}", raw))?,
                Err(_) => true,
            },
        };

        let max_attempts = match std::env::var("COUNTER_MAX_ATTEMPTS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("COUNTER_MAX_ATTEMPTS is not a number: {}", raw))?,
            Err(_) => default_max_attempts(),
        };
        if max_attempts == 0 {
            anyhow::bail!("COUNTER_MAX_ATTEMPTS must be at least 1");
        }

        let logging = LoggingConfig {
            format: match std::env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        };

        Ok(Config {
            app,
            uploads,
            posts,
            counters: CounterConfig { max_attempts },
            logging,
        })
    }
}

fn parse_mime_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
