//! Configuration types and loading for the application.

use std::path::Path;

use anyhow::Result;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{CoreError, env_prefix};

/// Upper bound Slack accepts for `search.messages` page size.
pub const MAX_SEARCH_RESULTS: u32 = 100;

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Slack API access.
    pub slack: SlackConfig,

    /// Search behavior.
    pub search: SearchConfig,

    /// Output rendering.
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from a specific path and the environment.
    ///
    /// The file is optional; a missing file yields the built-in defaults
    /// overlaid with any `SLACKQ__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn load_from_path(config_file: &Path) -> Result<Self> {
        let env_prefix = env_prefix();
        let built = Config::builder()
            .set_default("logging.level", "warn")?
            .set_default("slack.api_url", DEFAULT_API_URL)?
            .set_default("slack.token_env", DEFAULT_TOKEN_ENV)?
            .set_default("slack.timeout_secs", 30_i64)?
            .set_default("search.max_results", i64::from(MAX_SEARCH_RESULTS))?
            .set_default("output.timezone", "local")?
            .add_source(
                File::from(config_file)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix(env_prefix.as_str()).separator("__"))
            .build()?;

        let config: Self = built.try_deserialize()?;
        log::debug!("loaded configuration from {}", config_file.display());
        Ok(config)
    }

    /// Resolve the Slack API token.
    ///
    /// Prefers `slack.token` and falls back to the environment variable named
    /// by `slack.token_env`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if neither source yields a non-empty token.
    pub fn resolve_token(&self) -> crate::Result<String> {
        self.resolve_token_with(|name| std::env::var(name).ok())
    }

    fn resolve_token_with(
        &self,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> crate::Result<String> {
        if let Some(token) = self.slack.token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(token.to_string());
        }
        lookup(&self.slack.token_env)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::Config(format!("{} is not set", self.slack.token_env)))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace).
    pub level: LogLevel,
}

/// Log level enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only emit error-level messages.
    Error,
    /// Emit warnings and errors (default).
    #[default]
    Warn,
    /// Emit informational messages and above.
    Info,
    /// Emit debug diagnostics and above.
    Debug,
    /// Emit all messages including fine-grained traces.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

const DEFAULT_API_URL: &str = "https://slack.com/api";
const DEFAULT_TOKEN_ENV: &str = "SLACK_TOKEN";

/// Slack API access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Base URL of the Slack Web API.
    pub api_url: String,

    /// API token. Usually left unset in favor of `token_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable holding the API token.
    pub token_env: String,

    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Search behavior configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of matches requested per search (1..=100).
    pub max_results: u32,
}

impl SearchConfig {
    /// `max_results` clamped to what the search endpoint accepts.
    #[must_use]
    pub fn effective_max_results(&self) -> u32 {
        self.max_results.clamp(1, MAX_SEARCH_RESULTS)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: MAX_SEARCH_RESULTS,
        }
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Time zone used when rendering message times.
    pub timezone: DisplayZone,
}

/// Time zone for rendered timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayZone {
    /// The host's local time zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}
