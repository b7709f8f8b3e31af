//! Core library for slackq - Slack search with conversational context.
//!
//! This crate provides:
//! - Configuration loading and XDG path resolution
//! - A Slack Web API client behind the [`SlackApi`] trait
//! - Timestamp decoding and single-line message formatting
//! - Context reconstruction for search matches (channel timeline or thread)
//! - The command layer driven by the `slackq` binary

pub mod commands;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod format;
pub mod paths;
pub mod request;
pub mod slack;

#[cfg(test)]
pub(crate) mod test_support;

pub use commands::{CommandRunner, execute};
pub use config::{AppConfig, DisplayZone, LogLevel, LoggingConfig, OutputConfig, SearchConfig, SlackConfig};
pub use context::{MessageContext, ThreadWindow, locate_context};
pub use directory::UserDirectory;
pub use error::{ApiError, CoreError, ErrorKind, Result, TimestampError};
pub use format::{MessageFormatter, decode_timestamp};
pub use paths::{AppPaths, default_config_dir};
pub use request::Request;
pub use slack::{Channel, Message, SearchMatch, SlackApi, SlackClient, User};

/// Application name used for config directories and environment prefix.
pub const APP_NAME: &str = "slackq";

/// Returns the environment variable prefix for this application.
#[must_use]
pub fn env_prefix() -> String {
    APP_NAME
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
