//! The JSON command request passed as the single process argument.

use serde::Deserialize;

use crate::{CoreError, Result};

/// A validated command request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Full-text search, optionally with surrounding context per match.
    SearchMessages {
        /// Search query in Slack search syntax. Never empty.
        query: String,
        /// Reconstruct the conversation around each match.
        with_context: bool,
    },
    /// List non-archived channels.
    ListChannels,
    /// List workspace members.
    ListUsers,
}

#[derive(Debug, Deserialize)]
struct RawRequest {
    #[serde(default)]
    command: String,
    #[serde(default)]
    query: String,
    #[serde(default, rename = "withContext")]
    with_context: Option<String>,
}

impl Request {
    /// Parse and validate a request such as
    /// `{"command":"search_messages","query":"deploy","withContext":"true"}`.
    ///
    /// Context mode is enabled only by the exact string `"true"`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Input`] for malformed JSON, a missing query on
    /// `search_messages`, or an unknown command.
    pub fn parse(json: &str) -> Result<Self> {
        let raw: RawRequest = serde_json::from_str(json)
            .map_err(|e| CoreError::Input(format!("failed to parse arguments: {e}")))?;

        match raw.command.as_str() {
            "search_messages" => {
                if raw.query.is_empty() {
                    return Err(CoreError::Input("query is required for search".to_string()));
                }
                Ok(Self::SearchMessages {
                    query: raw.query,
                    with_context: raw.with_context.as_deref() == Some("true"),
                })
            }
            "list_channels" => Ok(Self::ListChannels),
            "list_users" => Ok(Self::ListUsers),
            other => Err(CoreError::Input(format!("unknown command: {other}"))),
        }
    }
}
