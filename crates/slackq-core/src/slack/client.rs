//! Slack Web API client.
//!
//! All methods used here are plain `GET {api_url}/{method}` calls with a bearer
//! token. Slack reports application errors with HTTP 200 and `"ok": false`, so
//! every response goes through [`SlackClient::call`] which checks both.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::SlackConfig;
use crate::slack::api::{HistoryBound, HistoryQuery, SlackApi};
use crate::slack::models::{
    Channel, ConversationsListResponse, HistoryResponse, Message, RepliesResponse, SearchMatch,
    SearchResponse, User, UsersListResponse,
};
use crate::slack::pagination::Page;
use crate::{ApiError, CoreError};

/// Slack API client.
#[derive(Clone)]
pub struct SlackClient {
    http_client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Create a new Slack client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Config(format!("creating HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Create a client from the `[slack]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn from_config(config: &SlackConfig, token: impl Into<String>) -> Result<Self, CoreError> {
        Self::new(
            config.api_url.as_str(),
            token,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Call a Web API method and decode its payload.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{method}", self.base_url);
        log::debug!("GET {method}");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: serde_json::Value = response.json().await?;
        if !data["ok"].as_bool().unwrap_or(false) {
            let code = data["error"].as_str().unwrap_or("unknown_error");
            return Err(ApiError::Slack(code.to_string()));
        }
        if let Some(warning) = data["warning"].as_str() {
            log::debug!("{method} warning: {warning}");
        }

        Ok(serde_json::from_value(data)?)
    }
}

fn push_cursor(params: &mut Vec<(&str, String)>, cursor: Option<&str>) {
    if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
        params.push(("cursor", cursor.to_string()));
    }
}

fn non_empty(cursor: String) -> Option<String> {
    (!cursor.is_empty()).then_some(cursor)
}

impl SlackApi for SlackClient {
    async fn list_channels_page(&self, cursor: Option<&str>) -> Result<Page<Channel>, ApiError> {
        let mut params = vec![("exclude_archived", "true".to_string())];
        push_cursor(&mut params, cursor);

        let data: ConversationsListResponse = self.call("conversations.list", &params).await?;
        Ok(Page {
            items: data.channels,
            next_cursor: non_empty(data.response_metadata.next_cursor),
        })
    }

    async fn list_users_page(&self, cursor: Option<&str>) -> Result<Page<User>, ApiError> {
        let mut params = Vec::new();
        push_cursor(&mut params, cursor);

        let data: UsersListResponse = self.call("users.list", &params).await?;
        Ok(Page {
            items: data.members,
            next_cursor: non_empty(data.response_metadata.next_cursor),
        })
    }

    async fn search_messages(&self, query: &str, count: u32) -> Result<Vec<SearchMatch>, ApiError> {
        let params = [
            ("query", query.to_string()),
            ("count", count.to_string()),
            ("sort_dir", "desc".to_string()),
        ];

        let data: SearchResponse = self.call("search.messages", &params).await?;
        Ok(data.messages.matches)
    }

    async fn history(&self, query: &HistoryQuery<'_>) -> Result<Vec<Message>, ApiError> {
        let mut params = vec![
            ("channel", query.channel.to_string()),
            ("limit", query.limit.to_string()),
        ];
        match query.bound {
            HistoryBound::AtOrBefore(ts) => {
                params.push(("latest", ts.to_string()));
                params.push(("inclusive", "true".to_string()));
            }
            HistoryBound::After(ts) => {
                params.push(("oldest", ts.to_string()));
                params.push(("inclusive", "false".to_string()));
            }
        }

        let data: HistoryResponse = self.call("conversations.history", &params).await?;
        Ok(data.messages)
    }

    async fn replies_page(
        &self,
        channel: &str,
        thread_ts: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Message>, ApiError> {
        let mut params = vec![
            ("channel", channel.to_string()),
            ("ts", thread_ts.to_string()),
            ("inclusive", "true".to_string()),
        ];
        push_cursor(&mut params, cursor);

        let data: RepliesResponse = self.call("conversations.replies", &params).await?;
        let next_cursor = if data.has_more {
            non_empty(data.response_metadata.next_cursor)
        } else {
            None
        };
        Ok(Page {
            items: data.messages,
            next_cursor,
        })
    }
}
