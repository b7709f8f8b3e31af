//! Data models for the Slack Web API.

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Query parameter carrying the parent timestamp in a thread reply's permalink.
const THREAD_TS_PARAM: &str = "thread_ts";

/// A message from channel history or a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Fractional Unix seconds, e.g. `1700000000.123456`. Also the message ID.
    pub ts: String,
    /// Author user ID. Empty for bot and system messages.
    #[serde(default)]
    pub user: String,
    /// Channel ID, when the endpoint includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Message text.
    #[serde(default)]
    pub text: String,
    /// Parent timestamp for thread replies and thread roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

/// Channel reference embedded in a search match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelRef {
    /// Channel ID.
    pub id: String,
    /// Channel name without the leading `#`.
    #[serde(default)]
    pub name: String,
}

/// A single result of `search.messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Timestamp of the matched message.
    pub ts: String,
    /// Author user ID.
    #[serde(default)]
    pub user: String,
    /// Author display name, denormalized by the search endpoint.
    #[serde(default)]
    pub username: String,
    /// Message text.
    #[serde(default)]
    pub text: String,
    /// Channel the message was posted in.
    #[serde(default)]
    pub channel: ChannelRef,
    /// Permalink URL. Carries `thread_ts` when the match is a thread reply.
    #[serde(default)]
    pub permalink: String,
}

impl SearchMatch {
    /// Whether `msg` is the message this match refers to.
    ///
    /// Compares timestamp, author and text; the timestamp alone is not unique
    /// across channels and threads.
    #[must_use]
    pub fn is_same_message(&self, msg: &Message) -> bool {
        msg.ts == self.ts && msg.user == self.user && msg.text == self.text
    }

    /// The thread parent timestamp from the permalink, if the match is a reply.
    ///
    /// Returns `None` for unparsable permalinks and for permalinks without a
    /// non-empty `thread_ts` parameter.
    #[must_use]
    pub fn thread_parent_ts(&self) -> Option<String> {
        let url = Url::parse(&self.permalink).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == THREAD_TS_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|ts| !ts.is_empty())
    }
}

/// Channel topic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Topic {
    /// Topic text. Empty when unset.
    #[serde(default)]
    pub value: String,
}

/// A conversation from `conversations.list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel ID.
    pub id: String,
    /// Channel name.
    #[serde(default)]
    pub name: String,
    /// Channel topic.
    #[serde(default)]
    pub topic: Topic,
}

/// A workspace member from `users.list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: String,
    /// Handle shown in messages.
    #[serde(default)]
    pub name: String,
    /// Full name.
    #[serde(default)]
    pub real_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationsListResponse {
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersListResponse {
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub messages: SearchMessages,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchMessages {
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepliesResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}
