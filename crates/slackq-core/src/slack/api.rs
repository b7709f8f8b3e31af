//! The Slack operations the rest of the crate depends on.

use crate::ApiError;
use crate::slack::models::{Channel, Message, SearchMatch, User};
use crate::slack::pagination::Page;

/// Which side of an anchor timestamp a history fetch covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBound<'a> {
    /// Messages at or before the timestamp (`latest`, inclusive).
    AtOrBefore(&'a str),
    /// Messages strictly after the timestamp (`oldest`, exclusive).
    After(&'a str),
}

/// A bounded `conversations.history` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery<'a> {
    /// Channel ID.
    pub channel: &'a str,
    /// Anchor and direction.
    pub bound: HistoryBound<'a>,
    /// Maximum number of messages returned.
    pub limit: u32,
}

/// Slack Web API operations.
///
/// Every component receives its client through this trait, so commands can be
/// exercised against an in-memory workspace.
#[allow(async_fn_in_trait, reason = "futures are awaited on a single-threaded runtime")]
pub trait SlackApi {
    /// One page of non-archived conversations.
    async fn list_channels_page(&self, cursor: Option<&str>) -> Result<Page<Channel>, ApiError>;

    /// One page of workspace members.
    async fn list_users_page(&self, cursor: Option<&str>) -> Result<Page<User>, ApiError>;

    /// Full-text search, newest first, at most `count` matches.
    async fn search_messages(&self, query: &str, count: u32) -> Result<Vec<SearchMatch>, ApiError>;

    /// Channel history on one side of an anchor timestamp.
    async fn history(&self, query: &HistoryQuery<'_>) -> Result<Vec<Message>, ApiError>;

    /// One page of a thread, parent first on the first page.
    async fn replies_page(
        &self,
        channel: &str,
        thread_ts: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Message>, ApiError>;
}
