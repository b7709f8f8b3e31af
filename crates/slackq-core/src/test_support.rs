//! In-memory Slack workspace for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::ApiError;
use crate::slack::{
    Channel, ChannelRef, HistoryBound, HistoryQuery, Message, Page, SearchMatch, SlackApi, Topic,
    User,
};

pub(crate) fn user(id: &str, name: &str, real_name: &str) -> User {
    User {
        id: id.into(),
        name: name.into(),
        real_name: real_name.into(),
    }
}

pub(crate) fn msg(ts: &str, user: &str, text: &str) -> Message {
    Message {
        ts: ts.into(),
        user: user.into(),
        channel: None,
        text: text.into(),
        thread_ts: None,
    }
}

pub(crate) fn channel(id: &str, name: &str, topic: &str) -> Channel {
    Channel {
        id: id.into(),
        name: name.into(),
        topic: Topic {
            value: topic.into(),
        },
    }
}

/// A search match in `#general` (C1) for `msg`, with the given permalink.
pub(crate) fn hit(msg: &Message, username: &str, permalink: &str) -> SearchMatch {
    SearchMatch {
        ts: msg.ts.clone(),
        user: msg.user.clone(),
        username: username.into(),
        text: msg.text.clone(),
        channel: ChannelRef {
            id: "C1".into(),
            name: "general".into(),
        },
        permalink: permalink.into(),
    }
}

/// Permalink of a reply in the thread rooted at `thread_ts`.
pub(crate) fn reply_link(thread_ts: &str) -> String {
    format!("https://acme.slack.com/archives/C1/p1?thread_ts={thread_ts}&cid=C1")
}

pub(crate) const PLAIN_LINK: &str = "https://acme.slack.com/archives/C1/p1";

#[derive(Debug, Default)]
pub(crate) struct FakeSlack {
    channel_pages: Vec<Vec<Channel>>,
    user_pages: Vec<Vec<User>>,
    matches: Vec<SearchMatch>,
    history: Vec<Message>,
    threads: HashMap<String, Vec<Vec<Message>>>,
    failing: Vec<&'static str>,
    calls: RefCell<Vec<String>>,
}

impl FakeSlack {
    pub(crate) fn with_channel_pages(mut self, pages: Vec<Vec<Channel>>) -> Self {
        self.channel_pages = pages;
        self
    }

    pub(crate) fn with_user_pages(mut self, pages: Vec<Vec<User>>) -> Self {
        self.user_pages = pages;
        self
    }

    pub(crate) fn with_users(self, users: Vec<User>) -> Self {
        self.with_user_pages(vec![users])
    }

    /// Matches in the order the search endpoint returns them (newest first).
    pub(crate) fn with_matches(mut self, matches: Vec<SearchMatch>) -> Self {
        self.matches = matches;
        self
    }

    /// Flat history of channel C1, in any order.
    pub(crate) fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    /// A thread split into reply pages, parent first.
    pub(crate) fn with_thread(mut self, thread_ts: &str, pages: Vec<Vec<Message>>) -> Self {
        self.threads.insert(thread_ts.to_string(), pages);
        self
    }

    pub(crate) fn failing(mut self, method: &'static str) -> Self {
        self.failing.push(method);
        self
    }

    pub(crate) fn calls_to(&self, method: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.split(' ').next() == Some(method))
            .count()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        let method = call.split(' ').next().unwrap_or_default().to_string();
        self.calls.borrow_mut().push(call);
        if self.failing.iter().any(|m| *m == method) {
            return Err(ApiError::Slack("fake_failure".into()));
        }
        Ok(())
    }
}

fn paged<T: Clone>(pages: &[Vec<T>], cursor: Option<&str>) -> Page<T> {
    let index = cursor
        .and_then(|c| c.strip_prefix("page-"))
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(0);
    let items = pages.get(index).cloned().unwrap_or_default();
    let next_cursor = (index + 1 < pages.len()).then(|| format!("page-{}", index + 1));
    Page { items, next_cursor }
}

impl SlackApi for FakeSlack {
    async fn list_channels_page(&self, cursor: Option<&str>) -> Result<Page<Channel>, ApiError> {
        self.record(format!("conversations.list cursor={cursor:?}"))?;
        Ok(paged(&self.channel_pages, cursor))
    }

    async fn list_users_page(&self, cursor: Option<&str>) -> Result<Page<User>, ApiError> {
        self.record(format!("users.list cursor={cursor:?}"))?;
        Ok(paged(&self.user_pages, cursor))
    }

    async fn search_messages(&self, query: &str, count: u32) -> Result<Vec<SearchMatch>, ApiError> {
        self.record(format!("search.messages query={query} count={count}"))?;
        Ok(self.matches.iter().take(count as usize).cloned().collect())
    }

    async fn history(&self, query: &HistoryQuery<'_>) -> Result<Vec<Message>, ApiError> {
        let limit = query.limit as usize;
        let mut found: Vec<Message> = match query.bound {
            HistoryBound::AtOrBefore(ts) => {
                self.record(format!("conversations.history latest={ts} limit={limit}"))?;
                let mut older: Vec<_> =
                    self.history.iter().filter(|m| m.ts.as_str() <= ts).cloned().collect();
                older.sort_by(|a, b| b.ts.cmp(&a.ts));
                older.truncate(limit);
                older
            }
            HistoryBound::After(ts) => {
                self.record(format!("conversations.history oldest={ts} limit={limit}"))?;
                let mut newer: Vec<_> =
                    self.history.iter().filter(|m| m.ts.as_str() > ts).cloned().collect();
                newer.sort_by(|a, b| a.ts.cmp(&b.ts));
                newer.truncate(limit);
                newer.reverse();
                newer
            }
        };
        for m in &mut found {
            m.channel = Some(query.channel.to_string());
        }
        Ok(found)
    }

    async fn replies_page(
        &self,
        channel: &str,
        thread_ts: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Message>, ApiError> {
        self.record(format!(
            "conversations.replies channel={channel} ts={thread_ts} cursor={cursor:?}"
        ))?;
        let pages = self.threads.get(thread_ts).map_or(&[][..], Vec::as_slice);
        Ok(paged(pages, cursor))
    }
}
