//! Conversational context reconstruction for search matches.
//!
//! A search match carries no position information. To show its surroundings
//! the match is looked up in two places:
//!
//! 1. Flat channel history around its timestamp ([`timeline`]). Cheap, and
//!    sufficient for every message that is not a thread reply.
//! 2. The replies of its thread ([`thread`]), when the permalink names a
//!    thread parent. Requires paging through the thread.
//!
//! A match found in neither place produces no context and no error.

pub mod thread;
pub mod timeline;

pub use thread::ThreadWindow;

use crate::directory::UserDirectory;
use crate::format::MessageFormatter;
use crate::slack::{Message, SearchMatch, SlackApi};
use crate::Result;

/// Indentation of the reply list under a thread anchor.
const REPLY_INDENT: &str = "    ";

/// Messages surrounding a search match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContext {
    /// The match and its neighbours in channel history, oldest first.
    Timeline(Vec<Message>),
    /// The match's thread parent and the replies around it.
    Thread(ThreadWindow),
}

impl MessageContext {
    /// Render the context as output lines.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Parse`] if any timestamp cannot be decoded.
    pub fn render(
        &self,
        channel: &str,
        directory: &UserDirectory,
        formatter: &MessageFormatter,
    ) -> Result<Vec<String>> {
        match self {
            Self::Timeline(messages) => messages
                .iter()
                .map(|m| formatter.message_line(m, channel, directory))
                .collect(),
            Self::Thread(window) => {
                let mut lines = Vec::with_capacity(window.replies.len() + 2);
                lines.push(formatter.message_line(&window.root, channel, directory)?);
                lines.push(format!("{REPLY_INDENT}Replies:"));
                for reply in &window.replies {
                    let line = formatter.message_line(reply, channel, directory)?;
                    lines.push(format!("{REPLY_INDENT}{line}"));
                }
                Ok(lines)
            }
        }
    }
}

/// Find the context of `target`, trying channel history before its thread.
///
/// Returns `Ok(None)` when the match is absent from history and its permalink
/// names no thread, or when its thread does not contain it.
///
/// # Errors
///
/// Returns [`crate::CoreError::Fetch`] if any API call fails.
pub async fn locate_context<A: SlackApi>(
    api: &A,
    target: &SearchMatch,
) -> Result<Option<MessageContext>> {
    let window = timeline::fetch_window(api, target).await?;
    if timeline::position_of(&window, target).is_some() {
        return Ok(Some(MessageContext::Timeline(window)));
    }

    let Some(thread_ts) = target.thread_parent_ts() else {
        log::debug!(
            "{} not in history of #{} and permalink names no thread",
            target.ts,
            target.channel.name
        );
        return Ok(None);
    };

    log::debug!("{} not in channel history; searching thread {thread_ts}", target.ts);
    Ok(thread::locate(api, target, &thread_ts)
        .await?
        .map(MessageContext::Thread))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayZone;
    use crate::test_support::{FakeSlack, PLAIN_LINK, hit, msg, reply_link, user};

    const ROOT_TS: &str = "1700000002.000100";

    fn history() -> Vec<Message> {
        vec![
            msg("1700000001.000100", "U1", "before"),
            msg(ROOT_TS, "U1", "question?"),
            msg("1700000003.000100", "U2", "after"),
        ]
    }

    fn thread() -> Vec<Vec<Message>> {
        vec![vec![
            msg(ROOT_TS, "U1", "question?"),
            msg("1700000002.500000", "U2", "answer"),
            msg("1700000002.600000", "U1", "thanks"),
        ]]
    }

    #[tokio::test]
    async fn history_hit_skips_thread_lookup() {
        let target = hit(&history()[1], "alice", &reply_link(ROOT_TS));
        let slack = FakeSlack::default()
            .with_history(history())
            .with_thread(ROOT_TS, thread());

        let context = locate_context(&slack, &target).await.unwrap();
        assert!(matches!(context, Some(MessageContext::Timeline(ref m)) if m.len() == 3));
        assert_eq!(slack.calls_to("conversations.replies"), 0);
    }

    #[tokio::test]
    async fn reply_falls_back_to_thread() {
        let target = hit(&thread()[0][1], "bob", &reply_link(ROOT_TS));
        let slack = FakeSlack::default()
            .with_history(history())
            .with_thread(ROOT_TS, thread());

        let Some(MessageContext::Thread(window)) = locate_context(&slack, &target).await.unwrap()
        else {
            panic!("expected thread context");
        };
        assert_eq!(window.root.text, "question?");
        assert_eq!(window.replies.len(), 2);
        assert_eq!(
            slack.calls().last().map(String::as_str),
            Some("conversations.replies channel=C1 ts=1700000002.000100 cursor=None")
        );
    }

    #[tokio::test]
    async fn missing_from_history_without_thread_is_silent() {
        let stray = msg("1700000002.500000", "U2", "answer");
        let target = hit(&stray, "bob", PLAIN_LINK);
        let slack = FakeSlack::default().with_history(history());

        assert_eq!(locate_context(&slack, &target).await.unwrap(), None);
        assert_eq!(slack.calls_to("conversations.replies"), 0);
    }

    #[test]
    fn thread_rendering_indents_replies() {
        let directory =
            UserDirectory::from_users([user("U1", "alice", "Alice"), user("U2", "bob", "Bob")]);
        let pages = thread();
        let context = MessageContext::Thread(ThreadWindow {
            root: pages[0][0].clone(),
            replies: pages[0][1..].to_vec(),
        });

        let lines = context
            .render("general", &directory, &MessageFormatter::new(DisplayZone::Utc))
            .unwrap();
        assert_eq!(
            lines,
            vec![
                "[2023-11-14 22:13:22] alice in #general: \"question?\"",
                "    Replies:",
                "    [2023-11-14 22:13:22] bob in #general: \"answer\"",
                "    [2023-11-14 22:13:22] alice in #general: \"thanks\"",
            ]
        );
    }

    #[test]
    fn rendering_fails_on_bad_timestamp() {
        let context = MessageContext::Timeline(vec![msg("yesterday", "U1", "x")]);
        let err = context
            .render("general", &UserDirectory::default(), &MessageFormatter::default())
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Parse);
    }
}
