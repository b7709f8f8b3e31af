//! Locating a match in flat channel history.

use crate::slack::{HistoryBound, HistoryQuery, Message, SearchMatch, SlackApi};
use crate::{CoreError, Result};

/// Messages fetched at or before the match, the match itself included.
pub const BEFORE_LIMIT: u32 = 4;

/// Messages fetched strictly after the match.
pub const AFTER_LIMIT: u32 = 3;

/// Fetch the history surrounding `target` in chronological order.
///
/// Holds at most `BEFORE_LIMIT + AFTER_LIMIT` messages. Whether `target`
/// itself is among them is decided by [`position_of`].
///
/// # Errors
///
/// Returns [`CoreError::Fetch`] if either history call fails.
pub async fn fetch_window<A: SlackApi>(api: &A, target: &SearchMatch) -> Result<Vec<Message>> {
    let channel = target.channel.id.as_str();
    let before = api
        .history(&HistoryQuery {
            channel,
            bound: HistoryBound::AtOrBefore(&target.ts),
            limit: BEFORE_LIMIT,
        })
        .await
        .map_err(|e| CoreError::fetch("get conversation history", e))?;
    let after = api
        .history(&HistoryQuery {
            channel,
            bound: HistoryBound::After(&target.ts),
            limit: AFTER_LIMIT,
        })
        .await
        .map_err(|e| CoreError::fetch("get conversation history", e))?;

    Ok(merge_chronological(before, after))
}

/// Concatenate two fetches and order them by timestamp.
///
/// Timestamps are compared as strings; Slack zero-pads the fraction so string
/// order is time order. The sort is stable, so equal timestamps keep their
/// fetch order.
#[must_use]
pub fn merge_chronological(mut before: Vec<Message>, after: Vec<Message>) -> Vec<Message> {
    before.extend(after);
    before.sort_by(|a, b| a.ts.cmp(&b.ts));
    before
}

/// Index of the message `target` refers to, if present.
#[must_use]
pub fn position_of(messages: &[Message], target: &SearchMatch) -> Option<usize> {
    messages.iter().position(|m| target.is_same_message(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeSlack, PLAIN_LINK, hit, msg};

    fn timeline() -> Vec<Message> {
        (1..=12)
            .map(|i| msg(&format!("1700000{i:03}.000100"), "U1", &format!("m{i}")))
            .collect()
    }

    #[test]
    fn merge_sorts_by_timestamp_string() {
        let merged = merge_chronological(
            vec![msg("1700000003.000000", "U1", "c"), msg("1700000001.000000", "U1", "a")],
            vec![msg("1700000004.000000", "U1", "d"), msg("1700000002.500000", "U1", "b")],
        );
        let texts: Vec<_> = merged.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c", "d"]);
    }

    #[test]
    fn merge_keeps_fetch_order_for_equal_timestamps() {
        let merged = merge_chronological(
            vec![msg("1700000001.000000", "U1", "first")],
            vec![msg("1700000001.000000", "U2", "second")],
        );
        assert_eq!(merged[0].text, "first");
        assert_eq!(merged[1].text, "second");
    }

    #[tokio::test]
    async fn window_surrounds_the_match() {
        let history = timeline();
        let target = hit(&history[5], "alice", PLAIN_LINK);
        let slack = FakeSlack::default().with_history(history);

        let window = fetch_window(&slack, &target).await.unwrap();
        let texts: Vec<_> = window.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["m3", "m4", "m5", "m6", "m7", "m8", "m9"]);
        assert_eq!(position_of(&window, &target), Some(3));
        assert_eq!(
            slack.calls(),
            vec![
                "conversations.history latest=1700000006.000100 limit=4",
                "conversations.history oldest=1700000006.000100 limit=3",
            ]
        );
    }

    #[tokio::test]
    async fn window_is_sorted_and_contains_match_once() {
        let history = timeline();
        for index in [0, 1, 6, 10, 11] {
            let target = hit(&history[index], "alice", PLAIN_LINK);
            let slack = FakeSlack::default().with_history(history.clone());
            let window = fetch_window(&slack, &target).await.unwrap();

            assert!(window.windows(2).all(|w| w[0].ts <= w[1].ts));
            let hits = window.iter().filter(|m| target.is_same_message(m)).count();
            assert_eq!(hits, 1, "match at index {index}");
            assert!(window.len() <= 7);
        }
    }

    #[tokio::test]
    async fn thread_reply_is_not_in_flat_history() {
        let history = timeline();
        let reply = msg("1700000006.000150", "U2", "a reply");
        let target = hit(&reply, "bob", PLAIN_LINK);
        let slack = FakeSlack::default().with_history(history);

        let window = fetch_window(&slack, &target).await.unwrap();
        assert_eq!(position_of(&window, &target), None);
    }

    #[tokio::test]
    async fn history_failure_is_fetch_error() {
        let target = hit(&msg("1700000001.000100", "U1", "x"), "alice", PLAIN_LINK);
        let slack = FakeSlack::default().failing("conversations.history");
        let err = fetch_window(&slack, &target).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Fetch);
        assert_eq!(
            err.to_string(),
            "failed to get conversation history: slack error: fake_failure"
        );
    }
}
