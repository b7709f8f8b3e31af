//! Locating a match among the replies of a thread.

use std::ops::Range;

use crate::slack::{CursorPages, Message, SearchMatch, SlackApi};
use crate::{CoreError, Result};

/// Replies shown before the match.
pub const REPLIES_BEFORE: usize = 3;

/// Replies shown from the match onwards, the match included.
pub const REPLIES_AFTER: usize = 4;

/// A thread parent and the replies surrounding a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadWindow {
    /// The thread parent, always shown as the anchor.
    pub root: Message,
    /// Replies around the match in thread order. Never contains `root`.
    pub replies: Vec<Message>,
}

/// Slice of the accumulated thread shown as replies for a match at `absolute`.
///
/// Index 0 is the thread parent and is excluded even when the match sits
/// within the first few replies; the upper end never passes `total`.
#[must_use]
pub fn reply_bounds(absolute: usize, total: usize) -> Range<usize> {
    let upper = (absolute + REPLIES_AFTER).min(total);
    let lower = absolute.saturating_sub(REPLIES_BEFORE).max(1).min(upper);
    lower..upper
}

/// Page through the thread rooted at `thread_ts` until `target` is found.
///
/// Pagination stops at the page containing the match. Returns `Ok(None)` if
/// every page has been read without finding it.
///
/// # Errors
///
/// Returns [`CoreError::Fetch`] if a `conversations.replies` page fails.
pub async fn locate<A: SlackApi>(
    api: &A,
    target: &SearchMatch,
    thread_ts: &str,
) -> Result<Option<ThreadWindow>> {
    let channel = target.channel.id.as_str();
    let mut pages = CursorPages::new(move |cursor: Option<String>| async move {
        api.replies_page(channel, thread_ts, cursor.as_deref()).await
    });

    let mut seen: Vec<Message> = Vec::new();
    while let Some(batch) = pages
        .next_page()
        .await
        .map_err(|e| CoreError::fetch("get conversation replies", e))?
    {
        let local = batch.iter().position(|m| target.is_same_message(m));
        let offset = seen.len();
        seen.extend(batch);

        if let Some(local) = local {
            let bounds = reply_bounds(offset + local, seen.len());
            log::debug!(
                "match is reply {} of {} in thread {thread_ts}; showing {bounds:?}",
                offset + local,
                seen.len()
            );
            seen.truncate(bounds.end);
            let replies = seen.split_off(bounds.start);
            return Ok(seen.into_iter().next().map(|root| ThreadWindow { root, replies }));
        }
    }

    log::debug!("thread {thread_ts} exhausted without finding {}", target.ts);
    Ok(None)
}
