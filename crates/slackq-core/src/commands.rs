//! Command execution: search with optional context, channel and user listings.

use std::io::Write;

use crate::config::{AppConfig, SlackConfig};
use crate::context::locate_context;
use crate::directory::{UserDirectory, fetch_all_users};
use crate::format::{MessageFormatter, channel_lines, user_line};
use crate::request::Request;
use crate::slack::{CursorPages, SlackApi};
use crate::{CoreError, Result};

/// Runs one [`Request`] against an injected Slack API, writing output lines.
#[derive(Debug)]
pub struct CommandRunner<'a, A> {
    api: &'a A,
    formatter: MessageFormatter,
    max_results: u32,
}

impl<'a, A: SlackApi> CommandRunner<'a, A> {
    /// Create a runner over `api`.
    #[must_use]
    pub const fn new(api: &'a A, formatter: MessageFormatter, max_results: u32) -> Self {
        Self {
            api,
            formatter,
            max_results,
        }
    }

    /// Execute `request`, writing its output to `out`.
    ///
    /// Output already written stays written if a later step fails.
    ///
    /// # Errors
    ///
    /// Returns the first fetch, parse or write failure.
    pub async fn run<W: Write>(&self, request: &Request, out: &mut W) -> Result<()> {
        match request {
            Request::SearchMessages {
                query,
                with_context,
            } => self.search(query, *with_context, out).await,
            Request::ListChannels => self.list_channels(out).await,
            Request::ListUsers => self.list_users(out).await,
        }
    }

    /// Print every non-archived channel.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Fetch`] if a `conversations.list` page fails.
    pub async fn list_channels<W: Write>(&self, out: &mut W) -> Result<()> {
        let api = self.api;
        let channels = CursorPages::new(move |cursor: Option<String>| async move {
            api.list_channels_page(cursor.as_deref()).await
        })
        .collect_all()
        .await
        .map_err(|e| CoreError::fetch("list channels", e))?;
        log::info!("listing {} channels", channels.len());

        writeln!(out, "Channels:")?;
        for channel in &channels {
            for line in channel_lines(channel) {
                writeln!(out, "{line}")?;
            }
        }
        Ok(())
    }

    /// Print every workspace member in upstream order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Fetch`] if a `users.list` page fails.
    pub async fn list_users<W: Write>(&self, out: &mut W) -> Result<()> {
        let users = fetch_all_users(self.api).await?;
        log::info!("listing {} users", users.len());

        writeln!(out, "Users:")?;
        for user in &users {
            writeln!(out, "{}", user_line(user))?;
        }
        Ok(())
    }

    /// Search messages and print the matches oldest first.
    ///
    /// Without context each match is one line. With context each match is
    /// replaced by its surrounding messages and followed by a blank line, even
    /// when no context could be found for it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Fetch`] or [`CoreError::Parse`] on the first
    /// failing match; earlier blocks remain printed.
    pub async fn search<W: Write>(&self, query: &str, with_context: bool, out: &mut W) -> Result<()> {
        let mut matches = self
            .api
            .search_messages(query, self.max_results)
            .await
            .map_err(|e| CoreError::fetch("search", e))?;
        matches.reverse();
        log::info!("search {query:?} returned {} matches", matches.len());

        if !with_context {
            for m in &matches {
                writeln!(out, "{}", self.formatter.search_line(m)?)?;
            }
            return Ok(());
        }

        if matches.is_empty() {
            return Ok(());
        }
        let directory = UserDirectory::build(self.api).await?;

        for m in &matches {
            if let Some(context) = locate_context(self.api, m).await? {
                for line in context.render(&m.channel.name, &directory, &self.formatter)? {
                    writeln!(out, "{line}")?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Run one invocation: resolve the token, parse `params`, connect, execute.
///
/// The token and the request are both validated before `connect` is called,
/// so a bad invocation never reaches the network.
///
/// # Errors
///
/// Returns [`CoreError::Config`] for a missing token, [`CoreError::Input`] for
/// a bad request, and otherwise whatever `connect` or the command returns.
pub async fn execute<A, F, W>(config: &AppConfig, params: &str, connect: F, out: &mut W) -> Result<()>
where
    A: SlackApi,
    F: FnOnce(&SlackConfig, String) -> Result<A>,
    W: Write,
{
    let token = config.resolve_token()?;
    let request = Request::parse(params)?;
    log::debug!("request: {request:?}");

    let api = connect(&config.slack, token)?;
    let runner = CommandRunner::new(
        &api,
        MessageFormatter::new(config.output.timezone),
        config.search.effective_max_results(),
    );
    runner.run(&request, out).await
}
