//! Slack Web API access.
//!
//! This module provides:
//! - Data models for channels, users, messages and search matches
//! - The [`SlackApi`] trait every component receives its client through
//! - A `reqwest`-backed [`SlackClient`]
//! - Cursor pagination as a lazy page sequence

pub mod api;
pub mod client;
pub mod models;
pub mod pagination;

pub use api::{HistoryBound, HistoryQuery, SlackApi};
pub use client::SlackClient;
pub use models::{Channel, ChannelRef, Message, SearchMatch, Topic, User};
pub use pagination::{CursorPages, Page};
