//! User ID to display name lookup.

use std::collections::HashMap;

use crate::slack::{CursorPages, SlackApi, User};
use crate::{CoreError, Result};

/// Maps user IDs to the handle shown in rendered messages.
///
/// History and thread responses only carry user IDs. The directory is built
/// once per command and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    names: HashMap<String, String>,
}

impl UserDirectory {
    /// Fetch every workspace member and index them by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Fetch`] if any `users.list` page fails.
    pub async fn build<A: SlackApi>(api: &A) -> Result<Self> {
        let users = fetch_all_users(api).await?;
        log::debug!("user directory holds {} members", users.len());
        Ok(Self::from_users(users))
    }

    /// Index an already fetched member list.
    #[must_use]
    pub fn from_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            names: users.into_iter().map(|u| (u.id, u.name)).collect(),
        }
    }

    /// Display name for `user_id`, or `""` for unknown IDs.
    #[must_use]
    pub fn display_name(&self, user_id: &str) -> &str {
        self.names.get(user_id).map_or("", String::as_str)
    }

    /// Number of known members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no members are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Fetch every workspace member in upstream order.
///
/// # Errors
///
/// Returns [`CoreError::Fetch`] if any `users.list` page fails.
pub async fn fetch_all_users<A: SlackApi>(api: &A) -> Result<Vec<User>> {
    CursorPages::new(move |cursor: Option<String>| async move {
        api.list_users_page(cursor.as_deref()).await
    })
    .collect_all()
    .await
    .map_err(|e| CoreError::fetch("list users", e))
}
