//! Actor resolution over the user store.

use std::sync::Arc;

use thiserror::Error;

use crate::access::domain::User;
use crate::access::ports::{UserStore, UserStoreError};

/// Errors surfaced while resolving accounts.
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    /// No account carries the requested username.
    #[error("unknown account: {0}")]
    UnknownAccount(String),
    /// The user store failed.
    #[error(transparent)]
    Store(#[from] UserStoreError),
}

/// Read-only account lookups for the embedding application.
///
/// Account mutation stays with the collaborating store; the core only
/// resolves actors for permission checks and audit attribution.
pub struct UserDirectory<U: UserStore> {
    users: Arc<U>,
}

impl<U: UserStore> Clone for UserDirectory<U> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

impl<U: UserStore> UserDirectory<U> {
    /// Creates a directory over the given store.
    #[must_use]
    pub const fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Resolves a username to its account.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::UnknownAccount`] when no account
    /// matches, or the store's own failure.
    pub async fn resolve_actor(&self, username: &str) -> Result<User, UserDirectoryError> {
        self.users
            .get_by_username(username)
            .await?
            .ok_or_else(|| UserDirectoryError::UnknownAccount(username.to_owned()))
    }

    /// Lists every account in identifier order.
    ///
    /// # Errors
    ///
    /// Returns the store's failure when listing fails.
    pub async fn list_accounts(&self) -> Result<Vec<User>, UserDirectoryError> {
        Ok(self.users.list().await?)
    }
}
