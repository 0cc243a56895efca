//! Store ports for issue records, user accounts, and durable settings.

use crate::access::domain::{Issue, IssueId, NewIssue, User};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Settings key holding the authentication toggle.
///
/// When the flag is absent or `false`, permission checks run in bypass mode.
pub const AUTHENTICATION_ENABLED: &str = "authentication_enabled";

/// Result type for issue store operations.
pub type IssueStoreResult<T> = Result<T, IssueStoreError>;

/// Issue persistence contract.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Persists a new issue and returns it with a store-assigned identifier.
    async fn create(&self, issue: NewIssue) -> IssueStoreResult<Issue>;

    /// Persists changes to an existing issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueStoreError::NotFound`] when the issue does not exist.
    async fn update(&self, issue: &Issue) -> IssueStoreResult<()>;

    /// Finds an issue by identifier.
    ///
    /// Returns `None` when the issue does not exist.
    async fn get(&self, id: IssueId) -> IssueStoreResult<Option<Issue>>;

    /// Returns all issues in identifier order.
    async fn list(&self) -> IssueStoreResult<Vec<Issue>>;

    /// Removes an issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueStoreError::NotFound`] when the issue does not exist.
    async fn delete(&self, id: IssueId) -> IssueStoreResult<()>;
}

/// Errors returned by issue store implementations.
#[derive(Debug, Clone, Error)]
pub enum IssueStoreError {
    /// The issue was not found.
    #[error("issue not found: {0}")]
    NotFound(IssueId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for user store operations.
pub type UserStoreResult<T> = Result<T, UserStoreError>;

/// User account lookup contract.
///
/// Account mutation is an Administrator action owned by the collaborating
/// store; the core only reads.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by unique username.
    ///
    /// Returns `None` when no account matches.
    async fn get_by_username(&self, username: &str) -> UserStoreResult<Option<User>>;

    /// Returns all user accounts.
    async fn list(&self) -> UserStoreResult<Vec<User>>;
}

/// Errors returned by user store implementations.
#[derive(Debug, Clone, Error)]
pub enum UserStoreError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for settings store operations.
pub type SettingsStoreResult<T> = Result<T, SettingsStoreError>;

/// Durable key-value settings contract.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Reads a boolean setting.
    ///
    /// Returns `None` when the key has never been written.
    async fn get_bool(&self, key: &str) -> SettingsStoreResult<Option<bool>>;

    /// Writes a boolean setting.
    async fn set_bool(&self, key: &str, value: bool) -> SettingsStoreResult<()>;
}

/// Errors returned by settings store implementations.
#[derive(Debug, Clone, Error)]
pub enum SettingsStoreError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SettingsStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
