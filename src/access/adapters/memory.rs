//! In-memory store and sink implementations.
//!
//! Used by tests and by embedders that have not wired a durable backend
//! yet. All state lives behind `Arc<RwLock<…>>`; a poisoned lock is
//! reported as a persistence error rather than a panic.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::access::domain::{Issue, IssueId, NewIssue, User};
use crate::access::ports::{
    AuditEvent, AuditSink, IssueStore, IssueStoreError, IssueStoreResult, SettingsStore,
    SettingsStoreError, SettingsStoreResult, UserStore, UserStoreError, UserStoreResult,
};

/// Thread-safe in-memory issue store with sequential identifiers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueStore {
    state: Arc<RwLock<IssueState>>,
}

#[derive(Debug, Default)]
struct IssueState {
    next_id: u64,
    issues: BTreeMap<IssueId, Issue>,
}

impl InMemoryIssueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> std::io::Error {
    std::io::Error::other("store lock poisoned")
}

#[async_trait]
impl IssueStore for InMemoryIssueStore {
    async fn create(&self, issue: NewIssue) -> IssueStoreResult<Issue> {
        let mut state = self
            .state
            .write()
            .map_err(|_| IssueStoreError::persistence(poisoned()))?;
        state.next_id += 1;
        let id = IssueId::new(state.next_id);
        let record = Issue {
            id,
            title: issue.title,
            status: issue.status,
            department: issue.department,
            details: issue.details,
            created_at: issue.created_at,
            updated_at: issue.created_at,
        };
        state.issues.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, issue: &Issue) -> IssueStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| IssueStoreError::persistence(poisoned()))?;
        if !state.issues.contains_key(&issue.id) {
            return Err(IssueStoreError::NotFound(issue.id));
        }
        state.issues.insert(issue.id, issue.clone());
        Ok(())
    }

    async fn get(&self, id: IssueId) -> IssueStoreResult<Option<Issue>> {
        let state = self
            .state
            .read()
            .map_err(|_| IssueStoreError::persistence(poisoned()))?;
        Ok(state.issues.get(&id).cloned())
    }

    async fn list(&self) -> IssueStoreResult<Vec<Issue>> {
        let state = self
            .state
            .read()
            .map_err(|_| IssueStoreError::persistence(poisoned()))?;
        Ok(state.issues.values().cloned().collect())
    }

    async fn delete(&self, id: IssueId) -> IssueStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| IssueStoreError::persistence(poisoned()))?;
        state
            .issues
            .remove(&id)
            .map(|_| ())
            .ok_or(IssueStoreError::NotFound(id))
    }
}

/// Thread-safe in-memory user store keyed by username.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an account.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn insert(&self, user: User) -> UserStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| UserStoreError::persistence(poisoned()))?;
        state.insert(user.username().to_owned(), user);
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_by_username(&self, username: &str) -> UserStoreResult<Option<User>> {
        let state = self
            .state
            .read()
            .map_err(|_| UserStoreError::persistence(poisoned()))?;
        Ok(state.get(username).cloned())
    }

    async fn list(&self) -> UserStoreResult<Vec<User>> {
        let state = self
            .state
            .read()
            .map_err(|_| UserStoreError::persistence(poisoned()))?;
        let mut users: Vec<User> = state.values().cloned().collect();
        users.sort_by_key(|user| user.id().value());
        Ok(users)
    }
}

/// Thread-safe in-memory settings store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsStore {
    state: Arc<RwLock<HashMap<String, bool>>>,
}

impl InMemorySettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get_bool(&self, key: &str) -> SettingsStoreResult<Option<bool>> {
        let state = self
            .state
            .read()
            .map_err(|_| SettingsStoreError::persistence(poisoned()))?;
        Ok(state.get(key).copied())
    }

    async fn set_bool(&self, key: &str, value: bool) -> SettingsStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| SettingsStoreError::persistence(poisoned()))?;
        state.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Audit sink that keeps every recorded event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingAuditSink {
    events: Arc<RwLock<Vec<AuditEvent>>>,
}

impl RecordingAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record(&self, event: AuditEvent) {
        // Sinks absorb their own failures; a poisoned lock drops the event.
        if let Ok(mut events) = self.events.write() {
            events.push(event);
        }
    }
}
