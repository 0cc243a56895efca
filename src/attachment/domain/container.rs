//! Container keys, staging tokens, and per-file lifecycle records.

use crate::access::domain::IssueId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Process-unique opaque identifier for a staged attachment set.
///
/// Tokens exist only until the owning issue is committed or the creation is
/// abandoned. They are disposable: a token must never be reused across
/// process restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StagingToken(Uuid);

impl StagingToken {
    /// Allocates a fresh token.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StagingToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StagingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logical attachment container: a staged set awaiting an issue identifier,
/// or the permanent set of a saved issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKey {
    /// Pre-save staging set.
    Staging(StagingToken),
    /// Permanent set of a saved issue.
    Issue(IssueId),
}

impl fmt::Display for ContainerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Staging(token) => write!(f, "staging/{token}"),
            Self::Issue(id) => write!(f, "issue/{id}"),
        }
    }
}

/// Lifecycle state of one stored file.
///
/// Files move Active→Deleted on soft delete and never automatically back;
/// recovery is an administrative operation over the same storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    /// File is present in the issue's folder.
    Active,
    /// File has been moved to the deleted area; still listed, recoverable.
    Deleted,
}

impl FileState {
    /// Returns the canonical state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One stored file within a container, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    stored_name: String,
    state: FileState,
}

impl AttachmentRecord {
    /// Creates an active record.
    #[must_use]
    pub const fn active(stored_name: String) -> Self {
        Self {
            stored_name,
            state: FileState::Active,
        }
    }

    /// Creates a record already in the deleted state, as found when
    /// reloading a container from disk.
    #[must_use]
    pub const fn deleted(stored_name: String) -> Self {
        Self {
            stored_name,
            state: FileState::Deleted,
        }
    }

    /// Returns the stored file name.
    #[must_use]
    pub fn stored_name(&self) -> &str {
        &self.stored_name
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> FileState {
        self.state
    }

    /// Returns `true` when the record is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, FileState::Active)
    }

    pub(crate) const fn mark_deleted(&mut self) {
        self.state = FileState::Deleted;
    }
}
