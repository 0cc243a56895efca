//! Error taxonomy for attachment operations.

use thiserror::Error;

/// Errors surfaced by the attachment lifecycle manager.
///
/// Permission checks never produce these; only file and metadata
/// bookkeeping can fail. The manager does not retry; callers decide
/// between retry and manual cleanup.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// An underlying filesystem operation failed.
    #[error("i/o failure while {context}: {source}")]
    IoFailure {
        /// What the manager was doing when the failure occurred.
        context: String,
        /// The underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// A configured count or size ceiling would be exceeded.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// The named file has already been soft-deleted.
    #[error("file already deleted: {0}")]
    AlreadyDeleted(String),

    /// No file with the given name exists in the container.
    #[error("no such attachment: {0}")]
    NotFound(String),

    /// A commit stopped partway; the named files were relocated before the
    /// failure and are not rolled back.
    #[error("partial commit failure after {} file(s): {source}", succeeded.len())]
    PartialCommitFailure {
        /// Stored names relocated into the issue set before the failure.
        succeeded: Vec<String>,
        /// The filesystem error that interrupted the commit.
        #[source]
        source: std::io::Error,
    },
}

impl AttachmentError {
    /// Wraps a filesystem error with the operation being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoFailure {
            context: context.into(),
            source,
        }
    }
}
