//! Orchestration services composing the engine with the store ports.

mod directory;
mod issue;

pub use directory::{UserDirectory, UserDirectoryError};
pub use issue::{CreateIssueRequest, IssueService, IssueServiceError, IssueServiceResult};
